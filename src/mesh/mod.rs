//! Mesh representation.
//!
//! Provides the structured quadrilateral mesh the grading transforms and
//! the convergence harness operate on:
//! - [`Node`]: position, two velocity unknowns and their pin flags
//! - [`QuadElement`]: bilinear quad carrying recovery state
//! - [`QuadMesh`]: `nx × ny` grid with boundary enumeration and uniform
//!   refinement
//! - capability traits ([`GridMesh`], [`UniformRefinement`],
//!   [`VorticityElement`]) that other mesh types can implement

mod element;
mod node;
mod quad_mesh;
pub mod traits;

pub use element::{CornerValues, ERROR_QUADRATURE_POINTS, QuadElement, bilinear_shape};
pub use node::Node;
pub use quad_mesh::QuadMesh;
pub use traits::{GridBoundary, GridMesh, UniformRefinement, VorticityElement};
