//! Strongly-typed domain values.
//!
//! Small value types that keep the grading and mesh APIs self-documenting:
//!
//! - [`Bounds2D`]: rectangular domain extent with named edges
//! - [`Resolution2D`]: element counts per direction
//! - [`Axis`]: which coordinate a transform acts on
//!
//! # Example
//!
//! ```
//! use gradmesh::types::{Axis, Bounds2D, Resolution2D};
//!
//! let bounds = Bounds2D::new(-3.63, 3.63, 0.0, 5.13);
//! assert!((bounds.width() - 7.26).abs() < 1e-12);
//!
//! let res = Resolution2D::new(50, 85);
//! assert_eq!(res.total_elements(), 4250);
//!
//! assert_eq!(Axis::Horizontal.index(), 0);
//! ```

mod axis;
mod bounds;
mod resolution;

pub use axis::Axis;
pub use bounds::Bounds2D;
pub use resolution::{Resolution2D, even_floor};
