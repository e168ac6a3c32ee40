//! Mesh and element capability traits.
//!
//! This module provides:
//! - [`GridMesh`]: node, boundary and element access
//! - [`UniformRefinement`]: split each element into four
//! - [`VorticityElement`]: element error integrals and recovery setup
//! - [`GridBoundary`]: boundary numbering

pub mod mesh_traits;

pub use mesh_traits::{GridBoundary, GridMesh, UniformRefinement, VorticityElement};
