//! Graded grid transforms.
//!
//! A uniform rectangular grid is remapped independently along each axis:
//!
//! - [`VerticalClustering`]: exponential clustering towards the wall below a
//!   blend height, linear above it, joined with matching value and slope.
//! - [`HorizontalSquash`]: three linear pieces that squeeze a prescribed
//!   number of elements into a central band of fixed physical width.
//!
//! Both are strictly increasing and fix the ends of their interval, so they
//! never make nodes cross. Their coefficients come from physical target
//! spacings through [`resolve`].
//!
//! # Example
//!
//! ```
//! use gradmesh::config::ChannelParameters;
//! use gradmesh::grading::{self, CoordinateMap};
//! use gradmesh::mesh::QuadMesh;
//!
//! let params = ChannelParameters::default();
//! let layout = grading::resolve(&params).unwrap();
//!
//! let mut mesh = QuadMesh::uniform(layout.grid.resolution, layout.grid.bounds);
//! let vertical = layout.vertical_clustering();
//! grading::apply_to_mesh(&mut mesh, &vertical).unwrap();
//!
//! // The wall and the top stay put.
//! assert_eq!(vertical.map(0.0), 0.0);
//! assert!((vertical.map(5.13) - 5.13).abs() < 1e-12);
//! ```

mod coefficients;
mod horizontal;
mod resolver;
mod vertical;

pub use coefficients::{TransformCoefficients, derivative_matching_slope};
pub use horizontal::HorizontalSquash;
pub use resolver::{GridLayout, GridSpec, resolve};
pub use vertical::VerticalClustering;

use tracing::debug;

use crate::error::GeometryError;
use crate::mesh::GridMesh;
use crate::types::Axis;

/// Monotone remapping of one coordinate of a grid.
pub trait CoordinateMap: Send + Sync {
    /// Coordinate this map acts on.
    fn axis(&self) -> Axis;

    /// Image of a single coordinate value.
    fn map(&self, t: f64) -> f64;

    /// Derivative of [`map`](Self::map) with respect to `t`.
    fn derivative(&self, t: f64) -> f64;

    /// Human-readable name for debugging and logging.
    fn name(&self) -> &'static str;

    /// Description of parameters (for diagnostics).
    fn description(&self) -> String {
        self.name().to_string()
    }
}

/// Remap one coordinate of every node of `mesh` in place.
///
/// Only positions change; nodal values and pins are untouched. A second
/// application along the same axis is refused since the maps are defined on
/// the uniform coordinates.
pub fn apply_to_mesh<M, T>(mesh: &mut M, map: &T) -> Result<(), GeometryError>
where
    M: GridMesh,
    T: CoordinateMap + ?Sized,
{
    let axis = map.axis();
    if mesh.is_graded(axis) {
        return Err(GeometryError::AlreadyTransformed { axis });
    }

    let d = axis.index();
    for node in mesh.nodes_mut() {
        node.x[d] = map.map(node.x[d]);
    }
    mesh.mark_graded(axis);

    debug!(axis = %axis, map = %map.description(), "applied coordinate map");
    Ok(())
}
