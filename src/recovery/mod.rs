//! Vorticity recovery.
//!
//! A recovery procedure takes the nodal velocities of a mesh and fills in,
//! per element, the vorticity, its derivatives up to third order and the
//! velocity gradient. The convergence harness is written against the
//! [`VorticityRecovery`] trait; [`PatchRecovery`] is a self-contained
//! implementation for rectilinear [`QuadMesh`](crate::mesh::QuadMesh)es.

mod patch;
mod stencil;

pub use patch::PatchRecovery;
pub use stencil::{LineStencil, MAX_DERIVATIVE, STENCIL_POINTS, line_stencils};

use crate::error::CapabilityError;

/// Derivative-recovery capability.
pub trait VorticityRecovery<M> {
    /// Populate the recovered quantities of every element of `mesh`.
    ///
    /// Requires the smoothed vorticity of each element to be pinned.
    fn recover_vorticity(&self, mesh: &mut M) -> Result<(), CapabilityError>;

    /// Human-readable name for logging.
    fn name(&self) -> &'static str;
}
