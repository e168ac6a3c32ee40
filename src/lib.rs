//! # gradmesh
//!
//! Graded quadrilateral meshes for vortex/wall interaction runs in a
//! rectangular channel, and a convergence check for recovered vorticity.
//!
//! This crate provides:
//! - A grid resolver turning spacing targets into element counts
//! - Coordinate transforms: exponential/linear clustering towards the wall
//!   and a piecewise-linear squash into a central band
//! - A structured quad mesh with uniform refinement
//! - Vorticity and derivative recovery from nodal velocities
//! - Analytic velocity fields with exact vorticity derivatives
//! - A convergence harness writing an error table per refinement level
//! - The channel problem setup and its time-stepping schedule
//! - VTK output

pub mod channel;
pub mod config;
pub mod error;
pub mod field;
pub mod grading;
pub mod harness;
pub mod io;
pub mod mesh;
pub mod quadrature;
pub mod recovery;
pub mod simulation;
pub mod types;

// Re-export main types for convenience
pub use channel::{ChannelProblem, RunOutcome, impose_no_slip};
pub use config::{ChannelParameters, LinearSolverChoice, RunConfig};
pub use error::{CapabilityError, ConfigError, GeometryError, GradmeshError, OutputError};
pub use field::{
    N_QUANTITIES, SinCosField, SyntheticField, VelocityField, VorticityDerivatives,
    VorticityQuantity, VortexPairField,
};
pub use grading::{
    CoordinateMap, GridLayout, GridSpec, HorizontalSquash, TransformCoefficients,
    VerticalClustering, apply_to_mesh, resolve,
};
pub use harness::{ConvergenceHarness, HarnessError, HarnessReport, RefinementLevel};
pub use mesh::{GridBoundary, GridMesh, Node, QuadElement, QuadMesh, UniformRefinement, VorticityElement};
pub use recovery::{PatchRecovery, VorticityRecovery};
pub use simulation::{FlowSolver, ScheduleReport, TimeSchedule, run_schedule};
pub use types::{Axis, Bounds2D, Resolution2D};

// I/O
pub use io::{SolutionDocumenter, VtkDocumenter, write_boundaries, write_vtk_exact, write_vtk_mesh, write_vtk_solution};
