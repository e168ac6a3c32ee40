//! Output files of a mesh preparation or validation run.
//!
//! This module provides:
//! - **VTK output**: mesh, solution and analytic snapshots (VTU format)
//! - **Boundary listing**: node coordinates per boundary, to check the
//!   boundary numbering
//! - **Documenters**: numbered snapshot series written once per level or
//!   time step
//!
//! # File Formats
//!
//! ## Boundary Listing
//!
//! One zone per boundary, in boundary order:
//!
//! ```text
//! ZONE T="boundary 0"
//! -3.63 0
//! -3.5 0
//! ...
//! ```
//!
//! ## Snapshots
//!
//! `soln00000.vtu`, `soln00001.vtu`, ... and, when an analytic field is
//! documented alongside, `analytical_vorticity00000.vtu`, ...

mod boundaries;
mod documenter;
mod vtk;

pub use boundaries::{BOUNDARIES_FILE_NAME, write_boundaries};
pub use documenter::{SnapshotCounter, SolutionDocumenter, VtkDocumenter};
pub use vtk::{nodal_recovered, write_vtk_exact, write_vtk_mesh, write_vtk_solution};
