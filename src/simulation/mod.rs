//! Time-stepping schedule.
//!
//! The channel run starts impulsively with the wall slipping, then switches
//! to no-slip on the bottom and keeps stepping:
//!
//! - Document the initial state
//! - `impulsive_steps` steps of size `dt`, documenting after each
//! - Impose no-slip on the bottom boundary
//! - `no_slip_steps` further steps, documenting after each
//!
//! The flow solve itself is an external capability behind [`FlowSolver`].
//!
//! # Example
//! ```ignore
//! use gradmesh::simulation::{TimeSchedule, run_schedule};
//!
//! let report = run_schedule(
//!     &mut mesh,
//!     &mut solver,
//!     &PatchRecovery,
//!     &mut documenter,
//!     &TimeSchedule::default(),
//!     |mesh| impose_no_slip(mesh, 0.02812),
//! )?;
//! println!("reached t = {}", report.time);
//! ```

mod schedule;

pub use schedule::{FlowSolver, ScheduleReport, TimeSchedule, run_schedule};
