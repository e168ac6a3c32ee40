//! Recovery convergence harness.
//!
//! Drives a mesh through a fixed number of uniformly refined levels and
//! measures how well a [`VorticityRecovery`](crate::recovery::VorticityRecovery)
//! reproduces an analytic field:
//!
//! ```text
//! INIT -> (ASSIGN_FIELD -> RECOVER -> ACCUMULATE_ERROR -> EMIT_ROW -> REFINE)* -> DONE
//! ```
//!
//! Each level appends one row to `vorticity_convergence.dat` and documents a
//! solution/analytic snapshot pair. The last level is not refined.

mod accumulator;
mod convergence;
mod table;

pub use accumulator::{ErrorVector, accumulate_errors};
pub use convergence::{ConvergenceHarness, HarnessReport};
pub(crate) use convergence::complete_element_setup;
pub use table::{ConvergenceTable, RefinementLevel, TABLE_FILE_NAME, header};

use std::fmt;

use thiserror::Error;

use crate::error::{CapabilityError, OutputError};
use crate::field::VorticityQuantity;

/// Stage of the harness state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Init,
    AssignField,
    Recover,
    AccumulateError,
    EmitRow,
    Refine,
    Done,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Init => "init",
            Phase::AssignField => "assign field",
            Phase::Recover => "recover",
            Phase::AccumulateError => "accumulate error",
            Phase::EmitRow => "emit row",
            Phase::Refine => "refine",
            Phase::Done => "done",
        };
        f.write_str(name)
    }
}

/// Failure of a harness run, with the level it happened at.
///
/// The row of the failing level is never written.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// An external capability failed.
    #[error("level {level}, {phase}: {source}")]
    Capability {
        level: usize,
        phase: Phase,
        #[source]
        source: CapabilityError,
    },

    /// An accumulated error is NaN or infinite.
    #[error("level {level}: error in {quantity} is not finite")]
    NonFinite {
        level: usize,
        quantity: VorticityQuantity,
    },

    /// Writing the table or a snapshot failed.
    #[error("level {level}, {phase}: {source}")]
    Output {
        level: usize,
        phase: Phase,
        #[source]
        source: OutputError,
    },

    /// The harness was asked to run zero levels.
    #[error("convergence harness needs at least one level")]
    NoLevels,
}
