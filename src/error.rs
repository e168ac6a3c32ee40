//! Error types.
//!
//! Failures fall into four families, each with its own enum:
//! - [`ConfigError`]: parameters that cannot produce a valid mesh. Raised
//!   before any grid is built.
//! - [`GeometryError`]: a transform produced (or would produce) crossing
//!   nodes, or was applied twice.
//! - [`CapabilityError`]: an external capability (recovery, refinement,
//!   flow solve) failed or was handed incomplete data.
//! - [`OutputError`]: writing tables or snapshots failed.
//!
//! [`GradmeshError`] unifies them for callers that drive a whole run.
//! Nothing here is retried: every variant is either a configuration mistake
//! or a structural invariant violation.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::Axis;

/// Invalid or degenerate configuration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    /// Clustering sharpness makes `exp(alpha) - 1` vanish or flips the profile.
    #[error("clustering sharpness must be positive and finite, got {sharpness}")]
    DegenerateSharpness { sharpness: f64 },

    /// Blend height outside `(0, height]`.
    #[error("blend height {blend_height} must lie in (0, {height}]")]
    InvalidBlendHeight { blend_height: f64, height: f64 },

    /// Percentage of elements in the boundary layer outside `(0, 100)`.
    #[error("percentage of elements in boundary layer must be in (0, 100), got {0}")]
    InvalidPercentage(f64),

    /// A length or spacing that must be strictly positive.
    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    /// Central band does not fit strictly inside the domain.
    #[error("central band half-width {half_width} does not fit inside [{x_min}, {x_max}]")]
    BandTooWide {
        half_width: f64,
        x_min: f64,
        x_max: f64,
    },

    /// Junction coordinates that do not bracket the origin inside the domain.
    #[error("squash junctions ({left}, {right}) must satisfy {x_min} < left < 0 < right < {x_max}")]
    InvalidJunctions {
        left: f64,
        right: f64,
        x_min: f64,
        x_max: f64,
    },

    /// An element count resolved to zero.
    #[error("resolved {name} element count is zero")]
    EmptyResolution { name: &'static str },
}

/// Violation of the ordering invariants of a graded mesh.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeometryError {
    /// Two neighbouring nodes along a grid line are out of order.
    #[error("non-monotonic {axis} coordinates on grid line {line}: node {index} at {previous} followed by {current}")]
    NonMonotonic {
        axis: Axis,
        line: usize,
        index: usize,
        previous: f64,
        current: f64,
    },

    /// A transform was applied to coordinates that were already remapped.
    #[error("{axis} transform already applied to this mesh")]
    AlreadyTransformed { axis: Axis },
}

/// Failure reported by, or detected around, an external capability.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CapabilityError {
    /// Derivative recovery could not run.
    #[error("vorticity recovery failed: {0}")]
    Recovery(String),

    /// Uniform refinement could not run.
    #[error("uniform refinement failed: {0}")]
    Refinement(String),

    /// The flow solver failed to advance.
    #[error("flow solve failed: {0}")]
    FlowSolve(String),

    /// An element was queried before recovery populated it.
    #[error("element {element} has no recovered vorticity")]
    MissingRecovery { element: usize },

    /// An element was queried without an analytic vorticity evaluator.
    #[error("element {element} has no exact vorticity evaluator")]
    MissingExactField { element: usize },

    /// Recovery would overwrite smoothed vorticity that is still free.
    #[error("smoothed vorticity of element {element} is not pinned")]
    SmoothedVorticityFree { element: usize },
}

/// Failure while writing output files.
#[derive(Debug, Error)]
pub enum OutputError {
    /// I/O error during file operations.
    #[error("output I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl OutputError {
    /// Wrap an I/O error with the path being written.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Any failure of a mesh preparation or validation run.
#[derive(Debug, Error)]
pub enum GradmeshError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Capability(#[from] CapabilityError),

    #[error(transparent)]
    Output(#[from] OutputError),

    #[error(transparent)]
    Harness(#[from] crate::harness::HarnessError),
}
