//! Analytic velocity fields.
//!
//! - [`SinCosField`]: separable sinusoidal field over the domain extent, used
//!   only to measure recovery accuracy. Entire in both coordinates, so it is
//!   safe to evaluate anywhere.
//! - [`VortexPairField`]: Lamb-Oseen vortex above the wall, its image below
//!   it and a uniform background flow; the physical initial condition. Its
//!   closed form is 0/0 at each vortex centre; the removable singularity is
//!   evaluated by its limit, and nowhere else is it singular.
//!
//! Fields implement [`VelocityField`]; those that also know their vorticity
//! and derivatives implement [`SyntheticField`] and can drive the
//! convergence harness.

mod quantities;
mod sincos;
mod vortex_pair;

pub use quantities::{N_QUANTITIES, VorticityDerivatives, VorticityQuantity};
pub use sincos::SinCosField;
pub use vortex_pair::VortexPairField;

/// Closed-form velocity `(u, v)` as a function of position.
pub trait VelocityField: Send + Sync {
    fn velocity(&self, x: f64, y: f64) -> [f64; 2];
}

/// Velocity field with known vorticity, its derivatives up to third order
/// and the velocity-gradient tensor.
pub trait SyntheticField: VelocityField {
    fn vorticity(&self, x: f64, y: f64) -> VorticityDerivatives;

    /// Human-readable name for logging.
    fn name(&self) -> &'static str;
}
