//! Lamb-Oseen vortex above a wall, with its image.

use super::VelocityField;
use crate::config::ChannelParameters;

/// Below this value of `r²/a²` the swirl factor takes its limit at the core.
const CORE_LIMIT: f64 = 1e-12;

/// Vortex pair initial condition.
///
/// A Lamb-Oseen vortex of core radius `a` and peak vorticity `ω0` centred at
/// `(xv, yv)`, a counter-rotating image at `(xv, -yv)` so that the wall
/// `y = 0` carries no normal flow, and a uniform background flow `K` in `x`.
///
/// The azimuthal velocity is `u_θ(r) = ω0 a² / (2r) (1 - exp(-r²/a²))`.
/// Written in Cartesian form it involves `u_θ / r`, which is 0/0 at each
/// centre; there it is replaced by its limit `ω0 / 2`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VortexPairField {
    center: [f64; 2],
    core_radius: f64,
    peak_vorticity: f64,
    background: f64,
}

impl VortexPairField {
    pub fn new(center: [f64; 2], core_radius: f64, peak_vorticity: f64, background: f64) -> Self {
        assert!(
            core_radius > 0.0,
            "core radius must be positive, got {}",
            core_radius
        );
        Self {
            center,
            core_radius,
            peak_vorticity,
            background,
        }
    }

    /// Vortex pair described by the channel parameters.
    pub fn from_parameters(params: &ChannelParameters) -> Self {
        Self::new(
            params.vortex_center,
            params.vortex_core_radius,
            params.vortex_peak_vorticity,
            params.background_flow,
        )
    }

    pub fn background(&self) -> f64 {
        self.background
    }

    /// `u_θ / r` for a vortex at squared distance `r2`.
    fn swirl(&self, r2: f64) -> f64 {
        let q = r2 / (self.core_radius * self.core_radius);
        let shape = if q < CORE_LIMIT {
            1.0
        } else {
            -(-q).exp_m1() / q
        };
        0.5 * self.peak_vorticity * shape
    }

    /// Scalar vorticity `∂v/∂x - ∂u/∂y`.
    pub fn vorticity(&self, x: f64, y: f64) -> f64 {
        let a2 = self.core_radius * self.core_radius;
        let [xv, yv] = self.center;
        let dx = x - xv;
        let q1 = (dx * dx + (y - yv) * (y - yv)) / a2;
        let q2 = (dx * dx + (y + yv) * (y + yv)) / a2;
        self.peak_vorticity * ((-q1).exp() - (-q2).exp())
    }
}

impl VelocityField for VortexPairField {
    fn velocity(&self, x: f64, y: f64) -> [f64; 2] {
        let [xv, yv] = self.center;
        let dx = x - xv;
        let dy1 = y - yv;
        let dy2 = y + yv;

        let s1 = self.swirl(dx * dx + dy1 * dy1);
        let s2 = self.swirl(dx * dx + dy2 * dy2);

        [-s1 * dy1 + s2 * dy2 + self.background, s1 * dx - s2 * dx]
    }
}
