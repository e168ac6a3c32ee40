//! Separable sinusoidal validation field.

use std::f64::consts::PI;

use super::{SyntheticField, VelocityField, VorticityDerivatives};
use crate::types::Bounds2D;

/// Validation field
///
/// ```text
/// u = sin(ωx x + φ) cos(ωy y)
/// v = sin(ωx x + φ) sin(ωy y)
/// ```
///
/// with `ωx = 2π / (x_max - x_min)`, `φ = 2π x_min / (x_max - x_min)` and
/// `ωy = 2π / (y_max - y_min)`: one full period across the domain in each
/// direction. Every derivative exists in closed form.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SinCosField {
    omega_x: f64,
    phase: f64,
    omega_y: f64,
}

impl SinCosField {
    /// Field with one period over the extent of `bounds`.
    pub fn from_bounds(bounds: &Bounds2D) -> Self {
        let width = bounds.width();
        Self {
            omega_x: 2.0 * PI / width,
            phase: 2.0 * PI * bounds.x_min / width,
            omega_y: 2.0 * PI / bounds.height(),
        }
    }

    pub fn omega_x(&self) -> f64 {
        self.omega_x
    }

    pub fn omega_y(&self) -> f64 {
        self.omega_y
    }
}

impl VelocityField for SinCosField {
    fn velocity(&self, x: f64, y: f64) -> [f64; 2] {
        let sx = (self.omega_x * x + self.phase).sin();
        let (sy, cy) = (self.omega_y * y).sin_cos();
        [sx * cy, sx * sy]
    }
}

impl SyntheticField for SinCosField {
    fn vorticity(&self, x: f64, y: f64) -> VorticityDerivatives {
        let (wx, wy) = (self.omega_x, self.omega_y);
        let (sx, cx) = (wx * x + self.phase).sin_cos();
        let (sy, cy) = (wy * y).sin_cos();

        // ω = sin(ωy y) g(x) with g = ωx cos + ωy sin; g'' = -ωx² g.
        let g = wx * cx + wy * sx;
        let dg = -wx * wx * sx + wx * wy * cx;

        let vort = sy * g;
        let w_x = sy * dg;
        let w_y = wy * cy * g;

        VorticityDerivatives {
            vorticity: vort,
            first: [w_x, w_y],
            second: [-wx * wx * vort, wy * cy * dg, -wy * wy * vort],
            third: [
                -wx * wx * w_x,
                -wx * wx * w_y,
                -wy * wy * w_x,
                -wy * wy * w_y,
            ],
            velocity_gradient: [wx * cx * cy, -wy * sx * sy, wx * cx * sy, wy * sx * cy],
        }
    }

    fn name(&self) -> &'static str {
        "sin-cos"
    }
}
