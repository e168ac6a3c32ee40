//! Exponential boundary-layer clustering.

use super::{CoordinateMap, TransformCoefficients};
use crate::types::Axis;

/// Vertical clustering transform.
///
/// With `η = y - y_min`, `H = y_max - y_min`, blend height `b`, sharpness
/// `a`, slope `s` and normalising factor `N`:
///
/// ```text
/// η <= b :  y_min + H (e^(a η / b) - 1) / (e^a - 1) / N
/// η >  b :  y_min + H (1 + s (η - b)) / N
/// ```
///
/// Value and slope agree at `η = b`, the wall and the top are fixed, and
/// the map is strictly increasing. As `a → 0` it tends to the identity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VerticalClustering {
    coefficients: TransformCoefficients,
}

impl VerticalClustering {
    pub fn new(coefficients: TransformCoefficients) -> Self {
        Self { coefficients }
    }

    pub fn coefficients(&self) -> &TransformCoefficients {
        &self.coefficients
    }

    /// `(e^(a r) - 1) / (e^a - 1)` for `r` in `[0, 1]`, without overflow.
    fn exp_ratio(&self, r: f64) -> f64 {
        let a = self.coefficients.sharpness;
        (a * (r - 1.0)).exp() * (-a * r).exp_m1() / (-a).exp_m1()
    }

    /// Exponential branch, evaluated regardless of which side of the blend
    /// height `y` lies on.
    pub fn exponential_branch(&self, y: f64) -> f64 {
        let c = &self.coefficients;
        let r = (y - c.y_min) / c.blend_height;
        c.y_min + c.height() * self.exp_ratio(r) / c.normalising_factor
    }

    /// Linear branch, evaluated regardless of which side of the blend
    /// height `y` lies on.
    pub fn linear_branch(&self, y: f64) -> f64 {
        let c = &self.coefficients;
        let eta = y - c.y_min;
        c.y_min + c.height() * (1.0 + c.slope * (eta - c.blend_height)) / c.normalising_factor
    }

    fn exponential_slope(&self, y: f64) -> f64 {
        let c = &self.coefficients;
        let r = (y - c.y_min) / c.blend_height;
        let a = c.sharpness;
        // d/dy of the ratio is (a / b) e^(a r) / (e^a - 1) = (a / b) e^(a (r - 1)) / (1 - e^-a)
        let dratio = a / c.blend_height * (a * (r - 1.0)).exp() / -(-a).exp_m1();
        c.height() * dratio / c.normalising_factor
    }

    fn in_exponential_region(&self, y: f64) -> bool {
        y - self.coefficients.y_min <= self.coefficients.blend_height
    }
}

impl CoordinateMap for VerticalClustering {
    fn axis(&self) -> Axis {
        Axis::Vertical
    }

    fn map(&self, y: f64) -> f64 {
        if self.in_exponential_region(y) {
            self.exponential_branch(y)
        } else {
            self.linear_branch(y)
        }
    }

    fn derivative(&self, y: f64) -> f64 {
        if self.in_exponential_region(y) {
            self.exponential_slope(y)
        } else {
            let c = &self.coefficients;
            c.height() * c.slope / c.normalising_factor
        }
    }

    fn name(&self) -> &'static str {
        "exponential clustering"
    }

    fn description(&self) -> String {
        let c = &self.coefficients;
        format!(
            "exponential clustering (alpha={}, blend={:.4}, outer edge={:.4})",
            c.sharpness,
            c.y_min + c.blend_height,
            c.outer_edge()
        )
    }
}
