//! Coefficients of the vertical clustering transform.

use crate::error::ConfigError;

/// Slope of the linear branch that makes the clustering transform C¹ at
/// the blend height.
///
/// Mathematically `alpha * e^alpha / (blend_height * (e^alpha - 1))`,
/// evaluated as `alpha / (blend_height * (1 - e^-alpha))` so that neither
/// small nor large sharpness loses precision or overflows.
///
/// # Errors
///
/// [`ConfigError::DegenerateSharpness`] unless `sharpness` is positive and
/// finite (at zero the denominator `e^alpha - 1` vanishes), and
/// [`ConfigError::NonPositive`] unless `blend_height` is.
///
/// ```
/// use gradmesh::grading::derivative_matching_slope;
///
/// let slope = derivative_matching_slope(5.0, 2.565).unwrap();
/// let direct = 5.0 * 5f64.exp() / (2.565 * 5f64.exp_m1());
/// assert!((slope - direct).abs() < 1e-12);
///
/// assert!(derivative_matching_slope(0.0, 2.565).is_err());
/// ```
pub fn derivative_matching_slope(sharpness: f64, blend_height: f64) -> Result<f64, ConfigError> {
    if !(sharpness > 0.0 && sharpness.is_finite()) {
        return Err(ConfigError::DegenerateSharpness { sharpness });
    }
    if !(blend_height > 0.0 && blend_height.is_finite()) {
        return Err(ConfigError::NonPositive {
            name: "blend height",
            value: blend_height,
        });
    }
    Ok(sharpness / (blend_height * -(-sharpness).exp_m1()))
}

/// Fully resolved coefficients of [`VerticalClustering`](super::VerticalClustering).
///
/// Invariants: `sharpness > 0`, `0 < blend_height <= y_max - y_min`,
/// `normalising_factor >= 1`. All lengths except `y_min`/`y_max` are
/// measured from the wall `y_min`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformCoefficients {
    /// Blend height in the uniform coordinates, above the wall
    pub blend_height: f64,
    pub sharpness: f64,
    /// Slope of the linear branch before normalisation
    pub slope: f64,
    /// `1 + slope * (height - blend_height)`
    pub normalising_factor: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl TransformCoefficients {
    /// Derive all coefficients from the sharpness and blend height.
    pub fn new(sharpness: f64, blend_height: f64, y_min: f64, y_max: f64) -> Result<Self, ConfigError> {
        let height = y_max - y_min;
        if !(blend_height > 0.0 && blend_height <= height) {
            return Err(ConfigError::InvalidBlendHeight {
                blend_height,
                height,
            });
        }
        let slope = derivative_matching_slope(sharpness, blend_height)?;
        let normalising_factor = 1.0 + slope * (height - blend_height);

        Ok(Self {
            blend_height,
            sharpness,
            slope,
            normalising_factor,
            y_min,
            y_max,
        })
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// Mapped position of the blend height: the outer edge of the
    /// exponential region.
    #[inline]
    pub fn outer_edge(&self) -> f64 {
        self.y_min + self.height() / self.normalising_factor
    }
}
