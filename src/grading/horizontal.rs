//! Piecewise-linear squash into a central band.

use super::CoordinateMap;
use crate::error::ConfigError;
use crate::types::{Axis, Bounds2D};

/// Horizontal squash transform.
///
/// The uniform interval `[x_min, x_max]` is split at the junctions
/// `left < 0 < right`. The middle piece is mapped linearly onto the band
/// `[-w, w]` (`w` the band half-width), the side pieces onto
/// `[x_min, -w]` and `[w, x_max]`:
///
/// ```text
/// left  <= x <= right :  -w + (x - left) 2w / (right - left)
/// x < left            :  -w + (x_min + w)(x - left) / (x_min - left)
/// x > right           :   w + (x_max - w)(x - right) / (x_max - right)
/// ```
///
/// Continuous at both junctions, fixes `x_min` and `x_max`, strictly
/// increasing. For symmetric junctions the middle piece is `2w x / (right - left)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HorizontalSquash {
    x_min: f64,
    x_max: f64,
    half_width: f64,
    left: f64,
    right: f64,
}

impl HorizontalSquash {
    /// Squash with explicit junctions.
    ///
    /// # Errors
    ///
    /// [`ConfigError::BandTooWide`] unless `x_min < -half_width` and
    /// `half_width < x_max`; [`ConfigError::InvalidJunctions`] unless
    /// `x_min < left < 0 < right < x_max`.
    pub fn new(
        x_min: f64,
        x_max: f64,
        half_width: f64,
        left: f64,
        right: f64,
    ) -> Result<Self, ConfigError> {
        if !(half_width > 0.0 && -half_width > x_min && half_width < x_max) {
            return Err(ConfigError::BandTooWide {
                half_width,
                x_min,
                x_max,
            });
        }
        if !(x_min < left && left < 0.0 && 0.0 < right && right < x_max) {
            return Err(ConfigError::InvalidJunctions {
                left,
                right,
                x_min,
                x_max,
            });
        }
        Ok(Self {
            x_min,
            x_max,
            half_width,
            left,
            right,
        })
    }

    /// Squash for a uniform grid of `nx` elements over `bounds` whose central
    /// `nx_mid` elements go into the band.
    ///
    /// The junctions sit `nx_mid / 2` uniform spacings either side of the
    /// origin, so `nx_mid` should be even.
    pub fn from_layout(
        bounds: &Bounds2D,
        nx: usize,
        nx_mid: usize,
        half_width: f64,
    ) -> Result<Self, ConfigError> {
        if nx == 0 {
            return Err(ConfigError::EmptyResolution { name: "horizontal" });
        }
        let dx = bounds.width() / nx as f64;
        let left = -((nx_mid / 2) as f64) * dx;
        Self::new(bounds.x_min, bounds.x_max, half_width, left, -left)
    }

    /// Junctions in the uniform coordinates.
    pub fn junctions(&self) -> (f64, f64) {
        (self.left, self.right)
    }

    pub fn half_width(&self) -> f64 {
        self.half_width
    }

    /// Slopes of the left, middle and right pieces.
    pub fn slopes(&self) -> [f64; 3] {
        let w = self.half_width;
        [
            (self.x_min + w) / (self.x_min - self.left),
            2.0 * w / (self.right - self.left),
            (self.x_max - w) / (self.x_max - self.right),
        ]
    }
}

impl CoordinateMap for HorizontalSquash {
    fn axis(&self) -> Axis {
        Axis::Horizontal
    }

    fn map(&self, x: f64) -> f64 {
        let w = self.half_width;
        let [s_left, s_mid, s_right] = self.slopes();
        if x < self.left {
            -w + s_left * (x - self.left)
        } else if x <= self.right {
            -w + s_mid * (x - self.left)
        } else {
            w + s_right * (x - self.right)
        }
    }

    fn derivative(&self, x: f64) -> f64 {
        let [s_left, s_mid, s_right] = self.slopes();
        if x < self.left {
            s_left
        } else if x <= self.right {
            s_mid
        } else {
            s_right
        }
    }

    fn name(&self) -> &'static str {
        "central squash"
    }

    fn description(&self) -> String {
        format!(
            "central squash (band ±{}, junctions {:.4}/{:.4})",
            self.half_width, self.left, self.right
        )
    }
}
