//! 2D domain bounds.

use std::fmt;

/// Rectangular channel domain.
///
/// The wall sits at `y_min`; the central band of the horizontal squash is
/// centred on `x = 0`.
///
/// # Example
///
/// ```
/// use gradmesh::types::Bounds2D;
///
/// let bounds = Bounds2D::new(-3.63, 3.63, 0.0, 5.13);
///
/// assert!((bounds.width() - 7.26).abs() < 1e-12);
/// assert_eq!(bounds.height(), 5.13);
/// assert!(bounds.contains(0.0, 1.0));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds2D {
    /// Left end of the channel
    pub x_min: f64,
    /// Right end of the channel
    pub x_max: f64,
    /// Wall
    pub y_min: f64,
    /// Top of the domain
    pub y_max: f64,
}

impl Bounds2D {
    /// Create new domain bounds.
    ///
    /// # Panics
    ///
    /// Panics if `x_max <= x_min` or `y_max <= y_min`.
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Self {
        assert!(
            x_max > x_min,
            "x_max ({}) must be greater than x_min ({})",
            x_max,
            x_min
        );
        assert!(
            y_max > y_min,
            "y_max ({}) must be greater than y_min ({})",
            y_max,
            y_min
        );

        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    /// Channel of the given height standing on the wall `y = 0`.
    pub fn channel(x_left: f64, x_right: f64, height: f64) -> Self {
        Self::new(x_left, x_right, 0.0, height)
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Check if a point is inside the domain (inclusive).
    #[inline]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x_min && x <= self.x_max && y >= self.y_min && y <= self.y_max
    }

    /// Whether `[-half_width, half_width]` fits strictly inside `[x_min, x_max]`.
    #[inline]
    pub fn fits_central_band(&self, half_width: f64) -> bool {
        half_width > 0.0 && -half_width > self.x_min && half_width < self.x_max
    }
}

impl fmt::Display for Bounds2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:.2}, {:.2}] × [{:.2}, {:.2}]",
            self.x_min, self.x_max, self.y_min, self.y_max
        )
    }
}
