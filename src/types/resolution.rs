//! 2D mesh resolution types.

use std::fmt;

/// Largest even integer not exceeding `value`, computed as `2 * floor(value / 2)`.
///
/// Element counts derived from a physical width go through this so that a
/// central band can sit symmetrically about the origin. Negative or
/// non-finite input yields zero.
///
/// ```
/// use gradmesh::types::even_floor;
///
/// assert_eq!(even_floor(90.0), 90);
/// assert_eq!(even_floor(13.8), 12);
/// assert_eq!(even_floor(1.9), 0);
/// ```
#[inline]
pub fn even_floor(value: f64) -> usize {
    if value.is_finite() && value > 0.0 {
        2 * (0.5 * value) as usize
    } else {
        0
    }
}

/// Element counts of a structured quad mesh.
///
/// # Example
///
/// ```
/// use gradmesh::types::Resolution2D;
///
/// let res = Resolution2D::new(10, 10);
/// assert_eq!(res.total_elements(), 100);
/// assert_eq!(res.refined().total_elements(), 400);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Resolution2D {
    nx: usize,
    ny: usize,
}

impl Resolution2D {
    /// Create a new resolution.
    ///
    /// # Panics
    ///
    /// Panics if either `nx` or `ny` is zero.
    pub fn new(nx: usize, ny: usize) -> Self {
        assert!(nx > 0, "nx must be positive, got {}", nx);
        assert!(ny > 0, "ny must be positive, got {}", ny);
        Self { nx, ny }
    }

    pub fn square(n: usize) -> Self {
        Self::new(n, n)
    }

    #[inline]
    pub fn nx(&self) -> usize {
        self.nx
    }

    #[inline]
    pub fn ny(&self) -> usize {
        self.ny
    }

    #[inline]
    pub fn total_elements(&self) -> usize {
        self.nx * self.ny
    }

    /// Number of nodes of the structured grid.
    #[inline]
    pub fn total_nodes(&self) -> usize {
        (self.nx + 1) * (self.ny + 1)
    }

    /// Resolution after one uniform refinement (each quad split in four).
    #[inline]
    pub fn refined(&self) -> Self {
        Self::new(2 * self.nx, 2 * self.ny)
    }

    /// Characteristic length `sqrt(1 / n_elements)` used in convergence tables.
    #[inline]
    pub fn characteristic_length(&self) -> f64 {
        (1.0 / self.total_elements() as f64).sqrt()
    }
}

impl fmt::Display for Resolution2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x {}", self.nx, self.ny)
    }
}

impl From<(usize, usize)> for Resolution2D {
    fn from((nx, ny): (usize, usize)) -> Self {
        Self::new(nx, ny)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_even_floor() {
        assert_eq!(even_floor(0.0), 0);
        assert_eq!(even_floor(2.0), 2);
        assert_eq!(even_floor(3.999), 2);
        assert_eq!(even_floor(45.0), 44);
        assert_eq!(even_floor(-4.0), 0);
        assert_eq!(even_floor(f64::NAN), 0);
    }

    #[test]
    fn test_totals() {
        let r = Resolution2D::new(10, 5);
        assert_eq!(r.total_elements(), 50);
        assert_eq!(r.total_nodes(), 66);
    }

    #[test]
    fn test_refined_quadruples_elements() {
        let r = Resolution2D::new(10, 10);
        let fine = r.refined();
        assert_eq!(fine.nx(), 20);
        assert_eq!(fine.ny(), 20);
        assert_eq!(fine.total_elements(), 4 * r.total_elements());
    }

    #[test]
    fn test_characteristic_length() {
        let r = Resolution2D::square(10);
        assert!((r.characteristic_length() - 0.1).abs() < 1e-15);
    }

    #[test]
    #[should_panic(expected = "nx must be positive")]
    fn test_zero_nx() {
        Resolution2D::new(0, 10);
    }
}
