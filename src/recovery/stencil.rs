//! Five-point finite-difference weights on non-uniform grid lines.

use faer::{Mat, linalg::solvers::Solve};

use crate::error::CapabilityError;

/// Points per stencil.
pub const STENCIL_POINTS: usize = 5;

/// Highest derivative order a stencil provides.
pub const MAX_DERIVATIVE: usize = STENCIL_POINTS - 1;

/// Derivative weights at one grid point.
///
/// `weights[m][k]` multiplies the value at point `start + k` in the
/// approximation of the `m`-th derivative.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineStencil {
    pub start: usize,
    pub weights: [[f64; STENCIL_POINTS]; MAX_DERIVATIVE + 1],
}

impl LineStencil {
    /// Stencil for point `i` of the grid line `coords`.
    ///
    /// The five points are centred on `i` where possible and shifted
    /// inwards near the ends. Weights are exact for polynomials of degree
    /// four. They come from the moment conditions
    /// `Σ_k w_k (x_k - x_i)^p = m! δ_pm`, solved in scaled form with a
    /// fully pivoted LU.
    pub fn new(coords: &[f64], i: usize) -> Result<Self, CapabilityError> {
        let n = coords.len();
        if n < STENCIL_POINTS {
            return Err(CapabilityError::Recovery(format!(
                "grid line has {} points, stencils need {}",
                n, STENCIL_POINTS
            )));
        }
        let start = i.saturating_sub(2).min(n - STENCIL_POINTS);
        let xs = &coords[start..start + STENCIL_POINTS];

        let h = (xs[STENCIL_POINTS - 1] - xs[0]) / MAX_DERIVATIVE as f64;
        if !(h > 0.0) {
            return Err(CapabilityError::Recovery(format!(
                "degenerate stencil at point {}: span {}",
                i,
                xs[STENCIL_POINTS - 1] - xs[0]
            )));
        }

        // A[p][k] = t_k^p with t_k = (x_k - x_i) / h
        let mut a = Mat::zeros(STENCIL_POINTS, STENCIL_POINTS);
        for (k, &x) in xs.iter().enumerate() {
            let t = (x - coords[i]) / h;
            let mut tp = 1.0;
            for p in 0..STENCIL_POINTS {
                a[(p, k)] = tp;
                tp *= t;
            }
        }

        // Right-hand sides: m! / h^m in row m of column m
        let mut d = Mat::zeros(STENCIL_POINTS, STENCIL_POINTS);
        let mut factorial = 1.0;
        for m in 0..STENCIL_POINTS {
            if m > 0 {
                factorial *= m as f64;
            }
            d[(m, m)] = factorial / h.powi(m as i32);
        }

        let lu = a.as_ref().full_piv_lu();
        let w = lu.solve(&d);

        let mut weights = [[0.0; STENCIL_POINTS]; MAX_DERIVATIVE + 1];
        for (m, row) in weights.iter_mut().enumerate() {
            for (k, wk) in row.iter_mut().enumerate() {
                *wk = w[(k, m)];
                if !wk.is_finite() {
                    return Err(CapabilityError::Recovery(format!(
                        "singular stencil at point {}",
                        i
                    )));
                }
            }
        }

        Ok(Self { start, weights })
    }

    /// `m`-th derivative of the grid-line values `f` at this stencil's point.
    #[inline]
    pub fn apply(&self, m: usize, f: impl Fn(usize) -> f64) -> f64 {
        self.weights[m]
            .iter()
            .enumerate()
            .map(|(k, w)| w * f(self.start + k))
            .sum()
    }
}

/// Stencils for every point of a grid line.
pub fn line_stencils(coords: &[f64]) -> Result<Vec<LineStencil>, CapabilityError> {
    (0..coords.len()).map(|i| LineStencil::new(coords, i)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-9;

    fn graded_line() -> Vec<f64> {
        (0..9).map(|k| (0.3 * k as f64).exp() - 1.0).collect()
    }

    #[test]
    fn test_uniform_central_weights() {
        let xs: Vec<f64> = (0..5).map(|k| 0.1 * k as f64).collect();
        let s = LineStencil::new(&xs, 2).unwrap();
        assert_eq!(s.start, 0);

        let h2 = 0.01;
        let expected = [-1.0 / 12.0, 4.0 / 3.0, -2.5, 4.0 / 3.0, -1.0 / 12.0];
        for k in 0..5 {
            let w = s.weights[2][k] * h2;
            assert!((w - expected[k]).abs() < TOL, "k={}: {} vs {}", k, w, expected[k]);
        }
    }

    #[test]
    fn test_value_weights_select_point() {
        let xs = graded_line();
        for i in 0..xs.len() {
            let s = LineStencil::new(&xs, i).unwrap();
            for k in 0..5 {
                let expected = if s.start + k == i { 1.0 } else { 0.0 };
                assert!((s.weights[0][k] - expected).abs() < TOL);
            }
        }
    }

    #[test]
    fn test_start_shifts_inwards_near_ends() {
        let xs = graded_line();
        let starts: Vec<usize> = line_stencils(&xs).unwrap().iter().map(|s| s.start).collect();
        assert_eq!(starts, vec![0, 0, 0, 1, 2, 3, 4, 4, 4]);
    }

    #[test]
    fn test_exact_for_quartics_on_graded_line() {
        let xs = graded_line();
        let f = |x: f64| 2.0 - x + 0.5 * x * x - 0.25 * x.powi(3) + 0.1 * x.powi(4);
        let derivs = |x: f64| {
            [
                f(x),
                -1.0 + x - 0.75 * x * x + 0.4 * x.powi(3),
                1.0 - 1.5 * x + 1.2 * x * x,
                -1.5 + 2.4 * x,
                2.4,
            ]
        };

        for (i, s) in line_stencils(&xs).unwrap().iter().enumerate() {
            let exact = derivs(xs[i]);
            for m in 0..=MAX_DERIVATIVE {
                let approx = s.apply(m, |k| f(xs[k]));
                let scale = 1.0 + exact[m].abs();
                assert!(
                    (approx - exact[m]).abs() < 1e-7 * scale,
                    "point {}, derivative {}: {} vs {}",
                    i,
                    m,
                    approx,
                    exact[m]
                );
            }
        }
    }

    #[test]
    fn test_short_line_rejected() {
        let xs = [0.0, 1.0, 2.0, 3.0];
        assert!(matches!(
            LineStencil::new(&xs, 1),
            Err(CapabilityError::Recovery(_))
        ));
    }
}
