//! Gauss-Legendre nodes and weights.
//!
//! The n-point rule uses the roots of P_n and integrates polynomials of
//! degree 2n - 1 exactly on [-1, 1].

use std::f64::consts::PI;

/// Evaluate P_n(x) and P'_n(x) with the three-term recurrence.
///
/// (k+1) P_{k+1} = (2k+1) x P_k - k P_{k-1}
///
/// Only valid for |x| < 1 when n > 1 (the derivative formula divides by
/// x² - 1); Gauss nodes are strictly interior so this never bites here.
pub fn legendre_and_derivative(n: usize, x: f64) -> (f64, f64) {
    match n {
        0 => return (1.0, 0.0),
        1 => return (x, 1.0),
        _ => {}
    }

    let mut p_prev = 1.0;
    let mut p_curr = x;
    for k in 1..n {
        let p_next = ((2 * k + 1) as f64 * x * p_curr - k as f64 * p_prev) / (k + 1) as f64;
        p_prev = p_curr;
        p_curr = p_next;
    }

    let dp = n as f64 * (x * p_curr - p_prev) / (x * x - 1.0);
    (p_curr, dp)
}

/// One-dimensional Gauss-Legendre rule.
#[derive(Clone, Debug)]
pub struct GaussRule {
    /// Nodes in (-1, 1), ascending.
    pub nodes: Vec<f64>,
    /// Weights, summing to 2.
    pub weights: Vec<f64>,
}

impl GaussRule {
    /// Build the `n_points` rule by Newton iteration from Chebyshev guesses.
    ///
    /// # Panics
    ///
    /// Panics if `n_points` is zero.
    pub fn new(n_points: usize) -> Self {
        assert!(n_points > 0, "Gauss rule needs at least one point");
        let n = n_points;

        let mut nodes = vec![0.0; n];
        let mut weights = vec![0.0; n];

        // Roots are symmetric; solve for the upper half and mirror.
        for i in 0..n.div_ceil(2) {
            let mut x = (PI * (i as f64 + 0.75) / (n as f64 + 0.5)).cos();
            for _ in 0..100 {
                let (p, dp) = legendre_and_derivative(n, x);
                let dx = p / dp;
                x -= dx;
                if dx.abs() < 1e-15 {
                    break;
                }
            }
            let (_, dp) = legendre_and_derivative(n, x);
            let w = 2.0 / ((1.0 - x * x) * dp * dp);

            nodes[i] = -x;
            nodes[n - 1 - i] = x;
            weights[i] = w;
            weights[n - 1 - i] = w;
        }

        // Odd rules have the exact root at the origin.
        if n % 2 == 1 {
            nodes[n / 2] = 0.0;
        }

        Self { nodes, weights }
    }

    /// Number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Tensor-product points `(r, s, w)` on the reference square.
    pub fn tensor_points(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        self.nodes.iter().zip(&self.weights).flat_map(move |(&s, &ws)| {
            self.nodes
                .iter()
                .zip(&self.weights)
                .map(move |(&r, &wr)| (r, s, wr * ws))
        })
    }
}
