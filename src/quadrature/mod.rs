//! Numerical quadrature on the reference square.
//!
//! Element integrals (measure, squared recovery error) are evaluated with
//! tensor-product Gauss-Legendre rules on `[-1, 1]²`, mapped to physical
//! space through the bilinear element Jacobian.

mod gauss;

pub use gauss::{GaussRule, legendre_and_derivative};
