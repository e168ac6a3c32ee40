//! Per-level error accumulation.

use crate::error::CapabilityError;
use crate::field::N_QUANTITIES;
use crate::mesh::{GridMesh, VorticityElement};

/// Squared-error sums of the fourteen quantities plus the total area.
///
/// Reset per level, summed per element, square-rooted once when the level
/// is complete.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ErrorVector {
    squared: [f64; N_QUANTITIES],
    area: f64,
}

impl ErrorVector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Add one element's squared errors and measure.
    pub fn add_element(&mut self, squared: &[f64; N_QUANTITIES], measure: f64) {
        for (acc, e) in self.squared.iter_mut().zip(squared) {
            *acc += e;
        }
        self.area += measure;
    }

    /// Running squared sums.
    pub fn squared(&self) -> &[f64; N_QUANTITIES] {
        &self.squared
    }

    pub fn area(&self) -> f64 {
        self.area
    }

    /// L2 norms: square roots of the sums.
    pub fn norms(&self) -> [f64; N_QUANTITIES] {
        self.squared.map(f64::sqrt)
    }
}

/// Accumulate the squared errors of every element of `mesh`.
pub fn accumulate_errors<M: GridMesh>(mesh: &M) -> Result<ErrorVector, CapabilityError> {
    let nodes = mesh.nodes();
    let mut acc = ErrorVector::new();
    for element in mesh.elements() {
        let squared = element.vorticity_errors_squared(nodes)?;
        acc.add_element(&squared, element.measure(nodes));
    }
    Ok(acc)
}
