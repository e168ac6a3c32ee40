//! Bilinear quadrilateral element.

use std::fmt;
use std::sync::{Arc, OnceLock};

use super::{Node, VorticityElement};
use crate::error::CapabilityError;
use crate::field::{N_QUANTITIES, SyntheticField, VorticityQuantity};
use crate::quadrature::GaussRule;

/// Gauss points per direction for element integrals.
pub const ERROR_QUADRATURE_POINTS: usize = 4;

fn error_rule() -> &'static GaussRule {
    static RULE: OnceLock<GaussRule> = OnceLock::new();
    RULE.get_or_init(|| GaussRule::new(ERROR_QUADRATURE_POINTS))
}

/// Bilinear shape functions at `(r, s)` in `[-1, 1]²`, corners counter-clockwise
/// from `(-1, -1)`.
#[inline]
pub fn bilinear_shape(r: f64, s: f64) -> [f64; 4] {
    [
        (1.0 - r) * (1.0 - s) / 4.0,
        (1.0 + r) * (1.0 - s) / 4.0,
        (1.0 + r) * (1.0 + s) / 4.0,
        (1.0 - r) * (1.0 + s) / 4.0,
    ]
}

/// Recovered quantities at the four corners of an element.
pub type CornerValues = [[f64; N_QUANTITIES]; 4];

/// Four-node quadrilateral.
///
/// Besides its corner node indices the element carries what vorticity
/// recovery needs: the analytic evaluator errors are measured against, the
/// pin state of its smoothed vorticity, and the recovered corner values.
#[derive(Clone)]
pub struct QuadElement {
    index: usize,
    corners: [usize; 4],
    exact: Option<Arc<dyn SyntheticField>>,
    smoothed_pinned: bool,
    recovered: Option<CornerValues>,
}

impl fmt::Debug for QuadElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuadElement")
            .field("index", &self.index)
            .field("corners", &self.corners)
            .field("exact", &self.exact.as_ref().map(|e| e.name()))
            .field("smoothed_pinned", &self.smoothed_pinned)
            .field("recovered", &self.recovered.is_some())
            .finish()
    }
}

impl QuadElement {
    pub fn new(index: usize, corners: [usize; 4]) -> Self {
        Self {
            index,
            corners,
            exact: None,
            smoothed_pinned: false,
            recovered: None,
        }
    }

    /// Child of `parent` after refinement: same exact field and pin state,
    /// no recovered data.
    pub fn child_of(parent: &QuadElement, index: usize, corners: [usize; 4]) -> Self {
        Self {
            index,
            corners,
            exact: parent.exact.clone(),
            smoothed_pinned: parent.smoothed_pinned,
            recovered: None,
        }
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Corner node indices, counter-clockwise from bottom-left.
    #[inline]
    pub fn corners(&self) -> [usize; 4] {
        self.corners
    }

    #[inline]
    pub fn is_smoothed_pinned(&self) -> bool {
        self.smoothed_pinned
    }

    pub fn exact_field(&self) -> Option<&Arc<dyn SyntheticField>> {
        self.exact.as_ref()
    }

    pub fn recovered(&self) -> Option<&CornerValues> {
        self.recovered.as_ref()
    }

    /// Store recovered corner values.
    ///
    /// # Errors
    ///
    /// [`CapabilityError::SmoothedVorticityFree`] unless the smoothed
    /// vorticity has been pinned.
    pub fn set_recovered(&mut self, values: CornerValues) -> Result<(), CapabilityError> {
        if !self.smoothed_pinned {
            return Err(CapabilityError::SmoothedVorticityFree {
                element: self.index,
            });
        }
        self.recovered = Some(values);
        Ok(())
    }

    fn corner_positions(&self, nodes: &[Node]) -> [[f64; 2]; 4] {
        self.corners.map(|c| nodes[c].x)
    }

    /// Physical position and Jacobian determinant at `(r, s)`.
    pub fn map_point(&self, nodes: &[Node], r: f64, s: f64) -> ([f64; 2], f64) {
        let p = self.corner_positions(nodes);
        let n = bilinear_shape(r, s);

        let mut x = [0.0; 2];
        for k in 0..4 {
            x[0] += n[k] * p[k][0];
            x[1] += n[k] * p[k][1];
        }

        // Shape-function derivatives
        let dn_dr = [-(1.0 - s) / 4.0, (1.0 - s) / 4.0, (1.0 + s) / 4.0, -(1.0 + s) / 4.0];
        let dn_ds = [-(1.0 - r) / 4.0, -(1.0 + r) / 4.0, (1.0 + r) / 4.0, (1.0 - r) / 4.0];

        let (mut xr, mut xs, mut yr, mut ys) = (0.0, 0.0, 0.0, 0.0);
        for k in 0..4 {
            xr += dn_dr[k] * p[k][0];
            xs += dn_ds[k] * p[k][0];
            yr += dn_dr[k] * p[k][1];
            ys += dn_ds[k] * p[k][1];
        }

        (x, xr * ys - xs * yr)
    }

    fn require_recovery(&self) -> Result<(&CornerValues, &Arc<dyn SyntheticField>), CapabilityError> {
        let recovered = self
            .recovered
            .as_ref()
            .ok_or(CapabilityError::MissingRecovery {
                element: self.index,
            })?;
        let exact = self
            .exact
            .as_ref()
            .ok_or(CapabilityError::MissingExactField {
                element: self.index,
            })?;
        Ok((recovered, exact))
    }
}

impl VorticityElement for QuadElement {
    fn measure(&self, nodes: &[Node]) -> f64 {
        error_rule()
            .tensor_points()
            .map(|(r, s, w)| w * self.map_point(nodes, r, s).1)
            .sum()
    }

    fn vorticity_error_squared(
        &self,
        nodes: &[Node],
        quantity: VorticityQuantity,
    ) -> Result<f64, CapabilityError> {
        Ok(self.vorticity_errors_squared(nodes)?[quantity.index()])
    }

    fn vorticity_errors_squared(&self, nodes: &[Node]) -> Result<[f64; N_QUANTITIES], CapabilityError> {
        let (recovered, exact) = self.require_recovery()?;

        let mut out = [0.0; N_QUANTITIES];
        for (r, s, w) in error_rule().tensor_points() {
            let (x, det_j) = self.map_point(nodes, r, s);
            let shape = bilinear_shape(r, s);
            let reference = exact.vorticity(x[0], x[1]).to_array();

            for q in 0..N_QUANTITIES {
                let approx: f64 = (0..4).map(|k| shape[k] * recovered[k][q]).sum();
                let diff = approx - reference[q];
                out[q] += w * det_j * diff * diff;
            }
        }
        Ok(out)
    }

    fn set_exact_vorticity(&mut self, field: Arc<dyn SyntheticField>) {
        self.exact = Some(field);
    }

    fn pin_smoothed_vorticity(&mut self) {
        self.smoothed_pinned = true;
    }
}
