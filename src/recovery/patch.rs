//! Tensor-product stencil recovery on rectilinear meshes.

use tracing::debug;

use super::{LineStencil, MAX_DERIVATIVE, VorticityRecovery, line_stencils};
use crate::error::CapabilityError;
use crate::field::N_QUANTITIES;
use crate::mesh::{GridMesh, QuadMesh};

/// Relative tolerance for the rectilinear check.
const RECTILINEAR_TOL: f64 = 1e-10;

/// Mixed partial derivatives `∂^(a+b) f / ∂x^a ∂y^b`, indexed `[a][b]`.
type DerivativeTable = [[f64; MAX_DERIVATIVE + 1]; MAX_DERIVATIVE + 1];

/// Recovery by five-point stencils along the grid lines.
///
/// Each velocity component is differentiated at every node with the
/// tensor product of the x and y line stencils, giving all mixed partials
/// up to total order four. The fourteen quantities follow from
/// `ω = ∂v/∂x - ∂u/∂y` and are stored per element as corner values.
///
/// Applies to meshes whose grid lines are straight and axis-aligned, which
/// is what the separable grading transforms and uniform refinement
/// produce. Exact for velocities that are quartic in each coordinate.
#[derive(Clone, Copy, Debug, Default)]
pub struct PatchRecovery;

impl PatchRecovery {
    pub fn new() -> Self {
        Self
    }

    /// Grid-line coordinates, or an error if the mesh is not rectilinear.
    fn grid_lines(mesh: &QuadMesh) -> Result<(Vec<f64>, Vec<f64>), CapabilityError> {
        let res = mesh.resolution();
        let (nx, ny) = (res.nx(), res.ny());
        let xs: Vec<f64> = (0..=nx).map(|i| mesh.node(i, 0).x[0]).collect();
        let ys: Vec<f64> = (0..=ny).map(|j| mesh.node(0, j).x[1]).collect();

        let bounds = mesh.bounds();
        let tol = RECTILINEAR_TOL * bounds.width().max(bounds.height());
        for j in 0..=ny {
            for i in 0..=nx {
                let [x, y] = mesh.node(i, j).x;
                if (x - xs[i]).abs() > tol || (y - ys[j]).abs() > tol {
                    return Err(CapabilityError::Recovery(format!(
                        "mesh is not rectilinear at node ({}, {})",
                        i, j
                    )));
                }
            }
        }
        Ok((xs, ys))
    }

    fn derivative_table(
        mesh: &QuadMesh,
        sx: &LineStencil,
        sy: &LineStencil,
        component: usize,
    ) -> DerivativeTable {
        let mut table = [[0.0; MAX_DERIVATIVE + 1]; MAX_DERIVATIVE + 1];
        for a in 0..=MAX_DERIVATIVE {
            for b in 0..=(MAX_DERIVATIVE - a) {
                table[a][b] = sy.apply(b, |j| sx.apply(a, |i| mesh.node(i, j).values[component]));
            }
        }
        table
    }

    /// Quantities in column order from the velocity derivative tables.
    fn quantities(u: &DerivativeTable, v: &DerivativeTable) -> [f64; N_QUANTITIES] {
        [
            v[1][0] - u[0][1],
            v[2][0] - u[1][1],
            v[1][1] - u[0][2],
            v[3][0] - u[2][1],
            v[2][1] - u[1][2],
            v[1][2] - u[0][3],
            v[4][0] - u[3][1],
            v[3][1] - u[2][2],
            v[2][2] - u[1][3],
            v[1][3] - u[0][4],
            u[1][0],
            u[0][1],
            v[1][0],
            v[0][1],
        ]
    }
}

impl VorticityRecovery<QuadMesh> for PatchRecovery {
    fn recover_vorticity(&self, mesh: &mut QuadMesh) -> Result<(), CapabilityError> {
        let res = mesh.resolution();
        if res.nx() < MAX_DERIVATIVE || res.ny() < MAX_DERIVATIVE {
            return Err(CapabilityError::Recovery(format!(
                "stencil recovery needs at least {} elements per direction, mesh is {}",
                MAX_DERIVATIVE, res
            )));
        }
        if let Some(e) = mesh.elements().iter().find(|e| !e.is_smoothed_pinned()) {
            return Err(CapabilityError::SmoothedVorticityFree { element: e.index() });
        }

        let (xs, ys) = Self::grid_lines(mesh)?;
        let sx = line_stencils(&xs)?;
        let sy = line_stencils(&ys)?;

        let nodal: Vec<[f64; N_QUANTITIES]> = (0..=res.ny())
            .flat_map(|j| (0..=res.nx()).map(move |i| (i, j)))
            .map(|(i, j)| {
                let u = Self::derivative_table(mesh, &sx[i], &sy[j], 0);
                let v = Self::derivative_table(mesh, &sx[i], &sy[j], 1);
                Self::quantities(&u, &v)
            })
            .collect();

        for element in mesh.elements_mut() {
            let corners = element.corners().map(|c| nodal[c]);
            element.set_recovered(corners)?;
        }

        debug!(resolution = %res, "recovered vorticity");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "five-point stencil"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{SyntheticField, VelocityField, VorticityDerivatives};
    use crate::grading::{self, CoordinateMap, HorizontalSquash, TransformCoefficients, VerticalClustering};
    use crate::mesh::VorticityElement;
    use crate::types::{Bounds2D, Resolution2D};
    use std::sync::Arc;

    /// `u = x²y² + x³y`, `v = x⁴ + xy³`: quartic in each coordinate.
    struct Quartic;

    impl VelocityField for Quartic {
        fn velocity(&self, x: f64, y: f64) -> [f64; 2] {
            [x * x * y * y + x.powi(3) * y, x.powi(4) + x * y.powi(3)]
        }
    }

    impl SyntheticField for Quartic {
        fn vorticity(&self, x: f64, y: f64) -> VorticityDerivatives {
            VorticityDerivatives {
                vorticity: 3.0 * x.powi(3) + y.powi(3) - 2.0 * x * x * y,
                first: [9.0 * x * x - 4.0 * x * y, 3.0 * y * y - 2.0 * x * x],
                second: [18.0 * x - 4.0 * y, -4.0 * x, 6.0 * y],
                third: [18.0, -4.0, 0.0, 6.0],
                velocity_gradient: [
                    2.0 * x * y * y + 3.0 * x * x * y,
                    2.0 * x * x * y + x.powi(3),
                    4.0 * x.powi(3) + y.powi(3),
                    3.0 * x * y * y,
                ],
            }
        }

        fn name(&self) -> &'static str {
            "quartic"
        }
    }

    fn prepared(nx: usize, ny: usize) -> QuadMesh {
        let bounds = Bounds2D::new(-1.0, 1.0, 0.0, 1.5);
        let mut mesh = QuadMesh::uniform(Resolution2D::new(nx, ny), bounds);
        mesh.set_nodal_velocity(&Quartic);
        for e in mesh.elements_mut() {
            e.pin_smoothed_vorticity();
        }
        mesh
    }

    fn assert_corners_exact(mesh: &QuadMesh) {
        for e in mesh.elements() {
            let recovered = e.recovered().expect("recovered");
            for (k, &c) in e.corners().iter().enumerate() {
                let [x, y] = mesh.nodes()[c].x;
                let exact = Quartic.vorticity(x, y).to_array();
                for q in 0..N_QUANTITIES {
                    let tol = 1e-6 * (1.0 + exact[q].abs());
                    assert!(
                        (recovered[k][q] - exact[q]).abs() < tol,
                        "element {}, corner {}, quantity {}: {} vs {}",
                        e.index(),
                        k,
                        q,
                        recovered[k][q],
                        exact[q]
                    );
                }
            }
        }
    }

    #[test]
    fn test_exact_for_quartic_field_on_uniform_mesh() {
        let mut mesh = prepared(5, 4);
        PatchRecovery.recover_vorticity(&mut mesh).unwrap();
        assert_corners_exact(&mesh);
    }

    #[test]
    fn test_exact_for_quartic_field_on_graded_mesh() {
        let bounds = Bounds2D::new(-1.0, 1.0, 0.0, 1.5);
        let mut mesh = QuadMesh::uniform(Resolution2D::new(8, 6), bounds);

        let vertical = VerticalClustering::new(TransformCoefficients::new(2.0, 0.75, 0.0, 1.5).unwrap());
        let squash = HorizontalSquash::from_layout(&bounds, 8, 4, 0.3).unwrap();
        assert!(squash.map(0.0).abs() < 1e-12);
        grading::apply_to_mesh(&mut mesh, &vertical).unwrap();
        grading::apply_to_mesh(&mut mesh, &squash).unwrap();

        mesh.set_nodal_velocity(&Quartic);
        for e in mesh.elements_mut() {
            e.pin_smoothed_vorticity();
        }
        PatchRecovery.recover_vorticity(&mut mesh).unwrap();
        assert_corners_exact(&mesh);
    }

    #[test]
    fn test_coarse_mesh_rejected() {
        let mut mesh = prepared(3, 6);
        assert!(matches!(
            PatchRecovery.recover_vorticity(&mut mesh),
            Err(CapabilityError::Recovery(_))
        ));
    }

    #[test]
    fn test_free_smoothed_vorticity_rejected() {
        let bounds = Bounds2D::new(-1.0, 1.0, 0.0, 1.5);
        let mut mesh = QuadMesh::uniform(Resolution2D::new(4, 4), bounds);
        assert_eq!(
            PatchRecovery.recover_vorticity(&mut mesh),
            Err(CapabilityError::SmoothedVorticityFree { element: 0 })
        );
    }

    #[test]
    fn test_distorted_mesh_rejected() {
        let mut mesh = prepared(4, 4);
        let k = mesh.node_index(2, 2);
        mesh.nodes_mut()[k].x[0] += 0.01;
        assert!(matches!(
            PatchRecovery.recover_vorticity(&mut mesh),
            Err(CapabilityError::Recovery(_))
        ));
    }

    #[test]
    fn test_errors_available_after_recovery() {
        let mut mesh = prepared(4, 4);
        let field: Arc<dyn SyntheticField> = Arc::new(Quartic);
        for e in mesh.elements_mut() {
            e.set_exact_vorticity(field.clone());
        }
        PatchRecovery.recover_vorticity(&mut mesh).unwrap();
        for e in mesh.elements() {
            let errors = e.vorticity_errors_squared(mesh.nodes()).unwrap();
            // Third derivatives are constant, so their bilinear interpolant is exact.
            for q in 6..10 {
                assert!(errors[q] < 1e-12, "quantity {} error {}", q, errors[q]);
            }
        }
    }
}
