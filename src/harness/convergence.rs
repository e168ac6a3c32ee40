//! The refinement loop.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use super::{ConvergenceTable, HarnessError, Phase, RefinementLevel, TABLE_FILE_NAME, accumulate_errors};
use crate::field::{SyntheticField, VorticityQuantity};
use crate::io::SolutionDocumenter;
use crate::mesh::{GridMesh, UniformRefinement, VorticityElement};
use crate::recovery::VorticityRecovery;

/// Result of a completed harness run.
#[derive(Clone, Debug)]
pub struct HarnessReport {
    /// One entry per level, in order
    pub rows: Vec<RefinementLevel>,
    pub table_path: PathBuf,
}

impl HarnessReport {
    /// Observed convergence order of `quantity` between consecutive levels,
    /// `log2(e_k / e_{k+1})` for a halved mesh size.
    pub fn observed_orders(&self, quantity: VorticityQuantity) -> Vec<f64> {
        self.rows
            .windows(2)
            .map(|w| (w[0].error(quantity) / w[1].error(quantity)).log2())
            .collect()
    }
}

/// Convergence harness over a fixed number of refinement levels.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use gradmesh::field::SinCosField;
/// use gradmesh::harness::ConvergenceHarness;
/// use gradmesh::io::VtkDocumenter;
/// use gradmesh::mesh::QuadMesh;
/// use gradmesh::recovery::PatchRecovery;
/// use gradmesh::types::{Bounds2D, Resolution2D};
///
/// let bounds = Bounds2D::channel(-3.63, 3.63, 5.13);
/// let mut mesh = QuadMesh::uniform(Resolution2D::square(10), bounds);
/// let mut doc = VtkDocumenter::new("RESLT");
///
/// let harness = ConvergenceHarness::new(PatchRecovery, 5, "RESLT");
/// let report = harness
///     .run(&mut mesh, Arc::new(SinCosField::from_bounds(&bounds)), &mut doc)
///     .unwrap();
/// assert_eq!(report.rows.len(), 5);
/// ```
pub struct ConvergenceHarness<R> {
    recovery: R,
    levels: usize,
    output_dir: PathBuf,
}

impl<R> ConvergenceHarness<R> {
    pub fn new(recovery: R, levels: usize, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            recovery,
            levels,
            output_dir: output_dir.into(),
        }
    }

    pub fn levels(&self) -> usize {
        self.levels
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Run every level on `mesh`, measuring against `field`.
    ///
    /// The mesh is refined in place between levels and is left at the
    /// resolution of the last level.
    pub fn run<M, D>(
        &self,
        mesh: &mut M,
        field: Arc<dyn SyntheticField>,
        documenter: &mut D,
    ) -> Result<HarnessReport, HarnessError>
    where
        M: GridMesh + UniformRefinement,
        R: VorticityRecovery<M>,
        D: SolutionDocumenter<M>,
    {
        if self.levels == 0 {
            return Err(HarnessError::NoLevels);
        }

        info!(
            field = field.name(),
            recovery = self.recovery.name(),
            levels = self.levels,
            "starting vorticity recovery convergence check"
        );

        // INIT
        complete_element_setup(mesh, &field);
        let table = ConvergenceTable::create(self.output_dir.join(TABLE_FILE_NAME)).map_err(
            |source| HarnessError::Output {
                level: 0,
                phase: Phase::Init,
                source,
            },
        )?;

        let mut rows = Vec::with_capacity(self.levels);
        for level in 0..self.levels {
            let capability = |phase| {
                move |source| HarnessError::Capability {
                    level,
                    phase,
                    source,
                }
            };

            // ASSIGN_FIELD
            for node in mesh.nodes_mut() {
                node.values = field.velocity(node.x[0], node.x[1]);
            }

            // RECOVER
            self.recovery
                .recover_vorticity(mesh)
                .map_err(capability(Phase::Recover))?;

            // ACCUMULATE_ERROR
            let acc = accumulate_errors(&*mesh).map_err(capability(Phase::AccumulateError))?;
            let errors = acc.norms();
            if let Some(q) = VorticityQuantity::ALL
                .into_iter()
                .find(|q| !errors[q.index()].is_finite())
            {
                return Err(HarnessError::NonFinite { level, quantity: q });
            }

            // EMIT_ROW
            let n_elements = mesh.n_elements();
            let row = RefinementLevel {
                iteration: level,
                n_elements,
                characteristic_length: (1.0 / n_elements as f64).sqrt(),
                errors,
                area: acc.area(),
            };
            let output = |source| HarnessError::Output {
                level,
                phase: Phase::EmitRow,
                source,
            };
            documenter
                .document(&*mesh, Some(field.as_ref()))
                .map_err(output)?;
            table.append(&row).map_err(output)?;

            info!(
                level,
                n_elements,
                vorticity_error = row.error(VorticityQuantity::Vorticity),
                area = row.area,
                "completed level"
            );
            rows.push(row);

            // REFINE
            if level + 1 < self.levels {
                mesh.refine_uniformly().map_err(capability(Phase::Refine))?;
                complete_element_setup(mesh, &field);
            }
        }

        debug!(phase = %Phase::Done, "convergence check finished");
        Ok(HarnessReport {
            rows,
            table_path: table.path().to_path_buf(),
        })
    }
}

/// Give every element the exact evaluator and pin its smoothed vorticity.
pub(crate) fn complete_element_setup<M: GridMesh>(mesh: &mut M, field: &Arc<dyn SyntheticField>) {
    for element in mesh.elements_mut() {
        element.set_exact_vorticity(Arc::clone(field));
        element.pin_smoothed_vorticity();
    }
}
