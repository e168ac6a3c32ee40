//! The vortex/wall channel problem.
//!
//! A vortex sits above a wall at `y = 0` in the channel
//! `[x_left, x_right] x [0, height]`. Setup resolves the grid, grades it
//! (clustered towards the wall, squashed into the central band), applies
//! the boundary conditions and assigns the vortex-pair initial condition.
//!
//! Boundary conditions:
//! - top (2): `u` and `v` imposed
//! - bottom (0), right (1), left (3): `v` imposed, `u` free
//!
//! The bottom switches to no-slip later in the run through
//! [`ChannelProblem::impose_no_slip_on_bottom_boundary`].

use std::fs;
use std::sync::Arc;

use tracing::info;

use crate::config::{ChannelParameters, RunConfig};
use crate::error::{GradmeshError, OutputError};
use crate::field::{SinCosField, SyntheticField, VortexPairField};
use crate::grading::{self, GridLayout};
use crate::harness::{ConvergenceHarness, HarnessError, HarnessReport, complete_element_setup};
use crate::io::{BOUNDARIES_FILE_NAME, SolutionDocumenter, VtkDocumenter, write_boundaries, write_vtk_mesh};
use crate::mesh::{GridBoundary, GridMesh, QuadMesh, UniformRefinement};
use crate::recovery::{PatchRecovery, VorticityRecovery};
use crate::simulation::{self, FlowSolver, ScheduleReport};

const U: usize = 0;
const V: usize = 1;

/// File name of the mesh snapshot written at setup.
pub const MESH_FILE_NAME: &str = "mesh.vtu";

/// How a run ended.
#[derive(Clone, Debug)]
pub enum RunOutcome {
    /// Mesh, boundary listing and initial snapshot written
    Prepared,
    /// Recovery convergence check finished
    ValidationComplete(HarnessReport),
}

impl RunOutcome {
    /// Process exit code for this outcome.
    pub fn exit_code(&self) -> i32 {
        match self {
            RunOutcome::Prepared => 0,
            RunOutcome::ValidationComplete(_) => 3,
        }
    }
}

/// Pin `u` on the bottom boundary and set it to `wall_velocity`.
pub fn impose_no_slip<M: GridMesh>(mesh: &mut M, wall_velocity: f64) {
    let before = mesh.n_dof();
    for k in mesh.boundary_nodes(GridBoundary::Bottom) {
        let node = &mut mesh.nodes_mut()[k];
        node.pin(U);
        node.values[U] = wall_velocity;
    }
    info!(
        ndof_before = before,
        ndof_after = mesh.n_dof(),
        "imposed no slip on bottom boundary"
    );
}

/// Apply the channel's boundary conditions.
fn apply_boundary_conditions(mesh: &mut QuadMesh) {
    for boundary in GridBoundary::ALL {
        if boundary == GridBoundary::Top {
            mesh.pin_on_boundary(boundary, U);
        }
        mesh.pin_on_boundary(boundary, V);
    }
}

/// A prepared channel problem.
pub struct ChannelProblem {
    params: ChannelParameters,
    config: RunConfig,
    layout: GridLayout,
    mesh: QuadMesh,
    synthetic: Arc<dyn SyntheticField>,
}

impl ChannelProblem {
    /// Resolve, build and grade the mesh, then apply boundary and initial
    /// conditions.
    ///
    /// The resolver always runs so invalid parameters are rejected before
    /// any grid is built. In validation mode the mesh is the uniform
    /// `config.validation_grid` instead of the graded one.
    pub fn new(params: ChannelParameters, config: RunConfig) -> Result<Self, GradmeshError> {
        params.validate()?;
        let layout = grading::resolve(&params)?;
        let bounds = params.bounds();

        info!(
            reynolds = params.reynolds,
            linear_solver = %config.linear_solver,
            validate_projection = config.validate_projection,
            "setting up channel problem"
        );

        let mesh = if config.validate_projection {
            QuadMesh::uniform(config.validation_grid, bounds)
        } else {
            let mut mesh = QuadMesh::uniform(layout.grid.resolution, bounds);
            grading::apply_to_mesh(&mut mesh, &layout.vertical_clustering())?;
            grading::apply_to_mesh(&mut mesh, &layout.horizontal_squash())?;
            mesh.check_ordering()?;
            mesh
        };

        let synthetic: Arc<dyn SyntheticField> = Arc::new(SinCosField::from_bounds(&bounds));
        let mut problem = Self {
            params,
            config,
            layout,
            mesh,
            synthetic,
        };

        apply_boundary_conditions(&mut problem.mesh);
        complete_element_setup(&mut problem.mesh, &problem.synthetic);
        let initial = problem.initial_condition();
        problem.mesh.set_nodal_velocity(&initial);

        info!(
            resolution = %problem.mesh.resolution(),
            n_nodes = problem.mesh.n_nodes(),
            ndof = problem.mesh.n_dof(),
            h_min = problem.mesh.h_min(),
            "channel mesh ready"
        );
        Ok(problem)
    }

    pub fn params(&self) -> &ChannelParameters {
        &self.params
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    pub fn mesh(&self) -> &QuadMesh {
        &self.mesh
    }

    pub fn mesh_mut(&mut self) -> &mut QuadMesh {
        &mut self.mesh
    }

    /// Analytic field each element measures recovery errors against.
    pub fn synthetic_field(&self) -> Arc<dyn SyntheticField> {
        Arc::clone(&self.synthetic)
    }

    pub fn initial_condition(&self) -> VortexPairField {
        VortexPairField::from_parameters(&self.params)
    }

    pub fn impose_no_slip_on_bottom_boundary(&mut self) {
        impose_no_slip(&mut self.mesh, self.params.background_flow);
    }

    /// Refine uniformly and re-complete the element setup.
    pub fn refine_uniformly(&mut self) -> Result<(), GradmeshError> {
        self.mesh.refine_uniformly()?;
        complete_element_setup(&mut self.mesh, &self.synthetic);
        Ok(())
    }

    /// Write `mesh.vtu` and `boundaries.dat` into the output directory.
    pub fn write_setup_files(&self) -> Result<(), OutputError> {
        let dir = &self.config.output_dir;
        fs::create_dir_all(dir).map_err(|e| OutputError::io(dir, e))?;
        write_vtk_mesh(dir.join(MESH_FILE_NAME), &self.mesh)?;
        write_boundaries(dir.join(BOUNDARIES_FILE_NAME), &self.mesh)
    }

    /// Run the recovery convergence check on the current mesh.
    pub fn validate_projection(&mut self) -> Result<HarnessReport, HarnessError> {
        let dir = self.config.output_dir.clone();
        let mut documenter = VtkDocumenter::new(&dir);
        ConvergenceHarness::new(PatchRecovery, self.config.validation_levels, dir).run(
            &mut self.mesh,
            Arc::clone(&self.synthetic),
            &mut documenter,
        )
    }

    /// Step the flow through the configured schedule with `solver`.
    pub fn run_schedule<S: FlowSolver<QuadMesh>>(&mut self, solver: &mut S) -> Result<ScheduleReport, GradmeshError> {
        let mut documenter = VtkDocumenter::new(&self.config.output_dir);
        let wall_velocity = self.params.background_flow;
        simulation::run_schedule(
            &mut self.mesh,
            solver,
            &PatchRecovery,
            &mut documenter,
            &self.config.schedule,
            |mesh| impose_no_slip(mesh, wall_velocity),
        )
    }

    /// Write the setup files, then either run the convergence check or
    /// document the initial state.
    pub fn run(&mut self) -> Result<RunOutcome, GradmeshError> {
        self.write_setup_files()?;

        if self.config.validate_projection {
            let report = self.validate_projection()?;
            info!(table = %report.table_path.display(), "validation complete");
            return Ok(RunOutcome::ValidationComplete(report));
        }

        PatchRecovery.recover_vorticity(&mut self.mesh)?;
        VtkDocumenter::new(&self.config.output_dir).document(&self.mesh, None)?;
        info!(
            output_dir = %self.config.output_dir.display(),
            "mesh prepared; no flow solver linked"
        );
        Ok(RunOutcome::Prepared)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CapabilityError, ConfigError};
    use crate::field::VelocityField;
    use crate::types::Axis;
    use tempfile::tempdir;

    fn prepared(dir: &std::path::Path) -> ChannelProblem {
        ChannelProblem::new(ChannelParameters::default(), RunConfig::default().with_output_dir(dir)).unwrap()
    }

    #[test]
    fn test_graded_mesh_matches_layout() {
        let dir = tempdir().unwrap();
        let problem = prepared(dir.path());
        let mesh = problem.mesh();

        assert_eq!(mesh.resolution(), problem.layout().grid.resolution);
        assert_eq!(mesh.resolution().nx(), 50);
        assert_eq!(mesh.resolution().ny(), 85);
        assert!(mesh.is_graded(Axis::Vertical));
        assert!(mesh.is_graded(Axis::Horizontal));
        assert!(mesh.check_ordering().is_ok());
    }

    #[test]
    fn test_boundary_pins() {
        let dir = tempdir().unwrap();
        let problem = prepared(dir.path());
        let mesh = problem.mesh();
        let res = mesh.resolution();

        let top = mesh.node(res.nx() / 2, res.ny());
        assert!(top.is_pinned(U) && top.is_pinned(V));

        let bottom = mesh.node(res.nx() / 2, 0);
        assert!(!bottom.is_pinned(U) && bottom.is_pinned(V));

        let side = mesh.node(0, res.ny() / 2);
        assert!(!side.is_pinned(U) && side.is_pinned(V));

        let interior = mesh.node(res.nx() / 2, res.ny() / 2);
        assert!(!interior.is_pinned(U) && !interior.is_pinned(V));
    }

    #[test]
    fn test_no_slip_pins_bottom_u() {
        let dir = tempdir().unwrap();
        let mut problem = prepared(dir.path());
        let before = problem.mesh().n_dof();
        let n_bottom = problem.mesh().resolution().nx() + 1;

        problem.impose_no_slip_on_bottom_boundary();

        assert_eq!(problem.mesh().n_dof(), before - n_bottom);
        let k = problem.params().background_flow;
        for i in problem.mesh().boundary_nodes(GridBoundary::Bottom) {
            let node = &problem.mesh().nodes()[i];
            assert!(node.is_pinned(U));
            assert_eq!(node.values[U], k);
        }
    }

    #[test]
    fn test_initial_condition_assigned() {
        let dir = tempdir().unwrap();
        let problem = prepared(dir.path());
        let field = problem.initial_condition();
        for node in problem.mesh().nodes().iter().step_by(97) {
            let expected = field.velocity(node.x[0], node.x[1]);
            assert_eq!(node.values, expected);
        }
    }

    #[test]
    fn test_invalid_parameters_rejected_before_meshing() {
        let dir = tempdir().unwrap();
        let params = ChannelParameters::default().with_clustering_sharpness(0.0);
        let result = ChannelProblem::new(params, RunConfig::default().with_output_dir(dir.path()));
        assert!(matches!(
            result,
            Err(GradmeshError::Config(ConfigError::DegenerateSharpness { .. }))
        ));
    }

    #[test]
    fn test_prepare_writes_setup_files() {
        let dir = tempdir().unwrap();
        let mut problem = prepared(dir.path());
        let outcome = problem.run().unwrap();

        assert_eq!(outcome.exit_code(), 0);
        assert!(dir.path().join(MESH_FILE_NAME).exists());
        assert!(dir.path().join(BOUNDARIES_FILE_NAME).exists());
        assert!(dir.path().join("soln00000.vtu").exists());
    }

    #[test]
    fn test_validation_run() {
        let dir = tempdir().unwrap();
        let config = RunConfig::validation()
            .with_output_dir(dir.path())
            .with_validation_levels(2);
        let mut problem = ChannelProblem::new(ChannelParameters::default(), config).unwrap();
        assert!(!problem.mesh().is_graded(Axis::Vertical));
        assert_eq!(problem.mesh().n_elements(), 100);

        let outcome = problem.run().unwrap();
        assert_eq!(outcome.exit_code(), 3);
        let RunOutcome::ValidationComplete(report) = outcome else {
            panic!("expected validation outcome");
        };
        assert_eq!(report.rows.len(), 2);
        assert!(dir.path().join("analytical_vorticity00001.vtu").exists());
    }

    #[test]
    fn test_refine_keeps_element_setup() {
        let dir = tempdir().unwrap();
        let config = RunConfig::validation().with_output_dir(dir.path());
        let mut problem = ChannelProblem::new(ChannelParameters::default(), config).unwrap();
        problem.refine_uniformly().unwrap();
        assert_eq!(problem.mesh().n_elements(), 400);
        assert!(problem
            .mesh()
            .elements()
            .iter()
            .all(|e| e.is_smoothed_pinned() && e.exact_field().is_some()));
    }

    struct Still;

    impl FlowSolver<QuadMesh> for Still {
        fn step(&mut self, _mesh: &mut QuadMesh, _dt: f64) -> Result<(), CapabilityError> {
            Ok(())
        }
    }

    #[test]
    fn test_short_schedule() {
        let dir = tempdir().unwrap();
        let mut config = RunConfig::validation().with_output_dir(dir.path());
        config.schedule.impulsive_steps = 1;
        config.schedule.no_slip_steps = 1;
        let mut problem = ChannelProblem::new(ChannelParameters::default(), config).unwrap();

        let report = problem.run_schedule(&mut Still).unwrap();
        assert_eq!(report.steps, 2);
        assert!(dir.path().join("soln00002.vtu").exists());
        let bottom = problem.mesh().node(3, 0);
        assert!(bottom.is_pinned(U));
    }
}
