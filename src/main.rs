use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use gradmesh::{ChannelParameters, ChannelProblem, GradmeshError, LinearSolverChoice, RunConfig};

/// Exit code for parameters that cannot produce a mesh, matching clap's
/// usage errors.
const CONFIG_ERROR_EXIT: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "gradmesh")]
#[command(about = "Graded channel mesh for vortex/wall interaction runs", long_about = None)]
struct Cli {
    /// Run the vorticity recovery convergence check and stop
    #[arg(long, alias = "validate_projection")]
    validate_projection: bool,

    /// Reynolds number
    #[arg(long)]
    re: Option<f64>,

    /// Scaling factor for the number of elements in the mesh
    #[arg(long, alias = "mesh_scaling_factor")]
    mesh_scaling_factor: Option<f64>,

    /// Use GMRES with a Schur-complement preconditioner for the linear solves
    #[arg(long, aliases = ["use_oomph_gmres", "use_iterative_solver"])]
    use_iterative_solver: bool,

    /// Directory receiving the table and snapshots
    #[arg(long, alias = "output_dir", default_value = "RESLT")]
    output_dir: PathBuf,
}

impl Cli {
    fn parameters(&self) -> ChannelParameters {
        let mut params = ChannelParameters::default();
        if let Some(re) = self.re {
            params = params.with_reynolds(re);
        }
        if let Some(factor) = self.mesh_scaling_factor {
            params = params.with_mesh_scaling_factor(factor);
        }
        params
    }

    fn run_config(&self) -> RunConfig {
        let solver = if self.use_iterative_solver {
            LinearSolverChoice::GmresSchurComplement
        } else {
            LinearSolverChoice::Direct
        };
        let config = if self.validate_projection {
            RunConfig::validation()
        } else {
            RunConfig::default()
        };
        config.with_output_dir(&self.output_dir).with_linear_solver(solver)
    }
}

fn run(cli: &Cli) -> anyhow::Result<u8> {
    let mut problem = match ChannelProblem::new(cli.parameters(), cli.run_config()) {
        Err(GradmeshError::Config(e)) => {
            error!("invalid configuration: {}", e);
            return Ok(CONFIG_ERROR_EXIT);
        }
        other => other.context("failed to set up channel problem")?,
    };

    let outcome = problem
        .run()
        .with_context(|| format!("run failed, output in {}", cli.output_dir.display()))?;
    info!(exit_code = outcome.exit_code(), "done");
    Ok(outcome.exit_code() as u8)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    info!(?cli, "command line");

    match run(&cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
