//! Schedule driver.

use tracing::{debug, info};

use crate::error::{CapabilityError, GradmeshError};
use crate::io::SolutionDocumenter;
use crate::recovery::VorticityRecovery;

/// Fixed-step schedule of an impulsively started run.
#[derive(Clone, Debug, PartialEq)]
pub struct TimeSchedule {
    /// Time step
    pub dt: f64,
    /// Steps taken before no-slip is imposed on the wall
    pub impulsive_steps: usize,
    /// Steps taken after
    pub no_slip_steps: usize,
}

impl Default for TimeSchedule {
    fn default() -> Self {
        Self {
            dt: 0.1,
            impulsive_steps: 10,
            no_slip_steps: 1300,
        }
    }
}

impl TimeSchedule {
    pub fn total_steps(&self) -> usize {
        self.impulsive_steps + self.no_slip_steps
    }

    /// Time at the end of the schedule.
    pub fn final_time(&self) -> f64 {
        self.total_steps() as f64 * self.dt
    }
}

/// Advances the flow on a mesh by one implicit step.
pub trait FlowSolver<M> {
    fn step(&mut self, mesh: &mut M, dt: f64) -> Result<(), CapabilityError>;
}

/// Summary of a completed schedule.
#[derive(Clone, Debug, PartialEq)]
pub struct ScheduleReport {
    pub steps: usize,
    pub time: f64,
    /// Snapshots written, including the initial one
    pub snapshots: usize,
}

/// Run `schedule` on `mesh`.
///
/// Vorticity is recovered before every snapshot. `impose_no_slip` is called
/// exactly once, between the two phases.
pub fn run_schedule<M, S, R, D, F>(
    mesh: &mut M,
    solver: &mut S,
    recovery: &R,
    documenter: &mut D,
    schedule: &TimeSchedule,
    impose_no_slip: F,
) -> Result<ScheduleReport, GradmeshError>
where
    S: FlowSolver<M>,
    R: VorticityRecovery<M>,
    D: SolutionDocumenter<M>,
    F: FnOnce(&mut M),
{
    let mut report = ScheduleReport {
        steps: 0,
        time: 0.0,
        snapshots: 0,
    };

    let mut snapshot = |mesh: &mut M, report: &mut ScheduleReport| -> Result<(), GradmeshError> {
        recovery.recover_vorticity(mesh)?;
        documenter.document(&*mesh, None)?;
        report.snapshots += 1;
        Ok(())
    };

    info!(
        dt = schedule.dt,
        impulsive_steps = schedule.impulsive_steps,
        no_slip_steps = schedule.no_slip_steps,
        "starting time-stepping schedule"
    );
    snapshot(mesh, &mut report)?;

    let mut advance = |mesh: &mut M, report: &mut ScheduleReport, phase: &str, steps: usize| {
        for step in 1..=steps {
            solver.step(mesh, schedule.dt)?;
            report.steps += 1;
            report.time = report.steps as f64 * schedule.dt;
            debug!(phase, step, time = report.time, "time step complete");
            snapshot(mesh, report)?;
        }
        Ok::<(), GradmeshError>(())
    };

    advance(mesh, &mut report, "impulsive", schedule.impulsive_steps)?;
    impose_no_slip(mesh);
    advance(mesh, &mut report, "no-slip", schedule.no_slip_steps)?;

    info!(steps = report.steps, time = report.time, "schedule finished");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OutputError;
    use crate::field::SyntheticField;

    /// Mesh stand-in recording the order of events.
    #[derive(Default)]
    struct Log(Vec<&'static str>);

    struct Stepper {
        fail_at: Option<usize>,
        taken: usize,
    }

    impl FlowSolver<Log> for Stepper {
        fn step(&mut self, mesh: &mut Log, _dt: f64) -> Result<(), CapabilityError> {
            self.taken += 1;
            if self.fail_at == Some(self.taken) {
                return Err(CapabilityError::FlowSolve("newton diverged".into()));
            }
            mesh.0.push("step");
            Ok(())
        }
    }

    struct Recover;

    impl VorticityRecovery<Log> for Recover {
        fn recover_vorticity(&self, mesh: &mut Log) -> Result<(), CapabilityError> {
            mesh.0.push("recover");
            Ok(())
        }

        fn name(&self) -> &'static str {
            "log"
        }
    }

    #[derive(Default)]
    struct Docs(usize);

    impl SolutionDocumenter<Log> for Docs {
        fn document(&mut self, _mesh: &Log, exact: Option<&dyn SyntheticField>) -> Result<(), OutputError> {
            assert!(exact.is_none());
            self.0 += 1;
            Ok(())
        }
    }

    fn short() -> TimeSchedule {
        TimeSchedule {
            dt: 0.1,
            impulsive_steps: 2,
            no_slip_steps: 3,
        }
    }

    #[test]
    fn test_default_schedule() {
        let s = TimeSchedule::default();
        assert_eq!(s.total_steps(), 1310);
        assert!((s.final_time() - 131.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_slip_between_phases() {
        let mut mesh = Log::default();
        let mut solver = Stepper { fail_at: None, taken: 0 };
        let mut docs = Docs::default();

        let report = run_schedule(&mut mesh, &mut solver, &Recover, &mut docs, &short(), |m| {
            m.0.push("no-slip")
        })
        .unwrap();

        assert_eq!(report.steps, 5);
        assert_eq!(report.snapshots, 6);
        assert_eq!(docs.0, 6);
        assert!((report.time - 0.5).abs() < 1e-12);

        let steps: Vec<&str> = mesh.0.into_iter().filter(|e| *e != "recover").collect();
        assert_eq!(steps, vec!["step", "step", "no-slip", "step", "step", "step"]);
    }

    #[test]
    fn test_solver_failure_stops_schedule() {
        let mut mesh = Log::default();
        let mut solver = Stepper { fail_at: Some(3), taken: 0 };
        let mut docs = Docs::default();

        let err = run_schedule(&mut mesh, &mut solver, &Recover, &mut docs, &short(), |_| {}).unwrap_err();
        assert!(matches!(err, GradmeshError::Capability(CapabilityError::FlowSolve(_))));
        // Initial state plus the two impulsive steps
        assert_eq!(docs.0, 3);
    }
}
