//! Per-run fit stage.

use tracing::{debug, warn};

use crate::domain::{FittedRun, RunSummary, Trial};
use crate::fit::fit_run;
use crate::stages::Context;

/// Fit every run of a trial. Failed fits are kept as NaN rows.
pub fn fit_trial(trial: &Trial, summaries: Vec<RunSummary>, ctx: &Context) -> Vec<FittedRun> {
    summaries
        .into_iter()
        .map(|summary| {
            let fit = fit_run(&summary, trial, &ctx.project.params);
            if fit.converged() {
                debug!(
                    trial = %trial.date,
                    run = %summary.run,
                    t_s = fit.t_s,
                    dt_dx = fit.dt_dx,
                    "fitted run"
                );
            } else {
                warn!(
                    trial = %trial.date,
                    run = %summary.run,
                    "profile fit failed; results will be NaN"
                );
            }
            FittedRun { summary, fit }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axes::Axis;
    use crate::domain::FitStrategy;
    use crate::props::{CoolPropWater, PropertyTables};
    use crate::stages::testing::{self, linear_summary};

    #[test]
    fn quadratic_strategy_recovers_linear_profile() {
        let project = testing::project(&std::env::temp_dir(), 10, "quadratic");
        let ctx = Context::new(&project, &PropertyTables, &CoolPropWater);
        let summary = linear_summary("r1", 10, 120.0, 300.0, 99.0);
        let runs = fit_trial(&project.trials[0], vec![summary], &ctx);

        let fit = &runs[0].fit;
        assert_eq!(fit.strategy, FitStrategy::Quadratic);
        assert!(fit.a.abs() < 1e-3);
        assert!((fit.dt_dx - 300.0).abs() < 1e-5);
        assert!((fit.t_s - 120.0).abs() < 1e-9);
    }

    #[test]
    fn linear_strategy_uses_the_means() {
        let project = testing::project(&std::env::temp_dir(), 10, "linear");
        let ctx = Context::new(&project, &PropertyTables, &CoolPropWater);
        let summary = linear_summary("r1", 10, 120.0, 300.0, 99.0);
        let runs = fit_trial(&project.trials[0], vec![summary], &ctx);

        let fit = &runs[0].fit;
        assert_eq!(fit.strategy, FitStrategy::Linear);
        assert_eq!(fit.a, 0.0);
        assert!((fit.dt_dx - 300.0).abs() < 1e-9);
        assert!((fit.rvalue - 1.0).abs() < 1e-9);
    }

    #[test]
    fn missing_thermocouple_keeps_the_run() {
        let project = testing::project(&std::env::temp_dir(), 10, "quadratic");
        let ctx = Context::new(&project, &PropertyTables, &CoolPropWater);
        let mut summary = linear_summary("r1", 10, 120.0, 300.0, 99.0);
        for record in &mut summary.window {
            record.values.remove(&Axis::T3);
        }

        let runs = fit_trial(&project.trials[0], vec![summary], &ctx);
        assert_eq!(runs.len(), 1);
        assert!(!runs[0].fit.converged());
        assert_eq!(runs[0].summary.run, "r1");
    }
}
