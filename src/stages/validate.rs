//! Steady-state sanity checks, run before fitting.
//!
//! The submerged thermocouples must read a boiling bath: every steady-state
//! mean of `T_w1..T_w3` has to fall inside `params.water_range`. Missing
//! readings are not checked.

use tracing::warn;

use crate::axes::Axis;
use crate::config::InvalidData;
use crate::domain::{RunSummary, Trial};
use crate::error::{AppError, EXIT_DATA};
use crate::stages::Context;

/// A steady-state mean outside its accepted range.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    pub run: String,
    pub axis: Axis,
    pub value: f64,
}

/// Every out-of-range water temperature of `summaries`, in run order.
pub fn water_violations(summaries: &[RunSummary], range: [f64; 2]) -> Vec<Violation> {
    let [low, high] = range;
    summaries
        .iter()
        .flat_map(|summary| {
            Axis::WATER.iter().filter_map(move |&axis| {
                let value = summary.mean(axis);
                (!value.is_nan() && !(low..=high).contains(&value)).then(|| Violation {
                    run: summary.run.clone(),
                    axis,
                    value,
                })
            })
        })
        .collect()
}

/// Check a trial's steady-state rows, warning or failing per `params.invalid_data`.
pub fn validate_steady_state(
    trial: &Trial,
    summaries: Vec<RunSummary>,
    ctx: &Context,
) -> Result<Vec<RunSummary>, AppError> {
    let params = &ctx.project.params;
    let [low, high] = params.water_range;
    let violations = water_violations(&summaries, params.water_range);

    match (params.invalid_data, violations.first()) {
        (_, None) => {}
        (InvalidData::Abort, Some(v)) => {
            return Err(AppError::new(
                EXIT_DATA,
                format!(
                    "Trial {}, run '{}': `{}` = {} C is outside [{low}, {high}] C.",
                    trial.date, v.run, v.axis, v.value
                ),
            ));
        }
        (InvalidData::Warn, Some(_)) => {
            for v in &violations {
                warn!(
                    trial = %trial.date,
                    run = %v.run,
                    axis = %v.axis,
                    value = v.value,
                    "water temperature outside [{low}, {high}] C"
                );
            }
        }
    }
    Ok(summaries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stages::testing::{self, linear_summary, ConstantProperties, ConstantSaturation};

    #[test]
    fn in_range_runs_pass_through() {
        let project = testing::project(&std::env::temp_dir(), 10, "quadratic");
        let ctx = Context::new(&project, &ConstantProperties, &ConstantSaturation);
        let summaries = vec![
            linear_summary("r1", 10, 120.0, 200.0, 95.0),
            linear_summary("r2", 10, 125.0, 200.0, 101.0),
        ];
        let out = validate_steady_state(&project.trials[0], summaries.clone(), &ctx).unwrap();
        assert_eq!(out, summaries);
    }

    #[test]
    fn unheated_bath_is_flagged_per_thermocouple() {
        let mut cold = linear_summary("r2", 10, 120.0, 200.0, 99.0);
        cold.means.insert(Axis::Tw2, 22.5);
        cold.means.insert(Axis::Tw3, f64::NAN);
        let summaries = vec![linear_summary("r1", 10, 120.0, 200.0, 99.0), cold];

        let violations = water_violations(&summaries, [95.0, 101.0]);
        assert_eq!(
            violations,
            vec![Violation {
                run: "r2".into(),
                axis: Axis::Tw2,
                value: 22.5,
            }]
        );
    }

    #[test]
    fn warn_policy_keeps_out_of_range_runs() {
        let project = testing::project(&std::env::temp_dir(), 10, "quadratic");
        let ctx = Context::new(&project, &ConstantProperties, &ConstantSaturation);
        let summaries = vec![linear_summary("r1", 10, 120.0, 200.0, 80.0)];
        let out = validate_steady_state(&project.trials[0], summaries, &ctx).unwrap();
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn abort_policy_names_the_run() {
        let mut project = testing::project(&std::env::temp_dir(), 10, "quadratic");
        project.params.invalid_data = InvalidData::Abort;
        let ctx = Context::new(&project, &ConstantProperties, &ConstantSaturation);
        let summaries = vec![
            linear_summary("r1", 10, 120.0, 200.0, 99.0),
            linear_summary("r2", 10, 120.0, 200.0, 104.0),
        ];

        let err = validate_steady_state(&project.trials[0], summaries, &ctx).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_DATA);
        assert!(err.message().contains("'r2'"), "{}", err.message());
        assert!(err.message().contains("T_w1"), "{}", err.message());
    }
}
