//! Per-run temperature-profile fitting.
//!
//! Two strategies:
//!
//! - quadratic over the pooled window records, with propagated uncertainty
//! - legacy straight line through the steady-state means
//!
//! Both report a [`RunFit`]; numerical failure is a NaN fit, never an error.

pub mod linear;
pub mod quadratic;

pub use linear::*;
pub use quadratic::*;

use crate::config::Params;
use crate::domain::{FitStrategy, RunFit, RunSummary, Trial};

/// Fit one run with the configured strategy.
pub fn fit_run(summary: &RunSummary, trial: &Trial, params: &Params) -> RunFit {
    match params.fit_strategy {
        FitStrategy::Quadratic => {
            let (x, y) = pooled_observations(summary, trial);
            fit_quadratic(&x, &y, summary.window.len(), params.confidence)
        }
        FitStrategy::Linear => {
            let positions: Vec<f64> = trial.thermocouple_pos.positions().collect();
            let means: Vec<f64> = trial.thermocouple_pos.axes().map(|a| summary.mean(a)).collect();
            fit_linear(&positions, &means, params.records_to_average, params.confidence)
        }
    }
}

/// Every (position, temperature) reading of the window, thermocouples in
/// mapping order within each record. Missing readings are left out.
pub fn pooled_observations(summary: &RunSummary, trial: &Trial) -> (Vec<f64>, Vec<f64>) {
    let capacity = summary.window.len() * trial.thermocouple_pos.len();
    let mut x = Vec::with_capacity(capacity);
    let mut y = Vec::with_capacity(capacity);
    for record in &summary.window {
        for (axis, position) in trial.thermocouple_pos.iter() {
            if let Some(&t) = record.values.get(&axis) {
                if t.is_finite() {
                    x.push(position);
                    y.push(t);
                }
            }
        }
    }
    (x, y)
}
