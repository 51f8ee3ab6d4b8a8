//! Per-run fit export (JSON).
//!
//! JSON has no NaN, so failed values are written as `null` and read back as NaN.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{FitStrategy, TrialRun};
use crate::error::AppError;
use crate::io::export::ensure_parent;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitRecord {
    pub trial: NaiveDate,
    pub run: String,
    pub time: String,
    pub strategy: FitStrategy,
    pub converged: bool,
    /// Parameters, errors and extrapolations keyed by column name.
    pub values: BTreeMap<String, Option<f64>>,
}

impl FitRecord {
    pub fn from_run(run: &TrialRun) -> Self {
        Self {
            trial: run.summary.trial,
            run: run.summary.run.clone(),
            time: run.summary.time.clone(),
            strategy: run.fit.strategy,
            converged: run.fit.converged(),
            values: run
                .fit
                .columns()
                .iter()
                .map(|(axis, v)| (axis.name().to_string(), v.is_finite().then_some(*v)))
                .collect(),
        }
    }

    /// Value of `name`, NaN when missing or null.
    pub fn value(&self, name: &str) -> f64 {
        self.values.get(name).copied().flatten().unwrap_or(f64::NAN)
    }
}

pub fn write_fits_json(path: &Path, runs: &[TrialRun]) -> Result<(), AppError> {
    ensure_parent(path)?;
    let records: Vec<FitRecord> = runs.iter().map(FitRecord::from_run).collect();
    let file = File::create(path).map_err(|e| {
        AppError::input(format!("Failed to create fit JSON '{}': {e}", path.display()))
    })?;
    serde_json::to_writer_pretty(BufWriter::new(file), &records)
        .map_err(|e| AppError::input(format!("Failed to write fit JSON: {e}")))
}

pub fn read_fits_json(path: &Path) -> Result<Vec<FitRecord>, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::input(format!("Failed to open fit JSON '{}': {e}", path.display()))
    })?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| AppError::input(format!("Invalid fit JSON '{}': {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{HeatTransfer, RunFit};
    use crate::stages::testing::linear_summary;

    #[test]
    fn failed_values_are_written_as_null() {
        let mut fit = RunFit::failed(FitStrategy::Quadratic);
        fit.b = 150.0;
        let run = TrialRun {
            summary: linear_summary("r1", 3, 120.0, 150.0, 100.0),
            fit,
            heat: HeatTransfer {
                k: f64::NAN,
                t_w: 100.0,
                t_w_diff: 0.0,
                q: f64::NAN,
                q_err: f64::NAN,
                power: f64::NAN,
                superheat: f64::NAN,
                superheat_err: f64::NAN,
            },
        };
        let path = std::env::temp_dir().join(format!("boil-fits-{}.json", std::process::id()));
        write_fits_json(&path, &[run]).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"a\": null"));
        let back = read_fits_json(&path).unwrap();
        assert_eq!(back[0].run, "r1");
        assert!(!back[0].converged);
        assert_eq!(back[0].value("b"), 150.0);
        assert!(back[0].value("T_s").is_nan());
        std::fs::remove_file(&path).ok();
    }
}
