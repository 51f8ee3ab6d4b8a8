//! Steady-state reduction.
//!
//! Every run file of a trial is reduced to the mean of its trailing
//! `records_to_average` records. A run shorter than the window aborts the
//! whole invocation (exit code 3); nothing is reduced partially.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::axes::Axis;
use crate::domain::{Record, RunSummary, Trial};
use crate::error::{AppError, EXIT_DATA};
use crate::io::read_run;
use crate::stages::{nan_mean, Context};

/// Run files of a trial directory, sorted by file name.
pub fn list_runs(dir: &Path) -> Result<Vec<PathBuf>, AppError> {
    let entries = fs::read_dir(dir).map_err(|e| {
        AppError::input(format!("Failed to list trial directory '{}': {e}", dir.display()))
    })?;

    let mut runs = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|e| AppError::input(format!("Failed to list '{}': {e}", dir.display())))?
            .path();
        let is_csv = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
        if is_csv && path.is_file() {
            runs.push(path);
        }
    }
    runs.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(runs)
}

/// Mean of every channel over the last `window` records.
///
/// `source` names the run in the insufficient-data error.
pub fn trailing_mean<'r>(
    records: &'r [Record],
    window: usize,
    source: &str,
) -> Result<(BTreeMap<Axis, f64>, &'r [Record]), AppError> {
    if window == 0 || records.len() < window {
        return Err(AppError::new(
            EXIT_DATA,
            format!(
                "Run '{source}' has {} records, fewer than the {window} to average.",
                records.len()
            ),
        ));
    }
    let tail = &records[records.len() - window..];

    let mut means = BTreeMap::new();
    for axis in tail.iter().flat_map(|r| r.values.keys()) {
        means.entry(*axis).or_insert_with(|| {
            nan_mean(tail.iter().map(|r| r.values.get(axis).copied().unwrap_or(f64::NAN)))
        });
    }
    Ok((means, tail))
}

/// Reduce one run file.
pub fn reduce_run(trial: &Trial, path: &Path, ctx: &Context) -> Result<RunSummary, AppError> {
    let run = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| {
            AppError::input(format!("Run file '{}' has no usable name.", path.display()))
        })?
        .to_string();

    let records = read_run(path, &ctx.project.registry)?;
    let (means, tail) = trailing_mean(
        &records,
        ctx.project.params.records_to_average,
        &path.display().to_string(),
    )?;
    let time = tail.last().map(|r| r.time.clone()).unwrap_or_default();
    debug!(trial = %trial.date, run = %run, records = records.len(), "reduced run");

    Ok(RunSummary {
        trial: trial.date,
        run,
        time,
        means,
        window: tail.to_vec(),
    })
}

/// Reduce every run of a trial, in file name order.
pub fn reduce_trial(trial: &Trial, ctx: &Context) -> Result<Vec<RunSummary>, AppError> {
    let dir = ctx.project.dirs.trial_dir(trial.date);
    let runs = list_runs(&dir)?;
    if runs.is_empty() {
        warn!(trial = %trial.date, dir = %dir.display(), "no run files found");
    }
    runs.iter().map(|path| reduce_run(trial, path, ctx)).collect()
}
