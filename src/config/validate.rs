//! Project validation logic.
//!
//! Everything here runs before the pipeline starts, so stage code can assume
//! a well-formed project (positive window, known thermocouples, ...).

use std::collections::HashSet;

use crate::config::project::Project;
use crate::domain::Trial;
use crate::error::AppError;

pub fn validate_project(project: &Project) -> Result<(), AppError> {
    let params = &project.params;
    if params.records_to_average == 0 {
        return Err(AppError::input("`params.records_to_average` must be > 0."));
    }
    if !(params.confidence > 0.0 && params.confidence < 1.0) {
        return Err(AppError::input(format!(
            "`params.confidence` must be in (0, 1), got {}.",
            params.confidence
        )));
    }
    let [low, high] = params.water_range;
    if !(low.is_finite() && high.is_finite() && low < high) {
        return Err(AppError::input(format!(
            "`params.water_range` must be finite and increasing, got [{low}, {high}]."
        )));
    }
    if !(project.geometry.diameter.is_finite() && project.geometry.diameter > 0.0) {
        return Err(AppError::input("`geometry.diameter` must be finite and > 0."));
    }
    if project.dirs.results_file.extension().and_then(|e| e.to_str()) != Some("csv") {
        return Err(AppError::input(format!(
            "The results file '{}' is not a CSV.",
            project.dirs.results_file.display()
        )));
    }

    let mut dates = HashSet::new();
    for trial in &project.trials {
        if !dates.insert(trial.date) {
            return Err(AppError::input(format!("Duplicate trial date: {}", trial.date)));
        }
        validate_trial(trial, project)?;
    }

    Ok(())
}

fn validate_trial(trial: &Trial, project: &Project) -> Result<(), AppError> {
    let context = format!("trial {}", trial.date);
    if trial.thermocouple_pos.len() < 2 {
        return Err(AppError::input(format!(
            "{context}: at least two thermocouple positions are required."
        )));
    }

    let mut seen = HashSet::new();
    for (axis, x) in trial.thermocouple_pos.iter() {
        if !seen.insert(axis) {
            return Err(AppError::input(format!(
                "{context}: thermocouple `{axis}` is listed twice."
            )));
        }
        if !x.is_finite() {
            return Err(AppError::input(format!(
                "{context}: thermocouple `{axis}` has a non-finite position."
            )));
        }
        if project.registry.source(axis).is_none() {
            return Err(AppError::input(format!(
                "{context}: thermocouple `{axis}` is not a sourced column of the registry."
            )));
        }
    }
    Ok(())
}
