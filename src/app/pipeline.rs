//! The reduction pipeline driver.
//!
//! For each trial, in project order:
//! steady state -> validation -> per-run fit -> trial heat transfer -> result rows
//!
//! The driver owns every intermediate value; stages only receive what they
//! need plus the shared [`Context`].

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::info;

use crate::config::Project;
use crate::domain::{ResultRow, TrialRun};
use crate::error::{AppError, EXIT_DATA};
use crate::io::{write_coldes, write_fits_json, write_table_csv};
use crate::props::{CoolPropWater, PropertyTables};
use crate::report::{summarize_trial, TrialReport};
use crate::stages::{
    aggregate_trial, fit_trial, reduce_trial, to_rows, validate_steady_state, Context,
};
use crate::table::{originlab_table, ResultTable};

/// All computed outputs of one invocation.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub runs: Vec<TrialRun>,
    pub rows: Vec<ResultRow>,
    pub reports: Vec<TrialReport>,
    /// Trials left out by `monotonic_only`.
    pub skipped: Vec<NaiveDate>,
}

/// Reduce every trial of the context's project.
pub fn run_pipeline(ctx: &Context) -> Result<PipelineOutput, AppError> {
    let project = ctx.project;
    let mut output = PipelineOutput {
        runs: Vec::new(),
        rows: Vec::new(),
        reports: Vec::new(),
        skipped: Vec::new(),
    };

    for trial in &project.trials {
        if project.params.monotonic_only && !trial.monotonic {
            info!(trial = %trial.date, "skipping non-monotonic trial");
            output.skipped.push(trial.date);
            continue;
        }
        info!(trial = %trial.date, "reducing trial");

        let summaries = reduce_trial(trial, ctx)?;
        let summaries = validate_steady_state(trial, summaries, ctx)?;
        let fitted = fit_trial(trial, summaries, ctx);
        let runs = aggregate_trial(trial, fitted, ctx);

        output.rows.extend(to_rows(&runs, project)?);
        output.reports.push(summarize_trial(trial.date, &runs));
        output.runs.extend(runs);
    }

    if output.rows.is_empty() {
        return Err(AppError::new(EXIT_DATA, "No runs were found in any trial."));
    }
    Ok(output)
}

/// Write the results CSV, its OriginLab variant, the column designations,
/// and optionally the per-run fits. Returns the written paths.
pub fn write_outputs(
    project: &Project,
    output: &PipelineOutput,
    export_fits: Option<&Path>,
) -> Result<Vec<PathBuf>, AppError> {
    let dirs = &project.dirs;
    let table = ResultTable::from_rows(&output.rows, &project.registry);
    write_table_csv(&dirs.results_file, &table)?;

    let originlab = originlab_table(table, &project.registry)?;
    write_table_csv(&dirs.originlab_results_file, &originlab)?;
    write_coldes(&dirs.coldes_file, &originlab)?;

    let mut written = vec![
        dirs.results_file.clone(),
        dirs.originlab_results_file.clone(),
        dirs.coldes_file.clone(),
    ];
    if let Some(path) = export_fits {
        write_fits_json(path, &output.runs)?;
        written.push(path.to_path_buf());
    }
    Ok(written)
}

/// Run the pipeline with the built-in property tables and write every output.
pub fn run_project(
    project: &Project,
    export_fits: Option<&Path>,
) -> Result<(PipelineOutput, Vec<PathBuf>), AppError> {
    let ctx = Context::new(project, &PropertyTables, &CoolPropWater);
    let output = run_pipeline(&ctx)?;
    let written = write_outputs(project, &output, export_fits)?;
    Ok((output, written))
}
