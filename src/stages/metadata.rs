//! Flatten trial runs into result rows, broadcasting trial metadata.
//!
//! Metadata is looked up by each run's trial date in the project.

use std::collections::BTreeMap;

use crate::config::Project;
use crate::domain::{Cell, ResultRow, TrialRun};
use crate::error::{AppError, EXIT_INTERNAL};

/// One row per run: trial metadata, steady-state means, fit, heat transfer.
pub fn to_rows(runs: &[TrialRun], project: &Project) -> Result<Vec<ResultRow>, AppError> {
    runs.iter()
        .map(|run| {
            let date = run.summary.trial;
            let trial = project.trial(date).ok_or_else(|| {
                AppError::new(
                    EXIT_INTERNAL,
                    format!("Run '{}' belongs to unknown trial {date}.", run.summary.run),
                )
            })?;
            let mut cells: BTreeMap<_, _> = trial.metadata_cells().into_iter().collect();
            cells.extend(run.summary.means.iter().map(|(&axis, &v)| (axis, Cell::Float(v))));
            cells.extend(run.fit.columns().map(|(axis, v)| (axis, Cell::Float(v))));
            cells.extend(run.heat.columns().map(|(axis, v)| (axis, Cell::Float(v))));
            Ok(ResultRow {
                trial: date,
                run: run.summary.run.clone(),
                time: run.summary.time.clone(),
                cells,
            })
        })
        .collect()
}
