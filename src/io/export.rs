//! Result table exports.
//!
//! Tables are written with two header rows, quantity names then units, so
//! the units survive a round trip through spreadsheets and OriginLab.

use std::fs::{self, File};
use std::path::Path;

use crate::error::AppError;
use crate::table::{column_designations, ResultTable};

/// Create the parent directory of `path` if needed.
pub fn ensure_parent(path: &Path) -> Result<(), AppError> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => fs::create_dir_all(dir)
            .map_err(|e| AppError::input(format!("Failed to create '{}': {e}", dir.display()))),
        _ => Ok(()),
    }
}

/// Write `table` as CSV: names row, units row, then one line per row.
pub fn write_table_csv(path: &Path, table: &ResultTable) -> Result<(), AppError> {
    ensure_parent(path)?;
    let file = File::create(path)
        .map_err(|e| AppError::input(format!("Failed to create '{}': {e}", path.display())))?;
    let mut writer = csv::Writer::from_writer(file);
    let write_err =
        |e: csv::Error| AppError::input(format!("Failed to write '{}': {e}", path.display()));

    writer
        .write_record(table.columns.iter().map(|c| c.name.as_str()))
        .map_err(write_err)?;
    writer
        .write_record(table.columns.iter().map(|c| c.units.as_str()))
        .map_err(write_err)?;
    for row in &table.rows {
        writer
            .write_record(row.iter().map(|cell| cell.render()))
            .map_err(write_err)?;
    }
    writer
        .flush()
        .map_err(|e| AppError::input(format!("Failed to flush '{}': {e}", path.display())))
}

/// Write the OriginLab column designations of `table` as a single line.
pub fn write_coldes(path: &Path, table: &ResultTable) -> Result<(), AppError> {
    ensure_parent(path)?;
    fs::write(path, column_designations(table))
        .map_err(|e| AppError::input(format!("Failed to write '{}': {e}", path.display())))
}
