//! Run CSV ingest.
//!
//! A run file is one header row followed by one record per sample. Only the
//! registry's source columns are read; any other column is ignored.
//!
//! Schema problems are errors (exit code 2) that name the file and, for bad
//! cells, the line:
//! - a source column missing from the header
//! - a numeric cell that does not parse
//!
//! Empty numeric cells are read as NaN.

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::path::Path;

use csv::StringRecord;

use crate::axes::{Axis, AxisRegistry};
use crate::domain::Record;
use crate::error::AppError;

/// Read every record of one run file.
pub fn read_run(path: &Path, registry: &AxisRegistry) -> Result<Vec<Record>, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::input(format!("Failed to open run '{}': {e}", path.display())))?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| {
            AppError::input(format!("Failed to read headers of '{}': {e}", path.display()))
        })?
        .clone();
    let header_map = build_header_map(&headers);

    let time_col = column_index(&header_map, registry, Axis::Time, path)?;
    let channels = registry
        .channels()
        .map(|spec| Ok((spec.axis, column_index(&header_map, registry, spec.axis, path)?)))
        .collect::<Result<Vec<(Axis, usize)>, AppError>>()?;

    let mut records = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // records() starts after the header, lines are 1-based
        let line = idx + 2;
        let row = result.map_err(|e| {
            AppError::input(format!("{}:{line}: CSV parse error: {e}", path.display()))
        })?;
        records.push(parse_record(&row, time_col, &channels, path, line)?);
    }
    Ok(records)
}

fn parse_record(
    row: &StringRecord,
    time_col: usize,
    channels: &[(Axis, usize)],
    path: &Path,
    line: usize,
) -> Result<Record, AppError> {
    let time = row.get(time_col).unwrap_or("").to_string();
    let mut values = BTreeMap::new();
    for &(axis, col) in channels {
        let raw = row.get(col).unwrap_or("");
        let value = if raw.is_empty() {
            f64::NAN
        } else {
            raw.parse::<f64>().map_err(|_| {
                AppError::input(format!(
                    "{}:{line}: invalid number '{raw}' in column `{axis}`.",
                    path.display()
                ))
            })?
        };
        values.insert(axis, value);
    }
    Ok(Record { time, values })
}

fn column_index(
    header_map: &HashMap<String, usize>,
    registry: &AxisRegistry,
    axis: Axis,
    path: &Path,
) -> Result<usize, AppError> {
    let source = registry
        .source(axis)
        .ok_or_else(|| AppError::input(format!("Axis `{axis}` has no source column.")))?;
    header_map.get(source).copied().ok_or_else(|| {
        AppError::input(format!(
            "Run '{}' is missing column '{source}' (axis `{axis}`).",
            path.display()
        ))
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a UTF-8 BOM.
    name.trim().trim_start_matches('\u{feff}').trim().to_string()
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use super::*;

    const HEADER: &str = "Time,V (V),I (A),T1 (C),T2 (C),T3 (C),T4 (C),T5 (C),Tw1 (C),Tw2 (C),Tw3 (C),P (psia),Extra";

    fn scratch(name: &str, content: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("boil-ingest-{}-{name}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("run.csv");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn reads_source_columns_and_time() {
        let csv = format!(
            "\u{feff}{HEADER}\n\
             2022-09-14T10:00:00,10,2,120,121,122,123,124,99,99.5,100,14.7,x\n\
             2022-09-14T10:00:01,10,2,120,121,,123,124,99,99.5,100,14.7,y\n"
        );
        let path = scratch("ok", &csv);
        let records = read_run(&path, &AxisRegistry::default()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].time, "2022-09-14T10:00:00");
        assert_eq!(records[0].values[&Axis::T1], 120.0);
        assert_eq!(records[0].values[&Axis::P], 14.7);
        assert!(records[1].values[&Axis::T3].is_nan());
        assert!(!records[0].values.contains_key(&Axis::Time));
    }

    #[test]
    fn missing_column_names_file_and_source() {
        let path = scratch("missing", "Time,V (V)\n1,2\n");
        let err = read_run(&path, &AxisRegistry::default()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.message().contains("run.csv"));
        assert!(err.message().contains("I (A)"));
    }

    #[test]
    fn bad_cell_names_line() {
        let csv = format!("{HEADER}\n1,10,2,abc,121,122,123,124,99,99.5,100,14.7,x\n");
        let path = scratch("bad", &csv);
        let err = read_run(&path, &AxisRegistry::default()).unwrap_err();
        assert!(err.message().contains(":2:"), "{}", err.message());
        assert!(err.message().contains("T_1"));
    }
}
