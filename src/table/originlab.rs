//! OriginLab export formatting.
//!
//! The OriginLab variant of the result table is produced by an ordered list
//! of transforms, each `fn(ResultTable, &AxisRegistry) -> Result<ResultTable>`:
//!
//! 1. `reset_index`: index columns become ordinary columns
//! 2. `prettify`: axis names become display names
//! 3. `escape_markup`: `^…` and `_…` become OriginLab rich-text escapes
//! 4. `stringify`: every cell becomes text
//!
//! After every transform the driver checks that the column count is unchanged
//! and that no column name repeats.

use crate::axes::AxisRegistry;
use crate::domain::Cell;
use crate::error::{AppError, EXIT_INTERNAL};
use crate::table::frame::ResultTable;

pub type Transform = fn(ResultTable, &AxisRegistry) -> Result<ResultTable, AppError>;

pub const ORIGINLAB_TRANSFORMS: [(&str, Transform); 4] = [
    ("reset_index", reset_index),
    ("prettify", prettify),
    ("escape_markup", escape_markup),
    ("stringify", stringify),
];

/// Apply `transforms` in order, checking column correspondence after each.
pub fn apply_transforms(
    mut table: ResultTable,
    registry: &AxisRegistry,
    transforms: &[(&str, Transform)],
) -> Result<ResultTable, AppError> {
    table.check_shape()?;
    for (name, transform) in transforms {
        let width = table.width();
        table = transform(table, registry)?;
        if table.width() != width {
            return Err(AppError::new(
                EXIT_INTERNAL,
                format!(
                    "Transform `{name}` changed the column count from {width} to {}.",
                    table.width()
                ),
            ));
        }
        table.check_shape().map_err(|e| {
            AppError::new(EXIT_INTERNAL, format!("Transform `{name}`: {}", e.message()))
        })?;
    }
    Ok(table)
}

/// The OriginLab-ready variant of `table`.
pub fn originlab_table(
    table: ResultTable,
    registry: &AxisRegistry,
) -> Result<ResultTable, AppError> {
    apply_transforms(table, registry, &ORIGINLAB_TRANSFORMS)
}

pub fn reset_index(mut table: ResultTable, _: &AxisRegistry) -> Result<ResultTable, AppError> {
    table.index_len = 0;
    Ok(table)
}

pub fn prettify(mut table: ResultTable, registry: &AxisRegistry) -> Result<ResultTable, AppError> {
    for column in &mut table.columns {
        if let Some(axis) = column.axis {
            column.name = registry.pretty(axis).to_string();
        }
    }
    Ok(table)
}

pub fn escape_markup(mut table: ResultTable, _: &AxisRegistry) -> Result<ResultTable, AppError> {
    for column in &mut table.columns {
        column.name = escape(&column.name);
        column.units = escape(&column.units);
    }
    Ok(table)
}

pub fn stringify(mut table: ResultTable, _: &AxisRegistry) -> Result<ResultTable, AppError> {
    for row in &mut table.rows {
        for cell in row.iter_mut() {
            if !matches!(cell, Cell::Text(_)) {
                *cell = Cell::Text(cell.render());
            }
        }
    }
    Ok(table)
}

/// `^x` → `\+(x)` and `_x` → `\-(x)`; the group runs to the end of the text.
pub fn escape(text: &str) -> String {
    escape_subscript(&escape_superscript(text))
}

pub fn escape_superscript(text: &str) -> String {
    escape_group(text, '^', r"\+(")
}

pub fn escape_subscript(text: &str) -> String {
    escape_group(text, '_', r"\-(")
}

fn escape_group(text: &str, marker: char, open: &str) -> String {
    match text.split_once(marker) {
        Some((head, tail)) => format!("{head}{open}{tail})"),
        None => text.to_string(),
    }
}

/// One designation letter per column, e.g. `"NNNLLLLLLLYYYE…"`.
pub fn column_designations(table: &ResultTable) -> String {
    table.columns.iter().map(|c| c.coldes.letter()).collect()
}
