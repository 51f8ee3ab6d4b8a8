//! A small column-labelled table.
//!
//! The leading `index_len` columns are the index (`trial`, `run`, `time` when
//! built from result rows). Every row has exactly one cell per column.

use std::collections::HashSet;

use crate::axes::{Axis, AxisRegistry, Coldes};
use crate::domain::{Cell, ResultRow};
use crate::error::{AppError, EXIT_INTERNAL};
use crate::table::units::split_unit;

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnLabel {
    /// The quantity this column holds, if it is a registry axis.
    pub axis: Option<Axis>,
    pub name: String,
    pub units: String,
    pub coldes: Coldes,
}

impl ColumnLabel {
    pub fn for_axis(axis: Axis, registry: &AxisRegistry) -> Self {
        Self {
            axis: Some(axis),
            name: axis.name().to_string(),
            units: registry.units(axis).to_string(),
            coldes: registry.get(axis).map(|s| s.coldes).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultTable {
    pub columns: Vec<ColumnLabel>,
    pub rows: Vec<Vec<Cell>>,
    pub index_len: usize,
}

impl ResultTable {
    /// Lay out result rows in registry order: index axes, then every other axis.
    pub fn from_rows(rows: &[ResultRow], registry: &AxisRegistry) -> Self {
        let index: Vec<Axis> = registry.index().map(|s| s.axis).collect();
        let columns: Vec<Axis> = registry.columns().map(|s| s.axis).collect();

        let labels: Vec<ColumnLabel> = index
            .iter()
            .chain(&columns)
            .map(|&axis| ColumnLabel::for_axis(axis, registry))
            .collect();

        let cells: Vec<Vec<Cell>> = rows
            .iter()
            .map(|row| {
                index
                    .iter()
                    .map(|&axis| index_cell(row, axis))
                    .chain(columns.iter().map(|&axis| {
                        row.get(axis).cloned().unwrap_or(Cell::Float(f64::NAN))
                    }))
                    .collect()
            })
            .collect();

        Self {
            columns: labels,
            rows: cells,
            index_len: index.len(),
        }
    }

    /// Build a table from `"name (units)"` labels, no index.
    pub fn from_labels<S: AsRef<str>>(
        labels: &[S],
        rows: Vec<Vec<Cell>>,
    ) -> Result<Self, AppError> {
        let columns: Vec<ColumnLabel> = labels
            .iter()
            .map(|label| {
                let (name, units) = split_unit(label.as_ref());
                ColumnLabel {
                    axis: name.parse().ok(),
                    name,
                    units,
                    coldes: Coldes::default(),
                }
            })
            .collect();
        let table = Self {
            columns,
            rows,
            index_len: 0,
        };
        table.check_shape()?;
        Ok(table)
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Every row matches the header and no column name repeats.
    pub fn check_shape(&self) -> Result<(), AppError> {
        if let Some(i) = self.rows.iter().position(|r| r.len() != self.width()) {
            return Err(AppError::new(
                EXIT_INTERNAL,
                format!("Row {i} has {} cells for {} columns.", self.rows[i].len(), self.width()),
            ));
        }
        let mut seen = HashSet::new();
        for column in &self.columns {
            if !seen.insert(column.name.as_str()) {
                return Err(AppError::new(
                    EXIT_INTERNAL,
                    format!("Column `{}` appears more than once.", column.name),
                ));
            }
        }
        Ok(())
    }
}

fn index_cell(row: &ResultRow, axis: Axis) -> Cell {
    match axis {
        Axis::Trial => Cell::Date(row.trial),
        Axis::Run => Cell::Text(row.run.clone()),
        Axis::Time => Cell::Text(row.time.clone()),
        other => row.get(other).cloned().unwrap_or(Cell::Float(f64::NAN)),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::NaiveDate;

    use super::*;

    fn row(run: &str, t1: f64) -> ResultRow {
        let mut cells = BTreeMap::new();
        cells.insert(Axis::T1, Cell::Float(t1));
        cells.insert(Axis::Rod, Cell::Text("X".into()));
        ResultRow {
            trial: NaiveDate::from_ymd_opt(2022, 9, 14).unwrap(),
            run: run.into(),
            time: "t".into(),
            cells,
        }
    }

    #[test]
    fn columns_follow_registry_order() {
        let registry = AxisRegistry::default();
        let table = ResultTable::from_rows(&[row("r1", 1.0), row("r2", 2.0)], &registry);

        assert_eq!(table.index_len, 3);
        assert_eq!(table.width(), registry.specs().len());
        assert_eq!(table.columns[0].name, "trial");
        assert_eq!(table.columns[3].name, "group");
        let t1 = table.column("T_1").unwrap();
        assert_eq!(table.columns[t1].units, "C");
        assert_eq!(table.rows[1][t1], Cell::Float(2.0));
        assert_eq!(table.rows[0][1], Cell::Text("r1".into()));
        // Absent quantities are empty, not dropped.
        let q = table.column("q").unwrap();
        assert_eq!(table.rows[0][q].render(), "");
        table.check_shape().unwrap();
    }

    #[test]
    fn from_labels_splits_units_and_resolves_axes() {
        let rows = vec![vec![Cell::Float(1.0), Cell::Text("a".into())]];
        let table = ResultTable::from_labels(&["T_1 (C)", "note"], rows).unwrap();
        assert_eq!(table.columns[0].axis, Some(Axis::T1));
        assert_eq!(table.columns[0].units, "C");
        assert_eq!(table.columns[1].axis, None);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let err = ResultTable::from_labels(&["a", "b"], vec![vec![Cell::Float(1.0)]]).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_INTERNAL);
    }
}
