use std::collections::BTreeSet;

use thiserror::Error;

/// A single cell of an indicator table.
///
/// Geometry and administrative attributes travel as `Text` and are never
/// interpreted by the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Missing,
}

impl CellValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        match self {
            CellValue::Missing => true,
            CellValue::Number(v) => v.is_nan(),
            CellValue::Text(_) => false,
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Number(value as f64)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum TableError {
    #[error("duplicate column name: {0}")]
    DuplicateColumn(String),
    #[error("row {row} has {found} cells, expected {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("column {column} has {found} values, expected {expected}")]
    ColumnLength {
        column: String,
        expected: usize,
        found: usize,
    },
}

/// Row-major table: one row per region.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndicatorTable {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl IndicatorTable {
    pub fn new(columns: Vec<String>) -> Result<Self, TableError> {
        let mut seen = BTreeSet::new();
        for name in &columns {
            if !seen.insert(name.as_str()) {
                return Err(TableError::DuplicateColumn(name.clone()));
            }
        }
        Ok(Self {
            columns,
            rows: Vec::new(),
        })
    }

    /// Builds a table from named columns of equal length.
    pub fn from_columns<S: Into<String>>(
        columns: Vec<(S, Vec<CellValue>)>,
    ) -> Result<Self, TableError> {
        let mut names = Vec::with_capacity(columns.len());
        let mut values = Vec::with_capacity(columns.len());
        for (name, col) in columns {
            names.push(name.into());
            values.push(col);
        }
        let mut table = Self::new(names)?;

        let n_rows = values.first().map(|c| c.len()).unwrap_or(0);
        for (name, col) in table.columns.iter().zip(&values) {
            if col.len() != n_rows {
                return Err(TableError::ColumnLength {
                    column: name.clone(),
                    expected: n_rows,
                    found: col.len(),
                });
            }
        }

        let mut iters = values
            .into_iter()
            .map(|c| c.into_iter())
            .collect::<Vec<_>>();
        for _ in 0..n_rows {
            let row = iters
                .iter_mut()
                .map(|it| it.next().unwrap_or(CellValue::Missing))
                .collect::<Vec<_>>();
            table.rows.push(row);
        }
        Ok(table)
    }

    pub fn push_row(&mut self, row: Vec<CellValue>) -> Result<(), TableError> {
        if row.len() != self.columns.len() {
            return Err(TableError::RowWidth {
                row: self.rows.len(),
                expected: self.columns.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    pub fn column_values(&self, col: usize) -> impl Iterator<Item = &CellValue> + '_ {
        self.rows.iter().map(move |r| &r[col])
    }

    /// Removes every row holding a missing value in any of `columns`.
    /// Names not present in the table are ignored. Returns the number of
    /// rows removed.
    pub fn drop_incomplete(&mut self, columns: &[&str]) -> usize {
        let idx = columns
            .iter()
            .filter_map(|name| self.column_index(name))
            .collect::<Vec<_>>();
        let before = self.rows.len();
        self.rows
            .retain(|row| idx.iter().all(|&i| !row[i].is_missing()));
        before - self.rows.len()
    }
}
