use std::collections::BTreeMap;

use crate::model::table::CellValue;

pub const STANDARDIZED_SUFFIX: &str = "_normalized";
pub const WEIGHT_SUFFIX: &str = "_weight";
pub const WEIGHTED_SUFFIX: &str = "_weighted_zscore";

/// Per-indicator values for one region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorRecord {
    pub raw: f64,
    /// z-score, already sign-flipped for reversed indicators.
    pub standardized: f64,
    pub weight: f64,
    pub weighted: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComputedRow {
    /// Aligned with [`IndexedTable::core_columns`].
    pub core: Vec<CellValue>,
    pub indicators: BTreeMap<String, IndicatorRecord>,
    pub index: f64,
    pub percentile: f64,
}

/// Where a flattened output column takes its value from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnSource {
    Core(usize),
    Raw(String),
    Standardized(String),
    Weight(String),
    Weighted(String),
    Index,
    Percentile,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputColumn {
    pub name: String,
    pub source: ColumnSource,
}

/// Result of one index computation. Immutable once assembled.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedTable {
    pub(crate) registry_version: String,
    pub(crate) core_columns: Vec<String>,
    pub(crate) id_column: String,
    pub(crate) layout: Vec<OutputColumn>,
    pub(crate) rows: Vec<ComputedRow>,
}

impl IndexedTable {
    pub fn registry_version(&self) -> &str {
        &self.registry_version
    }

    pub fn core_columns(&self) -> &[String] {
        &self.core_columns
    }

    pub fn rows(&self) -> &[ComputedRow] {
        &self.rows
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn layout(&self) -> &[OutputColumn] {
        &self.layout
    }

    /// Flattened column names: pinned columns first, the rest sorted.
    pub fn column_names(&self) -> Vec<&str> {
        self.layout.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn index_values(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.index).collect()
    }

    pub fn percentile_values(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.percentile).collect()
    }

    pub fn core_value(&self, row: usize, column: &str) -> Option<&CellValue> {
        let idx = self.core_columns.iter().position(|c| c == column)?;
        self.rows.get(row).and_then(|r| r.core.get(idx))
    }

    pub fn record(&self, row: usize, indicator: &str) -> Option<&IndicatorRecord> {
        self.rows.get(row).and_then(|r| r.indicators.get(indicator))
    }

    /// Row whose identifier column equals `id`.
    pub fn find(&self, id: &CellValue) -> Option<&ComputedRow> {
        let idx = self.core_columns.iter().position(|c| *c == self.id_column)?;
        self.rows.iter().find(|r| r.core.get(idx) == Some(id))
    }

    pub fn value(&self, row: &ComputedRow, source: &ColumnSource) -> CellValue {
        let number = |v: Option<f64>| v.map(CellValue::Number).unwrap_or(CellValue::Missing);
        match source {
            ColumnSource::Core(i) => row.core.get(*i).cloned().unwrap_or(CellValue::Missing),
            ColumnSource::Raw(c) => number(row.indicators.get(c).map(|r| r.raw)),
            ColumnSource::Standardized(c) => {
                number(row.indicators.get(c).map(|r| r.standardized))
            }
            ColumnSource::Weight(c) => number(row.indicators.get(c).map(|r| r.weight)),
            ColumnSource::Weighted(c) => number(row.indicators.get(c).map(|r| r.weighted)),
            ColumnSource::Index => CellValue::Number(row.index),
            ColumnSource::Percentile => CellValue::Number(row.percentile),
        }
    }

    /// One row in flattened column order.
    pub fn flat_row(&self, row: usize) -> Option<Vec<CellValue>> {
        let r = self.rows.get(row)?;
        Some(self.layout.iter().map(|c| self.value(r, &c.source)).collect())
    }
}
