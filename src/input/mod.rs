use std::collections::BTreeSet;
use std::path::Path;

use thiserror::Error;

pub mod reader;

use crate::model::registry::IndicatorRegistry;
use crate::model::table::{CellValue, IndicatorTable, TableError};
use reader::open_delimited;

const MISSING_TOKENS: &[&str] = &["", "NA", "N/A", "NaN", "nan", "null", "NULL", "None"];

#[derive(Debug, Error)]
pub enum InputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("missing input: {0}")]
    MissingInput(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Table(#[from] TableError),
}

#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub table: IndicatorTable,
    pub n_read: usize,
    pub n_dropped: usize,
}

/// Reads a delimited indicator table and drops rows that cannot be indexed.
///
/// Indicator columns are parsed as numbers; every other column is kept as
/// text exactly as written. Rows with a missing value in any registry column
/// are removed.
pub fn load_table(path: &Path, registry: &IndicatorRegistry) -> Result<LoadedTable, InputError> {
    let mut reader = open_delimited(path)?;
    let header = reader
        .headers()?
        .iter()
        .map(|s| s.trim().trim_start_matches('\u{feff}').to_string())
        .collect::<Vec<_>>();
    if header.is_empty() {
        return Err(InputError::Parse(format!("{} is empty", path.display())));
    }

    let present = header.iter().map(String::as_str).collect::<BTreeSet<_>>();
    let absent = registry
        .required_columns()
        .into_iter()
        .filter(|c| !present.contains(c))
        .collect::<Vec<_>>();
    if !absent.is_empty() {
        return Err(InputError::MissingInput(format!(
            "{} lacks registry columns: {}",
            path.display(),
            absent.join(", ")
        )));
    }

    let numeric = header
        .iter()
        .map(|name| registry.is_indicator(name))
        .collect::<Vec<_>>();

    let mut table = IndicatorTable::new(header)?;
    let width = table.columns().len();

    for record in reader.records() {
        let record = record?;
        if record.len() == 1 && record[0].trim().is_empty() {
            continue;
        }
        if record.len() != width {
            let line = record.position().map_or(0, |p| p.line());
            return Err(InputError::Parse(format!(
                "line {line} has {} fields, header has {width}",
                record.len()
            )));
        }
        let row = record
            .iter()
            .zip(&numeric)
            .map(|(field, &is_numeric)| parse_cell(field, is_numeric))
            .collect();
        table.push_row(row)?;
    }

    let n_read = table.n_rows();
    let n_dropped = table.drop_incomplete(&registry.required_columns());
    if n_dropped > 0 {
        tracing::warn!(
            dropped = n_dropped,
            kept = table.n_rows(),
            "dropped rows with missing values in registry columns"
        );
    }
    tracing::info!(
        path = %path.display(),
        rows = table.n_rows(),
        columns = width,
        "loaded indicator table"
    );

    Ok(LoadedTable {
        table,
        n_read,
        n_dropped,
    })
}

pub fn parse_cell(field: &str, numeric: bool) -> CellValue {
    let f = field.trim();
    if MISSING_TOKENS.contains(&f) {
        return CellValue::Missing;
    }
    if numeric {
        match f.parse::<f64>() {
            Ok(v) if v.is_nan() => CellValue::Missing,
            Ok(v) => CellValue::Number(v),
            Err(_) => CellValue::Text(f.to_string()),
        }
    } else {
        CellValue::Text(f.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/tests.rs"]
mod tests;
