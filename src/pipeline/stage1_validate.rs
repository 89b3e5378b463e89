use std::collections::BTreeSet;

use crate::model::registry::IndicatorRegistry;
use crate::model::table::{CellValue, IndicatorTable};
use crate::model::weights::{DEFAULT_WEIGHT, WeightMapping, weight_in_range};
use crate::pipeline::IndexError;

/// Indicator values and weights extracted from the input, in registry
/// indicator order.
#[derive(Debug)]
pub struct Stage1Output {
    /// Table column index for each registry core column.
    pub core_idx: Vec<usize>,
    /// `values[k][row]` is the raw value of indicator `k`.
    pub values: Vec<Vec<f64>>,
    pub weights: Vec<f64>,
}

pub fn run_stage1(
    table: &IndicatorTable,
    registry: &IndicatorRegistry,
    weights: Option<&WeightMapping>,
) -> Result<Stage1Output, IndexError> {
    let resolved = resolve_weights(registry, weights)?;

    if table.is_empty() {
        return Err(IndexError::InvalidInput("indicator table has no rows".to_string()));
    }

    let mut core_idx = Vec::with_capacity(registry.core_columns().len());
    for col in registry.core_columns() {
        let idx = table
            .column_index(col)
            .ok_or_else(|| IndexError::MissingColumn(col.clone()))?;
        core_idx.push(idx);
    }

    let mut values = Vec::with_capacity(registry.indicators().len());
    for indicator in registry.indicators() {
        let idx = table
            .column_index(&indicator.column)
            .ok_or_else(|| IndexError::MissingColumn(indicator.column.clone()))?;
        values.push(numeric_column(table, idx, &indicator.column)?);
    }

    check_unique_ids(table, registry)?;

    Ok(Stage1Output {
        core_idx,
        values,
        weights: resolved,
    })
}

/// Weight per registry indicator. Without a mapping every indicator gets
/// [`DEFAULT_WEIGHT`]; with one, every indicator must be present.
pub fn resolve_weights(
    registry: &IndicatorRegistry,
    weights: Option<&WeightMapping>,
) -> Result<Vec<f64>, IndexError> {
    let Some(mapping) = weights else {
        return Ok(vec![DEFAULT_WEIGHT; registry.indicators().len()]);
    };

    for (column, weight) in mapping.iter() {
        if !registry.is_indicator(column) {
            return Err(IndexError::InvalidInput(format!(
                "weight given for {column}, which is not an indicator"
            )));
        }
        if !weight_in_range(weight) {
            return Err(IndexError::InvalidInput(format!(
                "weight for {column} is {weight}, expected a value in [0, 1]"
            )));
        }
    }

    let missing = registry
        .indicators()
        .iter()
        .filter(|i| mapping.get(&i.column).is_none())
        .map(|i| i.column.clone())
        .collect::<Vec<_>>();
    if !missing.is_empty() {
        return Err(IndexError::IncompleteWeights(missing));
    }

    Ok(registry
        .indicators()
        .iter()
        .filter_map(|i| mapping.get(&i.column))
        .collect())
}

fn numeric_column(
    table: &IndicatorTable,
    idx: usize,
    column: &str,
) -> Result<Vec<f64>, IndexError> {
    let mut out = Vec::with_capacity(table.n_rows());
    for (row, cell) in table.column_values(idx).enumerate() {
        match cell {
            CellValue::Number(v) if v.is_finite() => out.push(*v),
            CellValue::Number(v) => {
                return Err(IndexError::InvalidInput(format!(
                    "{column} row {row} is {v}; incomplete rows must be dropped before indexing"
                )));
            }
            CellValue::Missing => {
                return Err(IndexError::InvalidInput(format!(
                    "{column} row {row} is missing; incomplete rows must be dropped before indexing"
                )));
            }
            CellValue::Text(s) => {
                return Err(IndexError::InvalidInput(format!(
                    "{column} row {row} is not numeric: {s:?}"
                )));
            }
        }
    }
    Ok(out)
}

fn check_unique_ids(table: &IndicatorTable, registry: &IndicatorRegistry) -> Result<(), IndexError> {
    let idx = table
        .column_index(registry.id_column())
        .ok_or_else(|| IndexError::MissingColumn(registry.id_column().to_string()))?;
    let mut seen = BTreeSet::new();
    for (row, cell) in table.column_values(idx).enumerate() {
        let key = match cell {
            CellValue::Number(v) => format!("n:{}", v.to_bits()),
            CellValue::Text(s) => format!("t:{s}"),
            CellValue::Missing => {
                return Err(IndexError::InvalidInput(format!(
                    "{} row {row} is missing",
                    registry.id_column()
                )));
            }
        };
        if !seen.insert(key) {
            return Err(IndexError::InvalidInput(format!(
                "duplicate {} at row {row}",
                registry.id_column()
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage1_validate.rs"]
mod tests;
