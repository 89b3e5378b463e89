use std::collections::BTreeMap;

use crate::model::record::{
    ColumnSource, ComputedRow, IndexedTable, IndicatorRecord, OutputColumn, STANDARDIZED_SUFFIX,
    WEIGHT_SUFFIX, WEIGHTED_SUFFIX,
};
use crate::model::registry::IndicatorRegistry;
use crate::model::table::IndicatorTable;
use crate::pipeline::stage1_validate::Stage1Output;
use crate::pipeline::stage3_weight::Stage3Output;

pub struct Stage5Inputs<'a> {
    pub table: &'a IndicatorTable,
    pub registry: &'a IndicatorRegistry,
    pub stage1: &'a Stage1Output,
    pub stage3: &'a Stage3Output,
    pub percentile: &'a [f64],
}

/// Flattened layout: identifier, name, index, percentile, then every other
/// column sorted by name.
pub fn build_layout(registry: &IndicatorRegistry) -> Vec<OutputColumn> {
    let mut rest = Vec::new();
    let mut pinned_id = None;
    let mut pinned_name = None;

    for (i, col) in registry.core_columns().iter().enumerate() {
        let out = OutputColumn {
            name: col.clone(),
            source: ColumnSource::Core(i),
        };
        if col == registry.id_column() {
            pinned_id = Some(out);
        } else if col == registry.name_column() {
            pinned_name = Some(out);
        } else {
            rest.push(out);
        }
    }

    for indicator in registry.indicators() {
        let c = &indicator.column;
        rest.push(OutputColumn {
            name: c.clone(),
            source: ColumnSource::Raw(c.clone()),
        });
        rest.push(OutputColumn {
            name: format!("{c}{STANDARDIZED_SUFFIX}"),
            source: ColumnSource::Standardized(c.clone()),
        });
        rest.push(OutputColumn {
            name: format!("{c}{WEIGHT_SUFFIX}"),
            source: ColumnSource::Weight(c.clone()),
        });
        rest.push(OutputColumn {
            name: format!("{c}{WEIGHTED_SUFFIX}"),
            source: ColumnSource::Weighted(c.clone()),
        });
    }
    rest.sort_by(|a, b| a.name.cmp(&b.name));

    let mut layout = Vec::with_capacity(rest.len() + 4);
    layout.extend(pinned_id);
    layout.extend(pinned_name);
    layout.push(OutputColumn {
        name: registry.index_column().to_string(),
        source: ColumnSource::Index,
    });
    layout.push(OutputColumn {
        name: registry.percentile_column().to_string(),
        source: ColumnSource::Percentile,
    });
    layout.extend(rest);
    layout
}

pub fn run_stage5(inputs: &Stage5Inputs<'_>) -> IndexedTable {
    let registry = inputs.registry;
    let n_rows = inputs.table.n_rows();
    let mut rows = Vec::with_capacity(n_rows);

    for row in 0..n_rows {
        let core = inputs
            .stage1
            .core_idx
            .iter()
            .map(|&i| inputs.table.rows()[row][i].clone())
            .collect();

        let mut indicators = BTreeMap::new();
        for (k, indicator) in registry.indicators().iter().enumerate() {
            indicators.insert(
                indicator.column.clone(),
                IndicatorRecord {
                    raw: inputs.stage1.values[k][row],
                    standardized: inputs.stage3.signed[k][row],
                    weight: inputs.stage1.weights[k],
                    weighted: inputs.stage3.weighted[k][row],
                },
            );
        }

        rows.push(ComputedRow {
            core,
            indicators,
            index: inputs.stage3.index[row],
            percentile: inputs.percentile[row],
        });
    }

    IndexedTable {
        registry_version: registry.version().to_string(),
        core_columns: registry.core_columns().to_vec(),
        id_column: registry.id_column().to_string(),
        layout: build_layout(registry),
        rows,
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage5_assemble.rs"]
mod tests;
