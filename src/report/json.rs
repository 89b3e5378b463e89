use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;

use crate::model::record::IndexedTable;
use crate::model::registry::IndicatorRegistry;
use crate::model::table::CellValue;
use crate::model::weights::{DEFAULT_WEIGHT, WeightMapping};
use crate::report::{ReportError, ThemeShare, median, p10, p90, theme_weight_shares};

pub const TOP_REGIONS: usize = 10;

#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub tool: String,
    pub tool_version: String,
    pub registry: String,
    pub rows_read: usize,
    pub rows_dropped: usize,
    pub rows_indexed: usize,
    pub weighting: String,
    pub weights: BTreeMap<String, f64>,
    pub themes: Vec<ThemeShare>,
    pub index: IndexStats,
    pub top_regions: Vec<RegionScore>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IndexStats {
    pub min: f64,
    pub p10: f64,
    pub median: f64,
    pub p90: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegionScore {
    pub id: String,
    pub name: String,
    pub index: f64,
    pub percentile: f64,
}

pub struct SummaryInput<'a> {
    pub table: &'a IndexedTable,
    pub registry: &'a IndicatorRegistry,
    pub weights: Option<&'a WeightMapping>,
    pub rows_read: usize,
    pub rows_dropped: usize,
}

pub fn build_summary(input: &SummaryInput<'_>) -> Summary {
    let registry = input.registry;
    let index = input.table.index_values();

    let weights = registry
        .indicators()
        .iter()
        .map(|i| {
            let w = match input.weights {
                Some(m) => m.get(&i.column).unwrap_or(0.0),
                None => DEFAULT_WEIGHT,
            };
            (i.column.clone(), w)
        })
        .collect();

    let mut order = (0..input.table.n_rows()).collect::<Vec<_>>();
    order.sort_by(|&a, &b| index[b].total_cmp(&index[a]).then(a.cmp(&b)));
    let top_regions = order
        .into_iter()
        .take(TOP_REGIONS)
        .map(|row| {
            let r = &input.table.rows()[row];
            RegionScore {
                id: cell_text(input.table.core_value(row, registry.id_column())),
                name: cell_text(input.table.core_value(row, registry.name_column())),
                index: r.index,
                percentile: r.percentile,
            }
        })
        .collect();

    Summary {
        tool: env!("CARGO_PKG_NAME").to_string(),
        tool_version: env!("CARGO_PKG_VERSION").to_string(),
        registry: registry.version().to_string(),
        rows_read: input.rows_read,
        rows_dropped: input.rows_dropped,
        rows_indexed: input.table.n_rows(),
        weighting: if input.weights.is_some() {
            "custom".to_string()
        } else {
            "uniform-default".to_string()
        },
        weights,
        themes: theme_weight_shares(registry, input.weights),
        index: IndexStats {
            min: index.iter().copied().fold(f64::INFINITY, f64::min),
            p10: p10(&index),
            median: median(&index),
            p90: p90(&index),
            max: index.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        },
        top_regions,
    }
}

pub fn render_summary_json(summary: &Summary) -> Result<String, ReportError> {
    Ok(serde_json::to_string_pretty(summary)?)
}

pub fn write_summary_json(summary: &Summary, path: &Path) -> Result<(), ReportError> {
    let json = render_summary_json(summary)?;
    std::fs::write(path, json + "\n")?;
    Ok(())
}

fn cell_text(cell: Option<&CellValue>) -> String {
    match cell {
        Some(CellValue::Text(s)) => s.clone(),
        Some(CellValue::Number(v)) if v.fract() == 0.0 => format!("{}", *v as i64),
        Some(CellValue::Number(v)) => format!("{v}"),
        Some(CellValue::Missing) | None => String::new(),
    }
}
