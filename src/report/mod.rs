pub mod json;
pub mod tsv;

use serde::Serialize;
use thiserror::Error;

use crate::model::registry::IndicatorRegistry;
use crate::model::weights::{DEFAULT_WEIGHT, WeightMapping};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Summed weight of one theme and its share of the total weight.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThemeShare {
    pub theme: String,
    pub weight: f64,
    pub share: f64,
}

/// Per-theme weight totals in registry theme order. A missing weight entry
/// counts as [`DEFAULT_WEIGHT`] only when no mapping is given at all.
pub fn theme_weight_shares(
    registry: &IndicatorRegistry,
    weights: Option<&WeightMapping>,
) -> Vec<ThemeShare> {
    let weight_of = |column: &str| match weights {
        Some(w) => w.get(column).unwrap_or(0.0),
        None => DEFAULT_WEIGHT,
    };

    let totals = registry
        .themes()
        .iter()
        .map(|t| {
            let sum = t.indicators.iter().map(|c| weight_of(c.as_str())).sum::<f64>();
            (t.name.clone(), sum)
        })
        .collect::<Vec<_>>();
    let grand = totals.iter().map(|(_, w)| w).sum::<f64>();

    totals
        .into_iter()
        .map(|(theme, weight)| ThemeShare {
            theme,
            weight,
            share: if grand > 0.0 { weight / grand } else { 0.0 },
        })
        .collect()
}

pub fn format_f64_6(v: f64) -> String {
    format!("{:.6}", v)
}

pub fn quantile_indexed(values: &[f64], p: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let n = sorted.len();
    let idx = ((n - 1) as f64 * p).ceil() as usize;
    sorted[idx.min(n - 1)]
}

pub fn median(values: &[f64]) -> f64 {
    quantile_indexed(values, 0.5)
}

pub fn p10(values: &[f64]) -> f64 {
    quantile_indexed(values, 0.10)
}

pub fn p90(values: &[f64]) -> f64 {
    quantile_indexed(values, 0.90)
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/mod.rs"]
mod tests;
