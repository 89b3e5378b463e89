use crate::model::registry::IndicatorRegistry;
use crate::pipeline::IndexError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnStats {
    pub mean: f64,
    /// Population standard deviation (divides by n).
    pub std: f64,
}

#[derive(Debug)]
pub struct Stage2Output {
    pub z: Vec<Vec<f64>>,
    pub stats: Vec<ColumnStats>,
}

pub fn column_stats(values: &[f64]) -> ColumnStats {
    if values.is_empty() {
        return ColumnStats {
            mean: f64::NAN,
            std: f64::NAN,
        };
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    ColumnStats {
        mean,
        std: var.sqrt(),
    }
}

/// Standard scores against the population standard deviation. `None` when
/// the column has no spread.
///
/// Constant columns are caught by value, not by std: the mean of `[0.1; 3]`
/// carries a rounding residue and the std comes out near 1e-17.
pub fn zscore(values: &[f64]) -> Option<(Vec<f64>, ColumnStats)> {
    let first = *values.first()?;
    if values.iter().all(|&v| v == first) {
        return None;
    }
    let stats = column_stats(values);
    if !stats.std.is_finite() || stats.std == 0.0 {
        return None;
    }
    let z = values
        .iter()
        .map(|v| (v - stats.mean) / stats.std)
        .collect::<Vec<_>>();
    if z.iter().any(|v| !v.is_finite()) {
        return None;
    }
    Some((z, stats))
}

pub fn run_stage2(
    values: &[Vec<f64>],
    registry: &IndicatorRegistry,
) -> Result<Stage2Output, IndexError> {
    let mut z = Vec::with_capacity(values.len());
    let mut stats = Vec::with_capacity(values.len());
    for (col, indicator) in values.iter().zip(registry.indicators()) {
        let (scores, s) =
            zscore(col).ok_or_else(|| IndexError::DegenerateColumn(indicator.column.clone()))?;
        tracing::debug!(
            column = %indicator.column,
            mean = s.mean,
            std = s.std,
            "standardized indicator"
        );
        z.push(scores);
        stats.push(s);
    }
    Ok(Stage2Output { z, stats })
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage2_standardize.rs"]
mod tests;
