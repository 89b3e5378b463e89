use crate::model::registry::IndicatorRegistry;

pub const INDEX_DECIMALS: i32 = 4;

#[derive(Debug)]
pub struct Stage3Output {
    /// Standardized values after sign inversion of reversed indicators.
    pub signed: Vec<Vec<f64>>,
    pub weighted: Vec<Vec<f64>>,
    pub index: Vec<f64>,
}

/// Rounds half to even, matching how the dashboards displayed the index.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round_ties_even() / scale
}

pub fn run_stage3(z: &[Vec<f64>], weights: &[f64], registry: &IndicatorRegistry) -> Stage3Output {
    let n_rows = z.first().map(Vec::len).unwrap_or(0);

    let mut signed = Vec::with_capacity(z.len());
    let mut weighted = Vec::with_capacity(z.len());
    for ((col, &w), indicator) in z.iter().zip(weights).zip(registry.indicators()) {
        let s = if indicator.reversed {
            col.iter().map(|v| -v).collect::<Vec<_>>()
        } else {
            col.clone()
        };
        weighted.push(s.iter().map(|v| v * w).collect::<Vec<_>>());
        signed.push(s);
    }

    let mut index = vec![0.0f64; n_rows];
    for (row, out) in index.iter_mut().enumerate() {
        let sum = weighted.iter().map(|col| col[row]).sum::<f64>();
        *out = round_to(sum, INDEX_DECIMALS);
    }

    Stage3Output {
        signed,
        weighted,
        index,
    }
}
