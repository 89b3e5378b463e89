pub mod stage1_validate;
pub mod stage2_standardize;
pub mod stage3_weight;
pub mod stage4_rank;
pub mod stage5_assemble;

use thiserror::Error;

use crate::model::record::IndexedTable;
use crate::model::registry::IndicatorRegistry;
use crate::model::table::IndicatorTable;
use crate::model::weights::WeightMapping;
use stage1_validate::run_stage1;
use stage2_standardize::run_stage2;
use stage3_weight::run_stage3;
use stage4_rank::run_stage4;
use stage5_assemble::{Stage5Inputs, run_stage5};

/// Failure of a single index computation. No partial result is produced.
#[derive(Debug, Error, PartialEq)]
pub enum IndexError {
    #[error("missing column: {0}")]
    MissingColumn(String),
    #[error("weights missing for indicators: {}", .0.join(", "))]
    IncompleteWeights(Vec<String>),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("indicator {0} has zero variance; cannot standardize")]
    DegenerateColumn(String),
}

/// Standardizes, weights, sums and ranks every registry indicator.
///
/// `weights = None` applies the default weight to every indicator. A mapping,
/// when given, must name every indicator.
pub fn compute_index(
    table: &IndicatorTable,
    registry: &IndicatorRegistry,
    weights: Option<&WeightMapping>,
) -> Result<IndexedTable, IndexError> {
    tracing::debug!(
        registry = registry.version(),
        rows = table.n_rows(),
        indicators = registry.indicators().len(),
        weighted = weights.is_some(),
        "computing composite index"
    );

    let stage1 = run_stage1(table, registry, weights)?;
    let stage2 = run_stage2(&stage1.values, registry)?;
    let stage3 = run_stage3(&stage2.z, &stage1.weights, registry);
    let percentile = run_stage4(&stage3.index);

    Ok(run_stage5(&Stage5Inputs {
        table,
        registry,
        stage1: &stage1,
        stage3: &stage3,
        percentile: &percentile,
    }))
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/compute_index.rs"]
mod tests;
