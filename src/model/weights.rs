use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::registry::IndicatorRegistry;

/// Weight applied to every indicator when no mapping is supplied.
pub const DEFAULT_WEIGHT: f64 = 0.1;
pub const MIN_WEIGHT: f64 = 0.0;
pub const MAX_WEIGHT: f64 = 1.0;

/// Indicator column name to weight. Serialized as a flat JSON object.
///
/// Entries are checked against a registry only when the mapping is handed to
/// the engine, so a mapping may be built up incrementally.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightMapping {
    weights: BTreeMap<String, f64>,
}

impl WeightMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// One entry per registry indicator, all set to `weight`.
    pub fn uniform(registry: &IndicatorRegistry, weight: f64) -> Self {
        let weights = registry
            .indicators()
            .iter()
            .map(|i| (i.column.clone(), weight))
            .collect();
        Self { weights }
    }

    pub fn from_pairs<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        let weights = pairs.into_iter().map(|(k, w)| (k.into(), w)).collect();
        Self { weights }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn insert(&mut self, column: impl Into<String>, weight: f64) -> Option<f64> {
        self.weights.insert(column.into(), weight)
    }

    pub fn remove(&mut self, column: &str) -> Option<f64> {
        self.weights.remove(column)
    }

    pub fn get(&self, column: &str) -> Option<f64> {
        self.weights.get(column).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.weights.iter().map(|(k, &w)| (k.as_str(), w))
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Multiplies every weight by `factor`. The result is not range-checked.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            weights: self
                .weights
                .iter()
                .map(|(k, &w)| (k.clone(), w * factor))
                .collect(),
        }
    }
}

pub fn weight_in_range(weight: f64) -> bool {
    weight.is_finite() && (MIN_WEIGHT..=MAX_WEIGHT).contains(&weight)
}
