use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::record::{STANDARDIZED_SUFFIX, WEIGHT_SUFFIX, WEIGHTED_SUFFIX};

pub const DEFAULT_INDEX_COLUMN: &str = "Vulnerability_Index";
pub const DEFAULT_PERCENTILE_COLUMN: &str = "Vulnerability_Index_Percentile";

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("registry {0} declares no indicator columns")]
    NoIndicators(String),
    #[error("column {0} is declared more than once")]
    DuplicateColumn(String),
    #[error("column {0} is both a core column and an indicator")]
    CoreIndicatorOverlap(String),
    #[error("reversed column {0} is not an indicator")]
    UnknownReversed(String),
    #[error("theme {theme} lists {column}, which is not an indicator")]
    UnknownThemeMember { theme: String, column: String },
    #[error("theme {0} is declared more than once")]
    DuplicateTheme(String),
    #[error("label given for {0}, which is not an indicator")]
    UnknownLabel(String),
    #[error("{role} column {column} is not a core column")]
    PinnedNotCore { role: &'static str, column: String },
    #[error("computed column {0} clashes with an input column")]
    ComputedColumnClash(String),
    #[error("derived output column {0} clashes with another output column")]
    DerivedColumnClash(String),
    #[error("registry parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub indicators: Vec<String>,
}

/// Unvalidated registry configuration, as written in JSON or in the
/// built-in definitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistryDef {
    pub version: String,
    pub id_column: String,
    pub name_column: String,
    #[serde(default = "default_index_column")]
    pub index_column: String,
    #[serde(default = "default_percentile_column")]
    pub percentile_column: String,
    pub core_columns: Vec<String>,
    pub indicator_columns: Vec<String>,
    #[serde(default)]
    pub reversed_columns: Vec<String>,
    #[serde(default)]
    pub themes: Vec<Theme>,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

fn default_index_column() -> String {
    DEFAULT_INDEX_COLUMN.to_string()
}

fn default_percentile_column() -> String {
    DEFAULT_PERCENTILE_COLUMN.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Indicator {
    pub column: String,
    pub label: Option<String>,
    pub reversed: bool,
}

impl Indicator {
    pub fn display_name(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.column)
    }
}

/// Validated, immutable description of which columns feed the index.
///
/// Only obtainable through [`IndicatorRegistry::from_def`], so every value
/// of this type satisfies the registry invariants.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorRegistry {
    version: String,
    id_column: String,
    name_column: String,
    index_column: String,
    percentile_column: String,
    core_columns: Vec<String>,
    indicators: Vec<Indicator>,
    themes: Vec<Theme>,
}

impl IndicatorRegistry {
    pub fn from_def(def: RegistryDef) -> Result<Self, RegistryError> {
        if def.indicator_columns.is_empty() {
            return Err(RegistryError::NoIndicators(def.version));
        }

        let mut seen = BTreeSet::new();
        for col in def.core_columns.iter().chain(&def.indicator_columns) {
            if !seen.insert(col.as_str()) {
                let is_core = def.core_columns.contains(col);
                let is_indicator = def.indicator_columns.contains(col);
                if is_core && is_indicator {
                    return Err(RegistryError::CoreIndicatorOverlap(col.clone()));
                }
                return Err(RegistryError::DuplicateColumn(col.clone()));
            }
        }

        let indicator_set = def
            .indicator_columns
            .iter()
            .map(String::as_str)
            .collect::<BTreeSet<_>>();

        for col in &def.reversed_columns {
            if !indicator_set.contains(col.as_str()) {
                return Err(RegistryError::UnknownReversed(col.clone()));
            }
        }

        let mut theme_names = BTreeSet::new();
        for theme in &def.themes {
            if !theme_names.insert(theme.name.as_str()) {
                return Err(RegistryError::DuplicateTheme(theme.name.clone()));
            }
            for col in &theme.indicators {
                if !indicator_set.contains(col.as_str()) {
                    return Err(RegistryError::UnknownThemeMember {
                        theme: theme.name.clone(),
                        column: col.clone(),
                    });
                }
            }
        }

        for col in def.labels.keys() {
            if !indicator_set.contains(col.as_str()) {
                return Err(RegistryError::UnknownLabel(col.clone()));
            }
        }

        for (role, col) in [("id", &def.id_column), ("name", &def.name_column)] {
            if !def.core_columns.contains(col) {
                return Err(RegistryError::PinnedNotCore {
                    role,
                    column: col.clone(),
                });
            }
        }

        for computed in [&def.index_column, &def.percentile_column] {
            if seen.contains(computed.as_str()) {
                return Err(RegistryError::ComputedColumnClash(computed.clone()));
            }
        }
        if def.index_column == def.percentile_column {
            return Err(RegistryError::ComputedColumnClash(def.index_column));
        }

        // Every output column name must be unique once the per-indicator
        // columns are added.
        let derived = def
            .indicator_columns
            .iter()
            .flat_map(|c| {
                [STANDARDIZED_SUFFIX, WEIGHT_SUFFIX, WEIGHTED_SUFFIX]
                    .map(|suffix| format!("{c}{suffix}"))
            })
            .collect::<Vec<_>>();
        let mut taken = seen.clone();
        taken.insert(def.index_column.as_str());
        taken.insert(def.percentile_column.as_str());
        for name in &derived {
            if !taken.insert(name.as_str()) {
                return Err(RegistryError::DerivedColumnClash(name.clone()));
            }
        }

        let indicators = def
            .indicator_columns
            .iter()
            .map(|col| Indicator {
                column: col.clone(),
                label: def.labels.get(col).cloned(),
                reversed: def.reversed_columns.contains(col),
            })
            .collect();

        Ok(Self {
            version: def.version,
            id_column: def.id_column,
            name_column: def.name_column,
            index_column: def.index_column,
            percentile_column: def.percentile_column,
            core_columns: def.core_columns,
            indicators,
            themes: def.themes,
        })
    }

    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let def: RegistryDef = serde_json::from_str(json)?;
        Self::from_def(def)
    }

    /// Inverse of [`IndicatorRegistry::from_def`].
    pub fn to_def(&self) -> RegistryDef {
        RegistryDef {
            version: self.version.clone(),
            id_column: self.id_column.clone(),
            name_column: self.name_column.clone(),
            index_column: self.index_column.clone(),
            percentile_column: self.percentile_column.clone(),
            core_columns: self.core_columns.clone(),
            indicator_columns: self.indicators.iter().map(|i| i.column.clone()).collect(),
            reversed_columns: self
                .indicators
                .iter()
                .filter(|i| i.reversed)
                .map(|i| i.column.clone())
                .collect(),
            themes: self.themes.clone(),
            labels: self
                .indicators
                .iter()
                .filter_map(|i| i.label.clone().map(|l| (i.column.clone(), l)))
                .collect(),
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn id_column(&self) -> &str {
        &self.id_column
    }

    pub fn name_column(&self) -> &str {
        &self.name_column
    }

    pub fn index_column(&self) -> &str {
        &self.index_column
    }

    pub fn percentile_column(&self) -> &str {
        &self.percentile_column
    }

    pub fn core_columns(&self) -> &[String] {
        &self.core_columns
    }

    pub fn indicators(&self) -> &[Indicator] {
        &self.indicators
    }

    pub fn indicator(&self, column: &str) -> Option<&Indicator> {
        self.indicators.iter().find(|i| i.column == column)
    }

    pub fn is_indicator(&self, column: &str) -> bool {
        self.indicator(column).is_some()
    }

    pub fn is_reversed(&self, column: &str) -> bool {
        self.indicator(column).is_some_and(|i| i.reversed)
    }

    pub fn themes(&self) -> &[Theme] {
        &self.themes
    }

    /// Core columns followed by indicator columns, in declaration order.
    pub fn required_columns(&self) -> Vec<&str> {
        self.core_columns
            .iter()
            .map(String::as_str)
            .chain(self.indicators.iter().map(|i| i.column.as_str()))
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/registry.rs"]
mod tests;
