pub mod defs;

use std::path::Path;

use crate::model::registry::{IndicatorRegistry, RegistryError};

pub use defs::{MADAGASCAR_V3, MADAGASCAR_V3_THEMED, builtin_names};

/// Validated built-in registry by name.
pub fn builtin(name: &str) -> Option<Result<IndicatorRegistry, RegistryError>> {
    defs::builtin_def(name).map(IndicatorRegistry::from_def)
}

/// Resolves a registry argument: a built-in name, or else a path to a JSON
/// registry definition.
pub fn resolve(name_or_path: &str) -> Result<IndicatorRegistry, ResolveError> {
    if let Some(registry) = builtin(name_or_path) {
        return Ok(registry?);
    }
    let path = Path::new(name_or_path);
    if !path.exists() {
        return Err(ResolveError::Unknown(name_or_path.to_string()));
    }
    let json = std::fs::read_to_string(path)?;
    Ok(IndicatorRegistry::from_json(&json)?)
}

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("unknown registry {0} (not a built-in name or an existing file)")]
    Unknown(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

#[cfg(test)]
#[path = "../../tests/src_inline/registry/tests.rs"]
mod tests;
