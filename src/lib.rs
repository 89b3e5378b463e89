//! Weighted composite vulnerability index over regional indicator tables.
//!
//! [`compute_index`] is the pure core: it standardizes each registry
//! indicator, flips reversed indicators, applies weights, sums into an index
//! and ranks it as a percentile. [`input`] and [`report`] are the loader and
//! export collaborators used by the `vindex` binary.

pub mod input;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod registry;
pub mod report;

pub use model::{
    CellValue, ComputedRow, IndexedTable, IndicatorRecord, IndicatorRegistry, IndicatorTable,
    RegistryDef, RegistryError, Theme, WeightMapping, DEFAULT_WEIGHT,
};
pub use pipeline::{IndexError, compute_index};
