pub mod record;
pub mod registry;
pub mod table;
pub mod weights;

pub use record::{ColumnSource, ComputedRow, IndexedTable, IndicatorRecord, OutputColumn};
pub use registry::{Indicator, IndicatorRegistry, RegistryDef, RegistryError, Theme};
pub use table::{CellValue, IndicatorTable, TableError};
pub use weights::{DEFAULT_WEIGHT, WeightMapping};
