// ============================================================================
// Units Module
// Unit tags, the conversion graph and locale/usage unit preferences
// ============================================================================

mod conversion_graph;
mod dataset;
mod preferences;
mod unit;

pub use conversion_graph::{AffineTransform, ConversionGraph, UnitNode};
pub use dataset::{PreferenceRecord, UnitDataset, UnitRecord};
pub use preferences::{
    UnitPreference, UnitPreferenceResolver, UnitPreferenceTable, DEFAULT_USAGE, ROOT_LOCALE,
};
pub use unit::{is_currency_code, is_unit_identifier, QuantityType, UnitTag};
