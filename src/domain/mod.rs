// ============================================================================
// Domain Models Module
// The Amount value type, its option records and engine configuration
// ============================================================================

pub mod amount;
pub mod config;
pub mod digit_options;
pub mod options;

pub use amount::Amount;
pub use config::EngineConfig;
pub use digit_options::{DigitOptions, DigitOptionsInput, RoundingTarget};
pub use options::{
    AmountOptions, ConvertOptions, DisplayOptions, DisplayUnit, RoundingPriority, WithOptions,
    SENTINEL_UNIT,
};
