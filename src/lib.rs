// ============================================================================
// Amount Engine Library
// Immutable amounts with explicit precision and CLDR-style unit conversion
// ============================================================================

//! # Amount Engine
//!
//! An immutable `Amount` value that carries a decimal number, an optional
//! unit or currency, and an explicit precision, plus conversion between
//! measurement units with well-defined rounding.
//!
//! ## Features
//!
//! - **Exact decimals** stored as sign, digits and scale; no float in storage
//! - **Eight rounding modes** (`ceil`, `floor`, `expand`, `trunc`, `halfCeil`,
//!   `halfFloor`, `halfEven`, `halfExpand`) decided by one pure function
//! - **Precision model** that zero-pads on upgrade and rounds on downgrade
//! - **Conversion graph** of affine unit → base edges per quantity type
//! - **Locale/usage unit preferences** with fallback and magnitude thresholds
//! - **Pluggable locale renderer** for `to_locale_string`
//!
//! ## Example
//!
//! ```rust
//! use amount_engine::prelude::*;
//!
//! let engine = ConversionEngineBuilder::cldr_core().build().unwrap();
//!
//! // Precision is read off the literal
//! let length: Amount = "1.75[foot]".parse().unwrap();
//! assert_eq!(length.significant_digits(), 3);
//!
//! // Convert and round with the default digit options
//! let inches = length.convert_to(&engine, &ConvertOptions::to_unit("inch")).unwrap();
//! assert_eq!(inches.to_string(), "21[inch]");
//!
//! // Re-render precision without converting
//! let padded = inches.with(&WithOptions::new().with_fraction_digits(2)).unwrap();
//! assert_eq!(padded.to_string(), "21.00[inch]");
//!
//! // Let the locale pick the unit
//! let height: Amount = "180[centimeter]".parse().unwrap();
//! let us = height
//!     .convert_to(&engine, &ConvertOptions::for_locale("en-US").with_usage("person-height"))
//!     .unwrap();
//! assert_eq!(us.to_string(), "70.866[inch]");
//! ```

pub mod domain;
pub mod engine;
pub mod interfaces;
pub mod numeric;
pub mod units;

// Re-exports for convenience
pub mod prelude {
    pub use crate::domain::{
        Amount, AmountOptions, ConvertOptions, DigitOptions, DisplayOptions, DisplayUnit,
        EngineConfig, RoundingPriority, WithOptions,
    };
    pub use crate::engine::{create_from_config, ConversionEngine, ConversionEngineBuilder};
    pub use crate::interfaces::{
        LocaleRenderer, LoggingRenderer, PlainRenderer, RenderRequest, RenderStyle,
    };
    pub use crate::numeric::{
        AmountError, AmountResult, DecimalValue, Precision, PrecisionRequest, RoundingMode,
    };
    pub use crate::units::{
        ConversionGraph, QuantityType, UnitDataset, UnitNode, UnitPreference,
        UnitPreferenceTable, UnitTag,
    };
}
