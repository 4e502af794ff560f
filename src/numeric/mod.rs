// ============================================================================
// Numeric Module
// Exact decimal values, rounding and precision for amounts
// ============================================================================
//
// This module provides:
// - DecimalValue: exact sign/digits/scale decimal, no float in storage
// - RoundingMode + rounding operations over discarded digit tails
// - PrecisionModel: derive, pad or round recorded digit counts
// - AmountError: error kinds shared by the whole crate
//
// Design principles:
// - Exact until an explicit rounding step is applied
// - All fallible operations return Result (no panics)
// - One pure dispatch function decides every rounding mode

mod decimal_value;
mod errors;
mod precision;
mod rounding;

pub use decimal_value::{DecimalValue, MAX_SCALE_MAGNITUDE};
pub use errors::{AmountError, AmountResult};
pub use precision::{
    Precision, PrecisionModel, PrecisionRequest, MAX_FRACTION_DIGITS, MAX_SIGNIFICANT_DIGITS,
};
pub use rounding::{
    round_to_fraction_digits, round_to_significant_digits, rounds_up, RoundingMode, TailShape,
};
