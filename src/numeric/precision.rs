// ============================================================================
// Precision Model
// Derive, upgrade (zero-pad) or downgrade (round) recorded digit counts
// ============================================================================

use super::decimal_value::DecimalValue;
use super::errors::{AmountError, AmountResult};
use super::rounding::{round_to_fraction_digits, round_to_significant_digits, RoundingMode};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Upper bound for any fraction-digit request.
pub const MAX_FRACTION_DIGITS: u32 = 100;

/// Upper bound for any significant-digit request.
pub const MAX_SIGNIFICANT_DIGITS: u32 = 21;

/// Recorded precision of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Precision {
    pub significant_digits: u32,
    pub fractional_digits: u32,
}

impl Precision {
    /// Read the digit counts off a value's literal representation.
    pub fn of(value: &DecimalValue) -> Self {
        Self {
            significant_digits: value.significant_digits(),
            fractional_digits: value.fractional_digits(),
        }
    }
}

/// Requested digit counts; at most one of the two counts may be set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PrecisionRequest {
    pub fraction_digits: Option<u32>,
    pub significant_digits: Option<u32>,
    pub rounding_mode: Option<RoundingMode>,
}

impl PrecisionRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fraction_digits(mut self, digits: u32) -> Self {
        self.fraction_digits = Some(digits);
        self
    }

    pub fn with_significant_digits(mut self, digits: u32) -> Self {
        self.significant_digits = Some(digits);
        self
    }

    pub fn with_rounding_mode(mut self, mode: RoundingMode) -> Self {
        self.rounding_mode = Some(mode);
        self
    }

    /// Reject conflicting or out-of-domain requests.
    pub fn validate(&self) -> AmountResult<()> {
        if self.fraction_digits.is_some() && self.significant_digits.is_some() {
            return Err(AmountError::validation(
                "fractionDigits and significantDigits cannot both be specified",
            ));
        }
        if let Some(digits) = self.fraction_digits {
            AmountError::check_range("fractionDigits", digits, 0, MAX_FRACTION_DIGITS)?;
        }
        if let Some(digits) = self.significant_digits {
            AmountError::check_range("significantDigits", digits, 1, MAX_SIGNIFICANT_DIGITS)?;
        }
        Ok(())
    }
}

/// Applies precision requests to values.
///
/// Upgrades pad with exact zeros and never consult the rounding mode.
/// Downgrades round with the requested mode (or the model's default) and
/// then recompute the sibling digit count from the rounded result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PrecisionModel {
    default_mode: RoundingMode,
}

impl PrecisionModel {
    pub fn new(default_mode: RoundingMode) -> Self {
        Self { default_mode }
    }

    pub fn default_mode(&self) -> RoundingMode {
        self.default_mode
    }

    /// Apply `request` to `value`, returning the adjusted value and the
    /// precision it now carries.
    ///
    /// # Errors
    /// `Validation` if both digit counts are requested, `Range` if either is
    /// outside its domain. Nothing is rounded before validation passes.
    pub fn apply(
        &self,
        value: &DecimalValue,
        request: &PrecisionRequest,
    ) -> AmountResult<(DecimalValue, Precision)> {
        request.validate()?;
        let mode = request.rounding_mode.unwrap_or(self.default_mode);

        let adjusted = match (request.fraction_digits, request.significant_digits) {
            (Some(digits), _) if digits >= value.fractional_digits() => {
                value.pad_to_fraction_digits(digits)
            }
            (Some(digits), _) => {
                tracing::trace!(%value, digits, %mode, "downgrading fraction digits");
                round_to_fraction_digits(value, digits, mode)
            }
            (None, Some(digits)) if digits >= value.significant_digits() => {
                value.pad_to_significant_digits(digits)
            }
            (None, Some(digits)) => {
                tracing::trace!(%value, digits, %mode, "downgrading significant digits");
                round_to_significant_digits(value, digits, mode)
            }
            (None, None) => value.clone(),
        };

        let precision = Precision::of(&adjusted);
        Ok((adjusted, precision))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn dv(s: &str) -> DecimalValue {
        s.parse().unwrap()
    }

    fn apply(value: &str, request: PrecisionRequest) -> AmountResult<(String, Precision)> {
        PrecisionModel::default()
            .apply(&dv(value), &request)
            .map(|(v, p)| (v.to_string(), p))
    }

    #[test]
    fn test_derived_precision() {
        let (rendered, precision) = apply("123.456", PrecisionRequest::new()).unwrap();
        assert_eq!(rendered, "123.456");
        assert_eq!(
            precision,
            Precision {
                significant_digits: 6,
                fractional_digits: 3
            }
        );
    }

    #[test]
    fn test_fraction_upgrade_pads() {
        let request = PrecisionRequest::new()
            .with_fraction_digits(4)
            .with_rounding_mode(RoundingMode::Ceil);
        let (rendered, precision) = apply("123.456", request).unwrap();
        assert_eq!(rendered, "123.4560");
        assert_eq!(precision.significant_digits, 7);
        assert_eq!(precision.fractional_digits, 4);
    }

    #[test]
    fn test_significant_downgrade_rounds() {
        let (rendered, precision) =
            apply("123.456", PrecisionRequest::new().with_significant_digits(5)).unwrap();
        assert_eq!(rendered, "123.46");
        assert_eq!(precision.fractional_digits, 2);

        let request = PrecisionRequest::new()
            .with_significant_digits(5)
            .with_rounding_mode(RoundingMode::Trunc);
        let (rendered, _) = apply("123.456", request).unwrap();
        assert_eq!(rendered, "123.45");
    }

    #[test]
    fn test_fraction_downgrade_recomputes_significant_digits() {
        let (rendered, precision) =
            apply("0.0449", PrecisionRequest::new().with_fraction_digits(2)).unwrap();
        assert_eq!(rendered, "0.04");
        assert_eq!(precision.significant_digits, 1);
    }

    #[test]
    fn test_model_default_mode() {
        let model = PrecisionModel::new(RoundingMode::Floor);
        let (value, _) = model
            .apply(&dv("2.99"), &PrecisionRequest::new().with_fraction_digits(0))
            .unwrap();
        assert_eq!(value.to_string(), "2");
        assert_eq!(model.default_mode(), RoundingMode::Floor);
    }

    #[test]
    fn test_conflicting_request_rejected() {
        let request = PrecisionRequest::new()
            .with_fraction_digits(2)
            .with_significant_digits(3);
        assert!(matches!(
            apply("1.5", request),
            Err(AmountError::Validation(_))
        ));
    }

    #[test]
    fn test_out_of_range_requests() {
        assert!(matches!(
            apply("1.5", PrecisionRequest::new().with_significant_digits(0)),
            Err(AmountError::Range {
                field: "significantDigits",
                ..
            })
        ));
        assert!(matches!(
            apply("1.5", PrecisionRequest::new().with_fraction_digits(101)),
            Err(AmountError::Range {
                field: "fractionDigits",
                ..
            })
        ));
    }

    proptest! {
        #[test]
        fn prop_recorded_precision_matches_rendering(
            mantissa in any::<i64>(),
            scale in 0u8..10,
            fraction in prop::option::of(0u32..10),
            significant in 1u32..15,
        ) {
            let value: DecimalValue = format!("{mantissa}e-{scale}").parse().unwrap();
            let request = match fraction {
                Some(digits) => PrecisionRequest::new().with_fraction_digits(digits),
                None => PrecisionRequest::new().with_significant_digits(significant),
            };
            let (adjusted, precision) = PrecisionModel::default().apply(&value, &request).unwrap();

            prop_assert_eq!(precision, Precision::of(&adjusted));
            if let Some(digits) = fraction {
                prop_assert_eq!(precision.fractional_digits, digits);
            } else {
                prop_assert_eq!(precision.significant_digits, significant);
            }
        }
    }
}
