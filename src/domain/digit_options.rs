// ============================================================================
// Digit Options
// Resolve fraction/significant bounds and rounding priority into one target
// ============================================================================

use super::config::EngineConfig;
use super::options::{ConvertOptions, RoundingPriority};
use crate::numeric::{
    round_to_fraction_digits, round_to_significant_digits, AmountError, AmountResult,
    DecimalValue, RoundingMode, MAX_FRACTION_DIGITS, MAX_SIGNIFICANT_DIGITS,
};

/// Digit fields as supplied by the caller, before defaults are merged in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DigitOptionsInput {
    pub minimum_fraction_digits: Option<u32>,
    pub maximum_fraction_digits: Option<u32>,
    pub minimum_significant_digits: Option<u32>,
    pub maximum_significant_digits: Option<u32>,
    pub rounding_mode: Option<RoundingMode>,
    pub rounding_priority: RoundingPriority,
}

impl From<&ConvertOptions> for DigitOptionsInput {
    fn from(options: &ConvertOptions) -> Self {
        Self {
            minimum_fraction_digits: options.minimum_fraction_digits,
            maximum_fraction_digits: options.maximum_fraction_digits,
            minimum_significant_digits: options.minimum_significant_digits,
            maximum_significant_digits: options.maximum_significant_digits,
            rounding_mode: options.rounding_mode,
            rounding_priority: options.rounding_priority,
        }
    }
}

/// The bound set a value is finally rounded against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundingTarget {
    FractionDigits { min: u32, max: u32 },
    SignificantDigits { min: u32, max: u32 },
}

/// Resolved digit options; consumed once per conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DigitOptions {
    pub rounding_mode: RoundingMode,
    pub min_fraction_digits: u32,
    pub max_fraction_digits: u32,
    pub min_significant_digits: u32,
    pub max_significant_digits: u32,
    pub rounding_priority: RoundingPriority,
    uses_fraction: bool,
    uses_significant: bool,
}

impl DigitOptions {
    /// Merge `input` with the defaults in `config`.
    ///
    /// A lone minimum or maximum is completed from the defaults the way
    /// `Intl.NumberFormat` does it. With no digit fields at all the result
    /// is fraction-based with the configured default bounds.
    ///
    /// # Errors
    /// `Range` if a field is outside its domain or a minimum exceeds its
    /// maximum.
    pub fn resolve(input: &DigitOptionsInput, config: &EngineConfig) -> AmountResult<Self> {
        let check_fraction = |field, digits: Option<u32>| {
            digits
                .map(|d| AmountError::check_range(field, d, 0, MAX_FRACTION_DIGITS))
                .transpose()
        };
        let check_significant = |field, digits: Option<u32>| {
            digits
                .map(|d| AmountError::check_range(field, d, 1, MAX_SIGNIFICANT_DIGITS))
                .transpose()
        };

        let min_fd = check_fraction("minimumFractionDigits", input.minimum_fraction_digits)?;
        let max_fd = check_fraction("maximumFractionDigits", input.maximum_fraction_digits)?;
        let min_sd = check_significant("minimumSignificantDigits", input.minimum_significant_digits)?;
        let max_sd = check_significant("maximumSignificantDigits", input.maximum_significant_digits)?;

        let uses_significant = min_sd.is_some() || max_sd.is_some();
        let uses_fraction = min_fd.is_some() || max_fd.is_some() || !uses_significant;

        let min_significant_digits = min_sd.unwrap_or(1);
        let max_significant_digits = max_sd.unwrap_or(MAX_SIGNIFICANT_DIGITS);
        ordered(
            "minimumSignificantDigits",
            min_significant_digits,
            max_significant_digits,
        )?;

        let (min_fraction_digits, max_fraction_digits) = match (min_fd, max_fd) {
            (Some(min), Some(max)) => (min, max),
            (Some(min), None) => (min, config.default_max_fraction_digits.max(min)),
            (None, Some(max)) => (config.default_min_fraction_digits.min(max), max),
            (None, None) => (
                config.default_min_fraction_digits,
                config.default_max_fraction_digits,
            ),
        };
        ordered("minimumFractionDigits", min_fraction_digits, max_fraction_digits)?;

        Ok(Self {
            rounding_mode: input.rounding_mode.unwrap_or(config.default_rounding_mode),
            min_fraction_digits,
            max_fraction_digits,
            min_significant_digits,
            max_significant_digits,
            rounding_priority: input.rounding_priority,
            uses_fraction,
            uses_significant,
        })
    }

    /// Pick the bound set for `value`.
    pub fn target_for(&self, value: &DecimalValue) -> RoundingTarget {
        let fraction = RoundingTarget::FractionDigits {
            min: self.min_fraction_digits,
            max: self.max_fraction_digits,
        };
        let significant = RoundingTarget::SignificantDigits {
            min: self.min_significant_digits,
            max: self.max_significant_digits,
        };

        match (self.uses_fraction, self.uses_significant) {
            (_, false) => fraction,
            (false, true) => significant,
            (true, true) => {
                // Position of the last kept digit under each bound set
                let significant_magnitude =
                    value.magnitude() - self.max_significant_digits as i32 + 1;
                let fraction_magnitude = -(self.max_fraction_digits as i32);

                let use_significant = match self.rounding_priority {
                    RoundingPriority::Auto => {
                        !value.is_zero()
                            && round_to_fraction_digits(
                                value,
                                self.max_fraction_digits,
                                self.rounding_mode,
                            )
                            .is_zero()
                    }
                    RoundingPriority::MorePrecision => significant_magnitude <= fraction_magnitude,
                    RoundingPriority::LessPrecision => significant_magnitude >= fraction_magnitude,
                };
                if use_significant {
                    significant
                } else {
                    fraction
                }
            }
        }
    }

    /// Round `value` to its target's maximum, then drop trailing zeros down
    /// to the minimum (or pad up to it).
    pub fn apply(&self, value: &DecimalValue) -> DecimalValue {
        match self.target_for(value) {
            RoundingTarget::FractionDigits { min, max } => {
                round_to_fraction_digits(value, max, self.rounding_mode).trim_fraction_zeros(min)
            }
            RoundingTarget::SignificantDigits { min, max } => {
                round_to_significant_digits(value, max, self.rounding_mode)
                    .trim_significant_zeros(min)
            }
        }
    }
}

fn ordered(field: &'static str, min: u32, max: u32) -> AmountResult<()> {
    AmountError::check_range(field, min, 0, max).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(input: DigitOptionsInput) -> AmountResult<DigitOptions> {
        DigitOptions::resolve(&input, &EngineConfig::default())
    }

    fn apply(input: DigitOptionsInput, value: &str) -> String {
        resolve(input)
            .unwrap()
            .apply(&value.parse().unwrap())
            .to_string()
    }

    fn fraction(min: Option<u32>, max: Option<u32>) -> DigitOptionsInput {
        DigitOptionsInput {
            minimum_fraction_digits: min,
            maximum_fraction_digits: max,
            ..Default::default()
        }
    }

    fn both(max_fd: u32, max_sd: u32, priority: RoundingPriority) -> DigitOptionsInput {
        DigitOptionsInput {
            maximum_fraction_digits: Some(max_fd),
            maximum_significant_digits: Some(max_sd),
            rounding_priority: priority,
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults_are_fraction_based() {
        let options = resolve(DigitOptionsInput::default()).unwrap();
        assert_eq!(options.min_fraction_digits, 0);
        assert_eq!(options.max_fraction_digits, 3);
        assert_eq!(options.rounding_mode, RoundingMode::HalfEven);
        assert!(matches!(
            options.target_for(&DecimalValue::from(5_i64)),
            RoundingTarget::FractionDigits { min: 0, max: 3 }
        ));

        assert_eq!(apply(DigitOptionsInput::default(), "21.000000000000004"), "21");
        assert_eq!(apply(DigitOptionsInput::default(), "0.3333333333333333"), "0.333");
        assert_eq!(apply(DigitOptionsInput::default(), "2.5"), "2.5");
    }

    #[test]
    fn test_lone_bounds_completed() {
        let options = resolve(fraction(Some(5), None)).unwrap();
        assert_eq!((options.min_fraction_digits, options.max_fraction_digits), (5, 5));
        assert_eq!(apply(fraction(Some(5), None), "1.5"), "1.50000");

        let options = resolve(fraction(None, Some(1))).unwrap();
        assert_eq!((options.min_fraction_digits, options.max_fraction_digits), (0, 1));
        assert_eq!(apply(fraction(Some(2), Some(3)), "2"), "2.00");
    }

    #[test]
    fn test_significant_only() {
        let input = DigitOptionsInput {
            maximum_significant_digits: Some(2),
            ..Default::default()
        };
        assert_eq!(apply(input, "12345"), "12000");
        assert_eq!(apply(input, "0.0004567"), "0.00046");
        assert_eq!(apply(input, "0.5"), "0.5");
    }

    #[test]
    fn test_auto_priority() {
        // Fraction bounds win while they leave a significant digit
        assert_eq!(apply(both(1, 2, RoundingPriority::Auto), "123.456"), "123.5");
        // ...and yield to significant bounds when they would round to zero
        assert_eq!(apply(both(3, 2, RoundingPriority::Auto), "0.0001234"), "0.00012");
        assert_eq!(apply(both(3, 2, RoundingPriority::Auto), "0"), "0");
    }

    #[test]
    fn test_more_and_less_precision() {
        assert_eq!(
            apply(both(1, 5, RoundingPriority::MorePrecision), "123.456"),
            "123.46"
        );
        assert_eq!(
            apply(both(1, 5, RoundingPriority::LessPrecision), "123.456"),
            "123.5"
        );
        assert_eq!(
            apply(both(3, 2, RoundingPriority::MorePrecision), "0.0001234"),
            "0.00012"
        );
        assert_eq!(
            apply(both(3, 2, RoundingPriority::LessPrecision), "0.0001234"),
            "0"
        );
    }

    #[test]
    fn test_rounding_mode_applies() {
        let input = DigitOptionsInput {
            maximum_fraction_digits: Some(0),
            rounding_mode: Some(RoundingMode::Ceil),
            ..Default::default()
        };
        assert_eq!(apply(input, "1.01"), "2");
        assert_eq!(apply(input, "-1.99"), "-1");
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert!(matches!(
            resolve(fraction(None, Some(101))),
            Err(AmountError::Range {
                field: "maximumFractionDigits",
                ..
            })
        ));
        assert!(matches!(
            resolve(DigitOptionsInput {
                minimum_significant_digits: Some(0),
                ..Default::default()
            }),
            Err(AmountError::Range { .. })
        ));
        assert!(matches!(
            resolve(fraction(Some(4), Some(2))),
            Err(AmountError::Range {
                field: "minimumFractionDigits",
                value: 4,
                ..
            })
        ));
        assert!(resolve(DigitOptionsInput {
            minimum_significant_digits: Some(5),
            maximum_significant_digits: Some(3),
            ..Default::default()
        })
        .is_err());
    }

    #[test]
    fn test_from_convert_options() {
        let options = ConvertOptions::to_unit("inch")
            .with_fraction_digits(1, 2)
            .with_rounding_priority(RoundingPriority::MorePrecision);
        let input = DigitOptionsInput::from(&options);
        assert_eq!(input.minimum_fraction_digits, Some(1));
        assert_eq!(input.maximum_fraction_digits, Some(2));
        assert_eq!(input.rounding_priority, RoundingPriority::MorePrecision);
    }
}
