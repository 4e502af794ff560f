// ============================================================================
// Amount Options
// Construction, conversion, derivation and display option records
// ============================================================================

use crate::numeric::{AmountError, AmountResult, PrecisionRequest, RoundingMode};
use crate::units::UnitTag;
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Unit rendered by `DisplayUnit::Always` when an amount has none.
pub const SENTINEL_UNIT: &str = "1";

// ============================================================================
// Construction
// ============================================================================

/// Options for `Amount::new`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase", default)
)]
pub struct AmountOptions {
    /// Raw unit text; three uppercase letters is read as a currency code
    pub unit: Option<String>,
    pub fraction_digits: Option<u32>,
    pub significant_digits: Option<u32>,
    pub rounding_mode: Option<RoundingMode>,
}

impl AmountOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: Attach a unit or currency
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Builder method: Request fraction digits
    pub fn with_fraction_digits(mut self, digits: u32) -> Self {
        self.fraction_digits = Some(digits);
        self
    }

    /// Builder method: Request significant digits
    pub fn with_significant_digits(mut self, digits: u32) -> Self {
        self.significant_digits = Some(digits);
        self
    }

    /// Builder method: Set the downgrade rounding mode
    pub fn with_rounding_mode(mut self, mode: RoundingMode) -> Self {
        self.rounding_mode = Some(mode);
        self
    }

    /// Classify the raw unit, if any.
    pub fn unit_tag(&self) -> AmountResult<Option<UnitTag>> {
        self.unit.as_deref().map(UnitTag::parse).transpose()
    }

    pub fn precision_request(&self) -> PrecisionRequest {
        PrecisionRequest {
            fraction_digits: self.fraction_digits,
            significant_digits: self.significant_digits,
            rounding_mode: self.rounding_mode,
        }
    }
}

/// Options for `Amount::with`: the digit fields of [`AmountOptions`], no unit.
pub type WithOptions = PrecisionRequest;

// ============================================================================
// Conversion
// ============================================================================

/// Policy choosing between fraction and significant digit bounds when both
/// are supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase")
)]
pub enum RoundingPriority {
    /// Fraction bounds, unless they would leave no significant digit
    #[default]
    Auto,
    /// Whichever bound set keeps more digits
    MorePrecision,
    /// Whichever bound set keeps fewer digits
    LessPrecision,
}

impl RoundingPriority {
    pub const fn as_str(self) -> &'static str {
        match self {
            RoundingPriority::Auto => "auto",
            RoundingPriority::MorePrecision => "morePrecision",
            RoundingPriority::LessPrecision => "lessPrecision",
        }
    }
}

impl fmt::Display for RoundingPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoundingPriority {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(RoundingPriority::Auto),
            "morePrecision" => Ok(RoundingPriority::MorePrecision),
            "lessPrecision" => Ok(RoundingPriority::LessPrecision),
            other => Err(AmountError::validation(format!(
                "unknown rounding priority {other:?}"
            ))),
        }
    }
}

/// Options for `Amount::convert_to`.
///
/// The target is either an explicit unit or a locale/usage pair, never both.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase", default)
)]
pub struct ConvertOptions {
    pub unit: Option<String>,
    pub locale: Option<String>,
    pub usage: Option<String>,
    pub minimum_fraction_digits: Option<u32>,
    pub maximum_fraction_digits: Option<u32>,
    pub minimum_significant_digits: Option<u32>,
    pub maximum_significant_digits: Option<u32>,
    pub rounding_mode: Option<RoundingMode>,
    pub rounding_priority: RoundingPriority,
}

impl ConvertOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert into an explicit unit.
    pub fn to_unit(unit: impl Into<String>) -> Self {
        Self::new().with_unit(unit)
    }

    /// Convert into the unit preferred by `locale`.
    pub fn for_locale(locale: impl Into<String>) -> Self {
        Self::new().with_locale(locale)
    }

    /// Convert into the unit preferred for `usage` in the default locale.
    pub fn for_usage(usage: impl Into<String>) -> Self {
        Self::new().with_usage(usage)
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    pub fn with_usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = Some(usage.into());
        self
    }

    /// Builder method: Set both fraction digit bounds
    pub fn with_fraction_digits(mut self, min: u32, max: u32) -> Self {
        self.minimum_fraction_digits = Some(min);
        self.maximum_fraction_digits = Some(max);
        self
    }

    pub fn with_minimum_fraction_digits(mut self, digits: u32) -> Self {
        self.minimum_fraction_digits = Some(digits);
        self
    }

    pub fn with_maximum_fraction_digits(mut self, digits: u32) -> Self {
        self.maximum_fraction_digits = Some(digits);
        self
    }

    /// Builder method: Set both significant digit bounds
    pub fn with_significant_digits(mut self, min: u32, max: u32) -> Self {
        self.minimum_significant_digits = Some(min);
        self.maximum_significant_digits = Some(max);
        self
    }

    pub fn with_minimum_significant_digits(mut self, digits: u32) -> Self {
        self.minimum_significant_digits = Some(digits);
        self
    }

    pub fn with_maximum_significant_digits(mut self, digits: u32) -> Self {
        self.maximum_significant_digits = Some(digits);
        self
    }

    pub fn with_rounding_mode(mut self, mode: RoundingMode) -> Self {
        self.rounding_mode = Some(mode);
        self
    }

    pub fn with_rounding_priority(mut self, priority: RoundingPriority) -> Self {
        self.rounding_priority = priority;
        self
    }

    /// Check the option combination rules before any resolution happens.
    pub fn validate(&self) -> AmountResult<()> {
        let by_preference = self.locale.is_some() || self.usage.is_some();
        match (&self.unit, by_preference) {
            (None, false) => Err(AmountError::validation(
                "one of unit, locale or usage is required",
            )),
            (Some(_), true) => Err(AmountError::validation(
                "unit cannot be combined with locale or usage",
            )),
            (Some(unit), false) if unit.is_empty() => {
                Err(AmountError::validation("unit cannot be empty"))
            }
            _ => Ok(()),
        }
    }
}

// ============================================================================
// Display
// ============================================================================

/// When to show the unit in textual output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase")
)]
pub enum DisplayUnit {
    /// Show the unit iff the amount has one
    #[default]
    Auto,
    Never,
    /// Show the unit, or [`SENTINEL_UNIT`] when there is none
    Always,
}

impl DisplayUnit {
    /// Unit text to show for an amount carrying `unit`.
    pub fn select(self, unit: Option<&UnitTag>) -> Option<&str> {
        match (self, unit) {
            (DisplayUnit::Never, _) => None,
            (_, Some(tag)) => Some(tag.as_str()),
            (DisplayUnit::Auto, None) => None,
            (DisplayUnit::Always, None) => Some(SENTINEL_UNIT),
        }
    }
}

impl FromStr for DisplayUnit {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(DisplayUnit::Auto),
            "never" => Ok(DisplayUnit::Never),
            "always" => Ok(DisplayUnit::Always),
            other => Err(AmountError::validation(format!(
                "unknown displayUnit {other:?}"
            ))),
        }
    }
}

/// Options for `to_string_with` and `to_locale_string`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase", default)
)]
pub struct DisplayOptions {
    pub display_unit: DisplayUnit,
}

impl DisplayOptions {
    pub fn new(display_unit: DisplayUnit) -> Self {
        Self { display_unit }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_options_validation() {
        assert!(ConvertOptions::to_unit("inch").validate().is_ok());
        assert!(ConvertOptions::for_locale("fr").validate().is_ok());
        assert!(ConvertOptions::for_usage("person-height").validate().is_ok());

        assert!(matches!(
            ConvertOptions::new().validate(),
            Err(AmountError::Validation(_))
        ));
        assert!(matches!(
            ConvertOptions::to_unit("inch").with_locale("fr").validate(),
            Err(AmountError::Validation(_))
        ));
        assert!(matches!(
            ConvertOptions::to_unit("inch").with_usage("road").validate(),
            Err(AmountError::Validation(_))
        ));
        assert!(ConvertOptions::to_unit("").validate().is_err());
    }

    #[test]
    fn test_display_unit_selection() {
        let foot = UnitTag::parse("foot").unwrap();
        assert_eq!(DisplayUnit::Auto.select(Some(&foot)), Some("foot"));
        assert_eq!(DisplayUnit::Auto.select(None), None);
        assert_eq!(DisplayUnit::Never.select(Some(&foot)), None);
        assert_eq!(DisplayUnit::Always.select(Some(&foot)), Some("foot"));
        assert_eq!(DisplayUnit::Always.select(None), Some(SENTINEL_UNIT));
    }

    #[test]
    fn test_amount_options() {
        let options = AmountOptions::new()
            .with_unit("USD")
            .with_fraction_digits(2)
            .with_rounding_mode(RoundingMode::Floor);
        assert_eq!(
            options.unit_tag().unwrap(),
            Some(UnitTag::Currency("USD".to_string()))
        );
        let request = options.precision_request();
        assert_eq!(request.fraction_digits, Some(2));
        assert_eq!(request.rounding_mode, Some(RoundingMode::Floor));

        assert!(AmountOptions::new().with_unit("Foot").unit_tag().is_err());
        assert_eq!(AmountOptions::new().unit_tag().unwrap(), None);
    }

    #[test]
    fn test_option_names() {
        assert_eq!(
            "morePrecision".parse::<RoundingPriority>().unwrap(),
            RoundingPriority::MorePrecision
        );
        assert_eq!(RoundingPriority::LessPrecision.to_string(), "lessPrecision");
        assert!("most".parse::<RoundingPriority>().is_err());
        assert_eq!("never".parse::<DisplayUnit>().unwrap(), DisplayUnit::Never);
        assert!("sometimes".parse::<DisplayUnit>().is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_convert_options_from_json() {
        let options: ConvertOptions = serde_json::from_str(
            r#"{"locale": "en-US", "usage": "person-height",
                "maximumFractionDigits": 1, "roundingMode": "halfExpand",
                "roundingPriority": "lessPrecision"}"#,
        )
        .unwrap();
        assert_eq!(options.locale.as_deref(), Some("en-US"));
        assert_eq!(options.maximum_fraction_digits, Some(1));
        assert_eq!(options.rounding_mode, Some(RoundingMode::HalfExpand));
        assert_eq!(options.rounding_priority, RoundingPriority::LessPrecision);
        assert!(options.validate().is_ok());
    }
}
