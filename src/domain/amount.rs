// ============================================================================
// Amount
// Immutable value carrying a decimal, an optional unit and its precision
// ============================================================================

use super::options::{AmountOptions, ConvertOptions, DisplayOptions, WithOptions};
use crate::engine::ConversionEngine;
use crate::interfaces::{LocaleRenderer, RenderRequest, RenderStyle};
use crate::numeric::{AmountError, AmountResult, DecimalValue, Precision, PrecisionModel};
use crate::units::UnitTag;
use std::fmt;
use std::str::FromStr;

/// A decimal value with an optional unit and explicit precision.
///
/// The recorded precision always matches the literal rendering of the value:
/// rendering it yields exactly `fractional_digits` fraction digits and
/// `significant_digits` significant digits. Amounts are never mutated;
/// `with` and `convert_to` return new values.
///
/// Equality is exact: numerically equal values, the same unit and the same
/// recorded precision.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Amount {
    value: DecimalValue,
    unit: Option<UnitTag>,
    precision: Precision,
}

impl Amount {
    /// Create an amount, applying any requested digit counts.
    ///
    /// # Errors
    /// - `Validation` if both digit counts are given or the unit is malformed
    /// - `Range` if a digit count is out of its domain
    pub fn new(value: DecimalValue, options: &AmountOptions) -> AmountResult<Self> {
        Self::with_precision_model(value, options, &PrecisionModel::default())
    }

    /// Like [`Amount::new`] with an explicit default rounding mode.
    pub fn with_precision_model(
        value: DecimalValue,
        options: &AmountOptions,
        model: &PrecisionModel,
    ) -> AmountResult<Self> {
        let request = options.precision_request();
        request.validate()?;
        let unit = options.unit_tag()?;

        let (value, precision) = model.apply(&value, &request)?;
        Ok(Self {
            value,
            unit,
            precision,
        })
    }

    /// Parse a decimal literal (`"123.456"`, `"-1.5e3"`) into an amount.
    pub fn parse(text: &str, options: &AmountOptions) -> AmountResult<Self> {
        Self::new(text.parse()?, options)
    }

    /// Build from a float via its shortest round-trip decimal form.
    pub fn from_f64(value: f64, options: &AmountOptions) -> AmountResult<Self> {
        Self::new(DecimalValue::from_f64(value)?, options)
    }

    /// Wrap an already rounded value; precision is read off the value.
    pub(crate) fn from_rounded(value: DecimalValue, unit: Option<UnitTag>) -> Self {
        let precision = Precision::of(&value);
        Self {
            value,
            unit,
            precision,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn value(&self) -> &DecimalValue {
        &self.value
    }

    pub fn unit(&self) -> Option<&UnitTag> {
        self.unit.as_ref()
    }

    /// The currency code, if the unit is a currency.
    pub fn currency(&self) -> Option<&str> {
        match &self.unit {
            Some(UnitTag::Currency(code)) => Some(code),
            _ => None,
        }
    }

    /// The measurement unit identifier, if the unit is one.
    pub fn measurement_unit(&self) -> Option<&str> {
        match &self.unit {
            Some(UnitTag::Measurement(id)) => Some(id),
            _ => None,
        }
    }

    pub fn precision(&self) -> Precision {
        self.precision
    }

    pub fn significant_digits(&self) -> u32 {
        self.precision.significant_digits
    }

    pub fn fractional_digits(&self) -> u32 {
        self.precision.fractional_digits
    }

    // ========================================================================
    // Derivation
    // ========================================================================

    /// Re-apply precision to the stored value; the unit is kept and nothing
    /// is converted.
    pub fn with(&self, options: &WithOptions) -> AmountResult<Self> {
        self.with_model(options, &PrecisionModel::default())
    }

    /// Like [`Amount::with`] with an explicit default rounding mode.
    pub fn with_model(&self, options: &WithOptions, model: &PrecisionModel) -> AmountResult<Self> {
        let (value, precision) = model.apply(&self.value, options)?;
        Ok(Self {
            value,
            unit: self.unit.clone(),
            precision,
        })
    }

    /// Convert into another unit using `engine`'s graph and preferences.
    ///
    /// The source precision is not carried over: the converted value is
    /// rounded once with the digit options in `options`.
    pub fn convert_to(
        &self,
        engine: &ConversionEngine,
        options: &ConvertOptions,
    ) -> AmountResult<Self> {
        engine.convert(self, options)
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    /// `"<digits>[<unit>]"` under the given display policy.
    pub fn to_string_with(&self, options: DisplayOptions) -> String {
        match options.display_unit.select(self.unit.as_ref()) {
            Some(unit) => format!("{}[{unit}]", self.value),
            None => self.value.to_string(),
        }
    }

    /// Locale text produced by `renderer`.
    ///
    /// # Errors
    /// `UnsupportedFormat` when the renderer cannot handle the locale/unit
    /// pairing.
    pub fn to_locale_string(
        &self,
        renderer: &dyn LocaleRenderer,
        locale: &str,
        options: DisplayOptions,
    ) -> AmountResult<String> {
        let style = RenderStyle::for_unit(options.display_unit.select(self.unit.as_ref()));
        renderer.render(&RenderRequest {
            locale,
            value: &self.value,
            style: &style,
        })
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.unit {
            Some(unit) => write!(f, "{}[{unit}]", self.value),
            None => write!(f, "{}", self.value),
        }
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    /// Parse the textual form `"<digits>"` or `"<digits>[<unit>]"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (digits, unit) = match trimmed.strip_suffix(']') {
            Some(rest) => {
                let (digits, unit) = rest.split_once('[').ok_or_else(|| {
                    AmountError::validation(format!("unbalanced unit brackets in {s:?}"))
                })?;
                (digits, Some(unit))
            }
            None => (trimmed, None),
        };

        let options = AmountOptions {
            unit: unit.map(str::to_string),
            ..AmountOptions::default()
        };
        Amount::parse(digits, &options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::options::DisplayUnit;
    use crate::interfaces::PlainRenderer;
    use crate::numeric::{PrecisionRequest, RoundingMode};

    fn amount(text: &str) -> Amount {
        text.parse().unwrap()
    }

    #[test]
    fn test_construction_derives_precision() {
        let a = amount("123.456");
        assert_eq!(a.significant_digits(), 6);
        assert_eq!(a.fractional_digits(), 3);
        assert_eq!(a.unit(), None);

        let b = amount("0.050");
        assert_eq!(b.significant_digits(), 2);
        assert_eq!(b.fractional_digits(), 3);
        assert_eq!(b.to_string(), "0.050");
    }

    #[test]
    fn test_construction_applies_requested_digits() {
        let options = AmountOptions::new()
            .with_unit("USD")
            .with_fraction_digits(2);
        let a = Amount::parse("19.999", &options).unwrap();
        assert_eq!(a.to_string(), "20.00[USD]");
        assert_eq!(a.significant_digits(), 4);
        assert_eq!(a.currency(), Some("USD"));
        assert_eq!(a.measurement_unit(), None);

        let floor = AmountOptions::new()
            .with_significant_digits(2)
            .with_rounding_mode(RoundingMode::Floor);
        assert_eq!(Amount::parse("-1.21", &floor).unwrap().to_string(), "-1.3");
    }

    #[test]
    fn test_with_upgrade_pads() {
        let a = amount("123.456")
            .with(&PrecisionRequest::new().with_fraction_digits(4))
            .unwrap();
        assert_eq!(a.to_string(), "123.4560");
        assert_eq!(a.fractional_digits(), 4);
        assert_eq!(a.significant_digits(), 7);
    }

    #[test]
    fn test_with_downgrade_rounds() {
        let base = amount("123.456");
        let rounded = base
            .with(&PrecisionRequest::new().with_significant_digits(5))
            .unwrap();
        assert_eq!(rounded.to_string(), "123.46");
        assert_eq!(rounded.fractional_digits(), 2);

        let truncated = base
            .with(
                &PrecisionRequest::new()
                    .with_significant_digits(5)
                    .with_rounding_mode(RoundingMode::Trunc),
            )
            .unwrap();
        assert_eq!(truncated.to_string(), "123.45");

        // The original is untouched
        assert_eq!(base.to_string(), "123.456");
    }

    #[test]
    fn test_with_keeps_unit() {
        let a = amount("1.75[foot]")
            .with(&PrecisionRequest::new().with_fraction_digits(1))
            .unwrap();
        assert_eq!(a.to_string(), "1.8[foot]");
        assert_eq!(a.measurement_unit(), Some("foot"));
    }

    #[test]
    fn test_invalid_options_rejected() {
        let both = AmountOptions::new()
            .with_fraction_digits(1)
            .with_significant_digits(2);
        assert!(matches!(
            Amount::parse("1.5", &both),
            Err(AmountError::Validation(_))
        ));
        assert!(matches!(
            Amount::parse("1.5", &AmountOptions::new().with_significant_digits(0)),
            Err(AmountError::Range { .. })
        ));
        assert!(matches!(
            Amount::parse("1.5", &AmountOptions::new().with_fraction_digits(101)),
            Err(AmountError::Range { .. })
        ));
        assert!(matches!(
            Amount::parse("1.5", &AmountOptions::new().with_unit("Foot")),
            Err(AmountError::Validation(_))
        ));
        assert!(matches!(
            Amount::parse("one", &AmountOptions::new()),
            Err(AmountError::Validation(_))
        ));
        assert!(Amount::from_f64(f64::NAN, &AmountOptions::new()).is_err());
    }

    #[test]
    fn test_display_unit_policy() {
        let plain = amount("42");
        let feet = amount("42[foot]");

        assert_eq!(plain.to_string_with(DisplayOptions::default()), "42");
        assert_eq!(feet.to_string_with(DisplayOptions::default()), "42[foot]");
        assert_eq!(
            plain.to_string_with(DisplayOptions::new(DisplayUnit::Always)),
            "42[1]"
        );
        assert_eq!(
            feet.to_string_with(DisplayOptions::new(DisplayUnit::Never)),
            "42"
        );
    }

    #[test]
    fn test_locale_string_delegates_to_renderer() {
        let price = amount("9.90[EUR]");
        assert_eq!(
            price
                .to_locale_string(&PlainRenderer, "de-DE", DisplayOptions::default())
                .unwrap(),
            "9.90 EUR"
        );
        assert_eq!(
            price
                .to_locale_string(&PlainRenderer, "de-DE", DisplayOptions::new(DisplayUnit::Never))
                .unwrap(),
            "9.90"
        );
        assert!(matches!(
            price.to_locale_string(&PlainRenderer, "", DisplayOptions::default()),
            Err(AmountError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_textual_form_round_trips() {
        for text in ["123.456", "-0.50[kilogram]", "1000[USD]", "0.000[celsius]"] {
            let parsed = amount(text);
            assert_eq!(parsed.to_string(), text);
            assert_eq!(amount(&parsed.to_string()), parsed);
        }
        assert!("12[foot".parse::<Amount>().is_err());
        assert!("12foot]".parse::<Amount>().is_err());
    }

    #[test]
    fn test_equality_is_exact() {
        assert_eq!(amount("1.50"), amount("1.50"));
        assert_ne!(amount("1.5"), amount("1.50"));
        assert_ne!(amount("1.5[foot]"), amount("1.5[inch]"));
        assert_ne!(amount("1.5[foot]"), amount("1.5"));
    }

    #[test]
    fn test_exponent_input() {
        let a = amount("1.5e3");
        assert_eq!(a.to_string(), "1500");
        assert_eq!(a.significant_digits(), 2);
        assert_eq!(a.fractional_digits(), 0);
    }
}
