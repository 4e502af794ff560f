// ============================================================================
// Conversion Engine
// Unit conversion and rendering over injected read-only unit data
// ============================================================================

use crate::domain::{
    Amount, AmountOptions, ConvertOptions, DigitOptions, DigitOptionsInput, DisplayOptions,
    EngineConfig, WithOptions,
};
use crate::interfaces::LocaleRenderer;
use crate::numeric::{AmountError, AmountResult, DecimalValue, PrecisionModel};
use crate::units::{ConversionGraph, UnitPreferenceResolver, UnitPreferenceTable, UnitTag};
use std::fmt;
use std::sync::Arc;

/// Converts and renders amounts.
///
/// The graph and preference table are built once and shared read-only, so
/// an engine (or a clone of it) can serve any number of threads without
/// locking.
#[derive(Clone)]
pub struct ConversionEngine {
    /// Unit → base affine edges
    graph: Arc<ConversionGraph>,

    /// Locale/usage → candidate units
    preferences: Arc<UnitPreferenceTable>,

    /// External numeral/unit formatter
    renderer: Arc<dyn LocaleRenderer>,

    config: EngineConfig,

    precision_model: PrecisionModel,
}

impl ConversionEngine {
    /// Create an engine after checking `config` and that every preferred
    /// unit exists in `graph`.
    pub fn new(
        graph: Arc<ConversionGraph>,
        preferences: Arc<UnitPreferenceTable>,
        renderer: Arc<dyn LocaleRenderer>,
        config: EngineConfig,
    ) -> AmountResult<Self> {
        config.validate()?;
        preferences.validate_against(&graph)?;

        tracing::debug!(
            units = graph.len(),
            preferences = preferences.len(),
            renderer = renderer.name(),
            locale = %config.default_locale,
            "conversion engine ready"
        );

        Ok(Self {
            graph,
            preferences,
            renderer,
            precision_model: PrecisionModel::new(config.default_rounding_mode),
            config,
        })
    }

    pub fn graph(&self) -> &ConversionGraph {
        &self.graph
    }

    pub fn preferences(&self) -> &UnitPreferenceTable {
        &self.preferences
    }

    pub fn renderer(&self) -> &dyn LocaleRenderer {
        self.renderer.as_ref()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Preference resolver bound to this engine's data and default locale.
    pub fn resolver(&self) -> UnitPreferenceResolver<'_> {
        UnitPreferenceResolver::new(&self.preferences, &self.graph, &self.config.default_locale)
    }

    // ========================================================================
    // Amount Operations
    // ========================================================================

    /// Create an amount using the configured default rounding mode.
    pub fn amount(&self, value: DecimalValue, options: &AmountOptions) -> AmountResult<Amount> {
        Amount::with_precision_model(value, options, &self.precision_model)
    }

    /// Re-apply precision using the configured default rounding mode.
    pub fn derive(&self, amount: &Amount, options: &WithOptions) -> AmountResult<Amount> {
        amount.with_model(options, &self.precision_model)
    }

    /// Convert `amount` per `options`.
    ///
    /// Steps: option rules, digit options, target unit (explicit or by
    /// preference), affine transform in `f64`, one rounding step.
    ///
    /// # Errors
    /// - `Validation` for bad option combinations (checked first)
    /// - `Range` for out-of-domain digit bounds
    /// - `UnsupportedConversion` for unit-less or currency amounts, unknown
    ///   units and cross-category requests
    pub fn convert(&self, amount: &Amount, options: &ConvertOptions) -> AmountResult<Amount> {
        options.validate()?;
        let digits = DigitOptions::resolve(&DigitOptionsInput::from(options), &self.config)?;

        let source = match amount.unit() {
            Some(UnitTag::Measurement(id)) => id.as_str(),
            Some(UnitTag::Currency(code)) => {
                return Err(AmountError::unsupported_conversion(format!(
                    "currency {code} cannot be converted"
                )))
            }
            None => {
                return Err(AmountError::unsupported_conversion(
                    "amount has no unit to convert from",
                ))
            }
        };
        let quantity_type = self.graph.quantity_type_of(source).ok_or_else(|| {
            AmountError::unsupported_conversion(format!("no conversion data for unit {source}"))
        })?;

        let input = amount.value().to_f64();
        let target = match &options.unit {
            Some(unit) => UnitTag::parse(unit)?,
            None => self.resolver().resolve_for_value(
                quantity_type.as_str(),
                options.locale.as_deref(),
                Some(options.usage.as_deref().unwrap_or(&self.config.default_usage)),
                input,
                source,
            )?,
        };

        let transform = self.graph.resolve_transform(source, target.as_str())?;
        let converted = transform.apply(input);
        if !converted.is_finite() {
            return Err(AmountError::unsupported_conversion(format!(
                "{} {source} does not fit in {target}",
                amount.value()
            )));
        }

        let rounded = digits.apply(&DecimalValue::from_f64(converted)?);
        tracing::debug!(
            from = %amount,
            to = %target,
            raw = converted,
            result = %rounded,
            "converted amount"
        );
        Ok(Amount::from_rounded(rounded, Some(target)))
    }

    /// Locale text for `amount` via the injected renderer.
    pub fn render(
        &self,
        amount: &Amount,
        locale: Option<&str>,
        options: DisplayOptions,
    ) -> AmountResult<String> {
        let locale = locale.unwrap_or(&self.config.default_locale);
        amount.to_locale_string(self.renderer.as_ref(), locale, options)
    }
}

impl fmt::Debug for ConversionEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionEngine")
            .field("units", &self.graph.len())
            .field("preferences", &self.preferences.len())
            .field("renderer", &self.renderer.name())
            .field("config", &self.config)
            .finish()
    }
}
