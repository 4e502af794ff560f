// ============================================================================
// Engine Factory
// Creates conversion engines from configuration and unit data
// ============================================================================

use crate::domain::EngineConfig;
use crate::engine::ConversionEngine;
use crate::interfaces::{LocaleRenderer, LoggingRenderer, PlainRenderer};
use crate::numeric::{AmountError, AmountResult, RoundingMode};
use crate::units::{ConversionGraph, UnitDataset, UnitPreferenceTable};
use std::sync::Arc;

// ============================================================================
// Factory Functions
// ============================================================================

/// Creates a conversion engine from configuration and a pre-loaded dataset
///
/// # Arguments
/// * `config` - Engine defaults
/// * `dataset` - Unit conversion and preference records
/// * `renderer` - Locale renderer used by `render`
///
/// # Example
/// ```
/// use amount_engine::prelude::*;
/// use amount_engine::engine::factory::create_from_config;
/// use std::sync::Arc;
///
/// let engine = create_from_config(
///     EngineConfig::default(),
///     &UnitDataset::cldr_core(),
///     Arc::new(PlainRenderer),
/// )
/// .unwrap();
/// assert!(engine.graph().contains("foot"));
/// ```
pub fn create_from_config(
    config: EngineConfig,
    dataset: &UnitDataset,
    renderer: Arc<dyn LocaleRenderer>,
) -> AmountResult<ConversionEngine> {
    // Validate configuration first
    config.validate()?;

    let graph = dataset.build_graph()?;
    let preferences = dataset.build_preferences()?;

    ConversionEngine::new(Arc::new(graph), Arc::new(preferences), renderer, config)
}

// ============================================================================
// Builder Pattern for Advanced Configuration
// ============================================================================

/// Builder for creating conversion engines with fluent API
///
/// # Example
/// ```
/// use amount_engine::prelude::*;
/// use amount_engine::engine::factory::ConversionEngineBuilder;
///
/// let engine = ConversionEngineBuilder::cldr_core()
///     .default_locale("en-GB")
///     .default_rounding_mode(RoundingMode::HalfExpand)
///     .build()
///     .unwrap();
///
/// let height: Amount = "180[centimeter]".parse().unwrap();
/// let converted = height
///     .convert_to(&engine, &ConvertOptions::for_usage("person-height"))
///     .unwrap();
/// assert_eq!(converted.to_string(), "180[centimeter]");
/// ```
#[derive(Default)]
pub struct ConversionEngineBuilder {
    graph: Option<Arc<ConversionGraph>>,
    preferences: Option<Arc<UnitPreferenceTable>>,
    renderer: Option<Arc<dyn LocaleRenderer>>,
    config: EngineConfig,
    log_rendering: bool,
}

impl ConversionEngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Unit Data
    // ========================================================================

    /// Use a prebuilt conversion graph
    pub fn with_graph(mut self, graph: impl Into<Arc<ConversionGraph>>) -> Self {
        self.graph = Some(graph.into());
        self
    }

    /// Use a prebuilt preference table
    pub fn with_preferences(mut self, preferences: impl Into<Arc<UnitPreferenceTable>>) -> Self {
        self.preferences = Some(preferences.into());
        self
    }

    /// Build graph and preferences from dataset records
    pub fn with_dataset(mut self, dataset: &UnitDataset) -> AmountResult<Self> {
        self.graph = Some(Arc::new(dataset.build_graph()?));
        self.preferences = Some(Arc::new(dataset.build_preferences()?));
        Ok(self)
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    /// Set the locale renderer (defaults to [`PlainRenderer`])
    pub fn with_renderer(mut self, renderer: impl LocaleRenderer + 'static) -> Self {
        self.renderer = Some(Arc::new(renderer));
        self
    }

    /// Log every render request at debug level
    pub fn log_rendering(mut self, enabled: bool) -> Self {
        self.log_rendering = enabled;
        self
    }

    // ========================================================================
    // Defaults
    // ========================================================================

    /// Replace the whole configuration
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the locale used when a call names none
    pub fn default_locale(mut self, locale: impl Into<String>) -> Self {
        self.config.default_locale = locale.into();
        self
    }

    /// Set the usage used when a call names none
    pub fn default_usage(mut self, usage: impl Into<String>) -> Self {
        self.config.default_usage = usage.into();
        self
    }

    /// Set the rounding mode used when a call names none
    pub fn default_rounding_mode(mut self, mode: RoundingMode) -> Self {
        self.config.default_rounding_mode = mode;
        self
    }

    /// Set the fraction digit bounds used when a conversion names none
    pub fn default_fraction_digits(mut self, min: u32, max: u32) -> Self {
        self.config.default_min_fraction_digits = min;
        self.config.default_max_fraction_digits = max;
        self
    }

    // ========================================================================
    // Preset Configurations
    // ========================================================================

    /// Built-in CLDR seed data with default configuration
    pub fn cldr_core() -> Self {
        let dataset = UnitDataset::cldr_core();
        Self {
            graph: dataset.build_graph().ok().map(Arc::new),
            preferences: dataset.build_preferences().ok().map(Arc::new),
            ..Self::default()
        }
    }

    // ========================================================================
    // Build
    // ========================================================================

    /// Build the engine
    ///
    /// # Errors
    /// `Validation` if no graph or preference table was supplied, or the
    /// configuration or unit data is inconsistent.
    pub fn build(self) -> AmountResult<ConversionEngine> {
        let graph = self
            .graph
            .ok_or_else(|| AmountError::validation("a conversion graph is required"))?;
        let preferences = self
            .preferences
            .ok_or_else(|| AmountError::validation("a unit preference table is required"))?;

        let renderer: Arc<dyn LocaleRenderer> =
            self.renderer.unwrap_or_else(|| Arc::new(PlainRenderer));
        let renderer: Arc<dyn LocaleRenderer> = if self.log_rendering {
            Arc::new(LoggingRenderer::new(renderer))
        } else {
            renderer
        };

        ConversionEngine::new(graph, preferences, renderer, self.config)
    }
}
