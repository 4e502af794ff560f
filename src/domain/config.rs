// ============================================================================
// Engine Configuration
// Process-wide defaults for conversion, rounding and unit preference lookup
// ============================================================================

use crate::numeric::{AmountError, AmountResult, RoundingMode, MAX_FRACTION_DIGITS};
use crate::units::DEFAULT_USAGE;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Defaults applied when a call leaves an option out.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase", default)
)]
pub struct EngineConfig {
    /// Locale used for preference lookup when only a usage is given
    pub default_locale: String,

    /// Usage used for preference lookup when only a locale is given
    pub default_usage: String,

    /// Mode for every rounding step that does not name one
    pub default_rounding_mode: RoundingMode,

    /// Conversion results keep at least this many fraction digits
    pub default_min_fraction_digits: u32,

    /// Conversion results keep at most this many fraction digits
    pub default_max_fraction_digits: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_locale: "en-US".to_string(),
            default_usage: DEFAULT_USAGE.to_string(),
            default_rounding_mode: RoundingMode::HalfEven,
            default_min_fraction_digits: 0,
            default_max_fraction_digits: 3,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: Set the default locale
    pub fn with_default_locale(mut self, locale: impl Into<String>) -> Self {
        self.default_locale = locale.into();
        self
    }

    /// Builder method: Set the default usage
    pub fn with_default_usage(mut self, usage: impl Into<String>) -> Self {
        self.default_usage = usage.into();
        self
    }

    /// Builder method: Set the default rounding mode
    pub fn with_default_rounding_mode(mut self, mode: RoundingMode) -> Self {
        self.default_rounding_mode = mode;
        self
    }

    /// Builder method: Set the default fraction digit bounds
    pub fn with_default_fraction_digits(mut self, min: u32, max: u32) -> Self {
        self.default_min_fraction_digits = min;
        self.default_max_fraction_digits = max;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> AmountResult<()> {
        if self.default_locale.trim().is_empty() {
            return Err(AmountError::validation("default locale cannot be empty"));
        }
        if self.default_usage.trim().is_empty() {
            return Err(AmountError::validation("default usage cannot be empty"));
        }

        AmountError::check_range(
            "defaultMaxFractionDigits",
            self.default_max_fraction_digits,
            0,
            MAX_FRACTION_DIGITS,
        )?;
        AmountError::check_range(
            "defaultMinFractionDigits",
            self.default_min_fraction_digits,
            0,
            self.default_max_fraction_digits,
        )?;

        Ok(())
    }
}

// ============================================================================
// Preset Configurations (Factory Methods)
// ============================================================================

impl EngineConfig {
    /// US defaults: `en-US`, half-even, up to three fraction digits
    pub fn us_style() -> Self {
        Self::default()
    }

    /// Metric defaults for the world region
    pub fn metric_style() -> Self {
        Self::default().with_default_locale(crate::units::ROOT_LOCALE)
    }

    /// Commercial rounding (ties away from zero) with two fixed fraction digits
    pub fn commercial(locale: impl Into<String>) -> Self {
        Self::default()
            .with_default_locale(locale)
            .with_default_rounding_mode(RoundingMode::HalfExpand)
            .with_default_fraction_digits(2, 2)
    }
}
