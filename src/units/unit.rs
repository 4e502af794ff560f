// ============================================================================
// Unit Tags
// Measurement unit vs. currency classification
// ============================================================================

use crate::numeric::{AmountError, AmountResult};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Unit attached to an amount: either a measurement unit or a currency,
/// never both. An amount without a unit holds `None` instead of a tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase")
)]
pub enum UnitTag {
    /// CLDR-style unit identifier, e.g. `"foot"`, `"kilogram"`
    Measurement(String),
    /// ISO 4217 code, e.g. `"USD"`
    Currency(String),
}

impl UnitTag {
    /// Classify raw unit text: three uppercase ASCII letters is a currency
    /// code, anything else must be a well-formed measurement unit.
    ///
    /// # Errors
    /// Returns `Validation` for empty or malformed identifiers.
    pub fn parse(raw: &str) -> AmountResult<Self> {
        if is_currency_code(raw) {
            Ok(UnitTag::Currency(raw.to_string()))
        } else if is_unit_identifier(raw) {
            Ok(UnitTag::Measurement(raw.to_string()))
        } else {
            Err(AmountError::validation(format!(
                "{raw:?} is neither a currency code nor a unit identifier"
            )))
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            UnitTag::Measurement(id) | UnitTag::Currency(id) => id,
        }
    }

    pub fn is_currency(&self) -> bool {
        matches!(self, UnitTag::Currency(_))
    }
}

impl fmt::Display for UnitTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnitTag {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UnitTag::parse(s)
    }
}

/// `AAA` style currency code.
pub fn is_currency_code(raw: &str) -> bool {
    raw.len() == 3 && raw.bytes().all(|b| b.is_ascii_uppercase())
}

/// Lowercase alphanumeric segments joined by single hyphens.
pub fn is_unit_identifier(raw: &str) -> bool {
    !raw.is_empty()
        && raw.split('-').all(|segment| {
            !segment.is_empty()
                && segment
                    .bytes()
                    .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
        })
}

// ============================================================================
// Quantity Type
// ============================================================================

/// Category of mutually convertible units sharing one base unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct QuantityType(String);

impl QuantityType {
    pub const LENGTH: &'static str = "length";
    pub const MASS: &'static str = "mass";
    pub const TEMPERATURE: &'static str = "temperature";
    pub const DURATION: &'static str = "duration";

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for QuantityType {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for QuantityType {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for QuantityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
