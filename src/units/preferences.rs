// ============================================================================
// Unit Preferences
// (locale, usage, quantity type) → ordered candidate units
// ============================================================================

use super::conversion_graph::ConversionGraph;
use super::unit::{QuantityType, UnitTag};
use crate::numeric::{AmountError, AmountResult};
use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Locale key holding the global default preferences (CLDR's world region).
pub const ROOT_LOCALE: &str = "001";

/// Usage applied when only a locale is given.
pub const DEFAULT_USAGE: &str = "default";

/// A candidate target unit, optionally gated by a minimum magnitude
/// expressed in the candidate's own unit.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UnitPreference {
    pub unit: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub geq: Option<f64>,
}

impl UnitPreference {
    pub fn new(unit: impl Into<String>) -> Self {
        Self {
            unit: unit.into(),
            geq: None,
        }
    }

    /// Builder method: Only pick this unit when the converted magnitude is at least `geq`
    pub fn with_geq(mut self, geq: f64) -> Self {
        self.geq = Some(geq);
        self
    }
}

type PreferenceKey = (String, String, QuantityType);

// ============================================================================
// Preference Table
// ============================================================================

/// Ordered candidate units keyed by `(locale, usage, quantity type)`.
///
/// Locale keys are case-insensitive. Populated once at startup, then shared
/// read-only.
#[derive(Debug, Clone, Default)]
pub struct UnitPreferenceTable {
    entries: HashMap<PreferenceKey, Vec<UnitPreference>>,
}

impl UnitPreferenceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the candidates for one key, replacing any earlier entry.
    pub fn insert(
        &mut self,
        locale: &str,
        usage: &str,
        quantity_type: &str,
        candidates: Vec<UnitPreference>,
    ) -> AmountResult<()> {
        if candidates.is_empty() {
            return Err(AmountError::validation(format!(
                "empty preference list for {locale}/{usage}/{quantity_type}"
            )));
        }
        if locale.is_empty() || usage.is_empty() || quantity_type.is_empty() {
            return Err(AmountError::validation(
                "preference keys must be non-empty",
            ));
        }
        self.entries.insert(
            (
                locale.to_ascii_lowercase(),
                usage.to_string(),
                QuantityType::new(quantity_type),
            ),
            candidates,
        );
        Ok(())
    }

    /// Builder method: Register the candidates for one key
    pub fn with_entry(
        mut self,
        locale: &str,
        usage: &str,
        quantity_type: &str,
        candidates: Vec<UnitPreference>,
    ) -> AmountResult<Self> {
        self.insert(locale, usage, quantity_type, candidates)?;
        Ok(self)
    }

    /// Exact lookup, no fallback.
    pub fn get(&self, locale: &str, usage: &str, quantity_type: &str) -> Option<&[UnitPreference]> {
        self.entries
            .get(&(
                locale.to_ascii_lowercase(),
                usage.to_string(),
                QuantityType::new(quantity_type),
            ))
            .map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check every candidate against `graph`, and that each quantity type
    /// with preferences has a global default entry.
    pub fn validate_against(&self, graph: &ConversionGraph) -> AmountResult<()> {
        for ((locale, usage, quantity_type), candidates) in &self.entries {
            for candidate in candidates {
                match graph.quantity_type_of(&candidate.unit) {
                    Some(qt) if qt == quantity_type => {}
                    Some(qt) => {
                        return Err(AmountError::validation(format!(
                            "preference {locale}/{usage}/{quantity_type} lists {} which is a {qt} unit",
                            candidate.unit
                        )))
                    }
                    None => {
                        return Err(AmountError::validation(format!(
                            "preference {locale}/{usage}/{quantity_type} lists unknown unit {}",
                            candidate.unit
                        )))
                    }
                }
            }
            if self.get(ROOT_LOCALE, DEFAULT_USAGE, quantity_type.as_str()).is_none() {
                return Err(AmountError::validation(format!(
                    "no {ROOT_LOCALE}/{DEFAULT_USAGE} preference for {quantity_type}"
                )));
            }
        }
        Ok(())
    }
}

/// Lookup order for a locale tag: the full tag, each truncation of it, then
/// its region subtag (`"en-US"` → `en-us`, `en`, `us`).
fn locale_fallbacks(locale: &str) -> Vec<String> {
    let normalized = locale.replace('_', "-").to_ascii_lowercase();
    let subtags: Vec<&str> = normalized.split('-').collect();

    let mut chain: Vec<String> = (1..=subtags.len())
        .rev()
        .map(|n| subtags[..n].join("-"))
        .collect();

    let region = subtags.iter().skip(1).find(|tag| {
        (tag.len() == 2 && tag.bytes().all(|b| b.is_ascii_alphabetic()))
            || (tag.len() == 3 && tag.bytes().all(|b| b.is_ascii_digit()))
    });
    if let Some(region) = region {
        if !chain.iter().any(|entry| entry == region) {
            chain.push((*region).to_string());
        }
    }
    chain
}

// ============================================================================
// Resolver
// ============================================================================

/// Picks a concrete target unit for a quantity type from locale/usage
/// preferences.
#[derive(Debug, Clone, Copy)]
pub struct UnitPreferenceResolver<'a> {
    table: &'a UnitPreferenceTable,
    graph: &'a ConversionGraph,
    default_locale: &'a str,
}

impl<'a> UnitPreferenceResolver<'a> {
    pub fn new(
        table: &'a UnitPreferenceTable,
        graph: &'a ConversionGraph,
        default_locale: &'a str,
    ) -> Self {
        Self {
            table,
            graph,
            default_locale,
        }
    }

    /// Ordered candidates after fallback: exact `(locale, usage)`, then
    /// locale-only, then usage-only, then the global default.
    ///
    /// A missing usage means `"default"`; a missing locale means the
    /// resolver's default locale.
    pub fn candidates(
        &self,
        quantity_type: &str,
        locale: Option<&str>,
        usage: Option<&str>,
    ) -> AmountResult<&'a [UnitPreference]> {
        let locale = locale.unwrap_or(self.default_locale);
        let usage = usage.unwrap_or(DEFAULT_USAGE);
        let locales = locale_fallbacks(locale);
        let table = self.table;

        let exact = locales
            .iter()
            .find_map(|l| table.get(l, usage, quantity_type));
        if let Some(found) = exact {
            return Ok(found);
        }

        tracing::trace!(locale, usage, quantity_type, "no exact unit preference, falling back");

        let locale_only = if usage == DEFAULT_USAGE {
            None
        } else {
            locales
                .iter()
                .find_map(|l| table.get(l, DEFAULT_USAGE, quantity_type))
        };

        locale_only
            .or_else(|| table.get(ROOT_LOCALE, usage, quantity_type))
            .or_else(|| table.get(ROOT_LOCALE, DEFAULT_USAGE, quantity_type))
            .ok_or_else(|| {
                AmountError::unsupported_conversion(format!(
                    "no unit preference data for {quantity_type}"
                ))
            })
    }

    /// First candidate unit for the key.
    pub fn resolve(
        &self,
        quantity_type: &str,
        locale: Option<&str>,
        usage: Option<&str>,
    ) -> AmountResult<UnitTag> {
        let candidates = self.candidates(quantity_type, locale, usage)?;
        candidates
            .first()
            .ok_or_else(|| {
                AmountError::unsupported_conversion(format!(
                    "no unit preference data for {quantity_type}"
                ))
            })
            .and_then(|preference| UnitTag::parse(&preference.unit))
    }

    /// First candidate whose `geq` threshold is met by `value` (given in
    /// `source_unit`) once converted into the candidate's unit; the last
    /// candidate is the fallback.
    pub fn resolve_for_value(
        &self,
        quantity_type: &str,
        locale: Option<&str>,
        usage: Option<&str>,
        value: f64,
        source_unit: &str,
    ) -> AmountResult<UnitTag> {
        let candidates = self.candidates(quantity_type, locale, usage)?;

        for preference in candidates {
            let Some(threshold) = preference.geq else {
                return UnitTag::parse(&preference.unit);
            };
            let converted = self.graph.convert(value, source_unit, &preference.unit)?;
            if converted.abs() >= threshold {
                return UnitTag::parse(&preference.unit);
            }
        }

        candidates
            .last()
            .ok_or_else(|| {
                AmountError::unsupported_conversion(format!(
                    "no unit preference data for {quantity_type}"
                ))
            })
            .and_then(|preference| UnitTag::parse(&preference.unit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::conversion_graph::UnitNode;

    fn graph() -> ConversionGraph {
        let mut g = ConversionGraph::new();
        for node in [
            UnitNode::new("meter", "length", 1.0),
            UnitNode::new("kilometer", "length", 1000.0),
            UnitNode::new("centimeter", "length", 0.01),
            UnitNode::new("mile", "length", 1609.344),
            UnitNode::new("foot", "length", 0.3048),
            UnitNode::new("inch", "length", 0.0254),
            UnitNode::new("kilogram", "mass", 1.0),
        ] {
            g.insert(node).unwrap();
        }
        g
    }

    fn table() -> UnitPreferenceTable {
        UnitPreferenceTable::new()
            .with_entry(
                ROOT_LOCALE,
                DEFAULT_USAGE,
                "length",
                vec![
                    UnitPreference::new("kilometer").with_geq(1.0),
                    UnitPreference::new("meter").with_geq(1.0),
                    UnitPreference::new("centimeter"),
                ],
            )
            .and_then(|t| {
                t.with_entry(
                    ROOT_LOCALE,
                    "person-height",
                    "length",
                    vec![UnitPreference::new("centimeter")],
                )
            })
            .and_then(|t| {
                t.with_entry(
                    "US",
                    DEFAULT_USAGE,
                    "length",
                    vec![
                        UnitPreference::new("mile").with_geq(1.0),
                        UnitPreference::new("foot").with_geq(1.0),
                        UnitPreference::new("inch"),
                    ],
                )
            })
            .and_then(|t| {
                t.with_entry("us", "person-height", "length", vec![UnitPreference::new("inch")])
            })
            .unwrap()
    }

    fn unit(tag: AmountResult<UnitTag>) -> String {
        tag.unwrap().as_str().to_string()
    }

    #[test]
    fn test_locale_fallbacks() {
        assert_eq!(locale_fallbacks("en-US"), vec!["en-us", "en", "us"]);
        assert_eq!(locale_fallbacks("fr"), vec!["fr"]);
        assert_eq!(
            locale_fallbacks("es_419"),
            vec!["es-419".to_string(), "es".to_string(), "419".to_string()]
        );
        assert_eq!(
            locale_fallbacks("zh-Hant-TW"),
            vec!["zh-hant-tw", "zh-hant", "zh", "tw"]
        );
    }

    #[test]
    fn test_exact_match() {
        let (t, g) = (table(), graph());
        let resolver = UnitPreferenceResolver::new(&t, &g, "en-US");
        assert_eq!(unit(resolver.resolve("length", Some("en-US"), Some("person-height"))), "inch");
        assert_eq!(unit(resolver.resolve("length", Some("en-US"), None)), "mile");
    }

    #[test]
    fn test_usage_fallback_to_root() {
        let (t, g) = (table(), graph());
        let resolver = UnitPreferenceResolver::new(&t, &g, "en-US");
        // fr has nothing of its own: usage-only root entry wins
        assert_eq!(unit(resolver.resolve("length", Some("fr"), Some("person-height"))), "centimeter");
        // unknown usage for fr: global default
        assert_eq!(unit(resolver.resolve("length", Some("fr"), Some("road"))), "kilometer");
    }

    #[test]
    fn test_locale_only_fallback_precedes_usage_only() {
        let (t, g) = (table(), graph());
        let resolver = UnitPreferenceResolver::new(&t, &g, "fr");
        assert_eq!(unit(resolver.resolve("length", Some("en-US"), Some("road"))), "mile");
    }

    #[test]
    fn test_default_locale_applies_when_absent() {
        let (t, g) = (table(), graph());
        let us = UnitPreferenceResolver::new(&t, &g, "en-US");
        assert_eq!(unit(us.resolve("length", None, Some("person-height"))), "inch");

        let fr = UnitPreferenceResolver::new(&t, &g, "fr-FR");
        assert_eq!(unit(fr.resolve("length", None, Some("person-height"))), "centimeter");
    }

    #[test]
    fn test_threshold_selection() {
        let (t, g) = (table(), graph());
        let resolver = UnitPreferenceResolver::new(&t, &g, "fr");

        let pick = |value: f64, source: &str| {
            unit(resolver.resolve_for_value("length", None, None, value, source))
        };
        assert_eq!(pick(2500.0, "meter"), "kilometer");
        assert_eq!(pick(12.0, "meter"), "meter");
        assert_eq!(pick(0.5, "meter"), "centimeter");
        assert_eq!(pick(-3000.0, "meter"), "kilometer");
    }

    #[test]
    fn test_missing_quantity_type() {
        let (t, g) = (table(), graph());
        let resolver = UnitPreferenceResolver::new(&t, &g, "en-US");
        assert!(matches!(
            resolver.resolve("mass", None, None),
            Err(AmountError::UnsupportedConversion(_))
        ));
    }

    #[test]
    fn test_validate_against_graph() {
        let g = graph();
        assert!(table().validate_against(&g).is_ok());

        let bad_unit = UnitPreferenceTable::new()
            .with_entry(ROOT_LOCALE, DEFAULT_USAGE, "length", vec![UnitPreference::new("parsec")])
            .unwrap();
        assert!(bad_unit.validate_against(&g).is_err());

        let wrong_type = UnitPreferenceTable::new()
            .with_entry(ROOT_LOCALE, DEFAULT_USAGE, "mass", vec![UnitPreference::new("meter")])
            .unwrap();
        assert!(wrong_type.validate_against(&g).is_err());

        let no_root = UnitPreferenceTable::new()
            .with_entry("us", DEFAULT_USAGE, "length", vec![UnitPreference::new("foot")])
            .unwrap();
        assert!(no_root.validate_against(&g).is_err());
    }

    #[test]
    fn test_empty_candidates_rejected() {
        let mut t = UnitPreferenceTable::new();
        assert!(t.insert(ROOT_LOCALE, DEFAULT_USAGE, "length", Vec::new()).is_err());
        assert!(t.is_empty());
    }
}
