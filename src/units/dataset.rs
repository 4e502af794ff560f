// ============================================================================
// Unit Dataset
// In-memory conversion and preference tables handed over by a loader
// ============================================================================

use super::conversion_graph::{ConversionGraph, UnitNode};
use super::preferences::{UnitPreference, UnitPreferenceTable, DEFAULT_USAGE, ROOT_LOCALE};
use super::unit::QuantityType;
use crate::numeric::{AmountError, AmountResult};
use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One row of the unit-conversion table.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct UnitRecord {
    pub id: String,
    pub quantity_type: String,
    pub base_unit: String,
    pub factor: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub offset: f64,
}

impl UnitRecord {
    pub fn new(id: &str, quantity_type: &str, base_unit: &str, factor: f64) -> Self {
        Self {
            id: id.to_string(),
            quantity_type: quantity_type.to_string(),
            base_unit: base_unit.to_string(),
            factor,
            offset: 0.0,
        }
    }

    /// Builder method: Set the additive offset
    pub fn with_offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }
}

/// One row of the unit-preference table.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct PreferenceRecord {
    pub locale: String,
    pub usage: String,
    pub quantity_type: String,
    pub units: Vec<UnitPreference>,
}

impl PreferenceRecord {
    pub fn new(locale: &str, usage: &str, quantity_type: &str, units: Vec<UnitPreference>) -> Self {
        Self {
            locale: locale.to_string(),
            usage: usage.to_string(),
            quantity_type: quantity_type.to_string(),
            units,
        }
    }
}

/// Pre-loaded conversion and preference data, structurally equivalent to the
/// CLDR unit-conversion and unit-preference tables. Parsing the raw CLDR
/// files is the loader's job; this crate starts from these records.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UnitDataset {
    pub units: Vec<UnitRecord>,
    pub preferences: Vec<PreferenceRecord>,
}

impl UnitDataset {
    /// Build the conversion graph, checking that every unit of a quantity
    /// type names the same base unit.
    pub fn build_graph(&self) -> AmountResult<ConversionGraph> {
        let mut graph = ConversionGraph::new();
        let mut bases: HashMap<&str, &str> = HashMap::new();

        for record in &self.units {
            match bases.get(record.quantity_type.as_str()) {
                Some(base) if *base != record.base_unit => {
                    return Err(AmountError::validation(format!(
                        "unit {} declares base {} but {} already uses {base}",
                        record.id, record.base_unit, record.quantity_type
                    )));
                }
                Some(_) => {}
                None => {
                    bases.insert(&record.quantity_type, &record.base_unit);
                }
            }
            graph.insert(
                UnitNode::new(
                    record.id.as_str(),
                    QuantityType::new(record.quantity_type.as_str()),
                    record.factor,
                )
                .with_offset(record.offset),
            )?;
        }

        for (quantity_type, base) in bases {
            graph.set_base_unit(quantity_type, base)?;
        }
        Ok(graph)
    }

    /// Build the preference table.
    pub fn build_preferences(&self) -> AmountResult<UnitPreferenceTable> {
        let mut table = UnitPreferenceTable::new();
        for record in &self.preferences {
            table.insert(
                &record.locale,
                &record.usage,
                &record.quantity_type,
                record.units.clone(),
            )?;
        }
        Ok(table)
    }

    /// Seed data: CLDR factors for length, mass, temperature and duration,
    /// with preferences for the world default, the US and GB.
    pub fn cldr_core() -> Self {
        let length = QuantityType::LENGTH;
        let mass = QuantityType::MASS;
        let temperature = QuantityType::TEMPERATURE;
        let duration = QuantityType::DURATION;

        let units = vec![
            UnitRecord::new("meter", length, "meter", 1.0),
            UnitRecord::new("kilometer", length, "meter", 1000.0),
            UnitRecord::new("centimeter", length, "meter", 0.01),
            UnitRecord::new("millimeter", length, "meter", 0.001),
            UnitRecord::new("inch", length, "meter", 0.0254),
            UnitRecord::new("foot", length, "meter", 0.3048),
            UnitRecord::new("yard", length, "meter", 0.9144),
            UnitRecord::new("mile", length, "meter", 1609.344),
            UnitRecord::new("nautical-mile", length, "meter", 1852.0),
            UnitRecord::new("kilogram", mass, "kilogram", 1.0),
            UnitRecord::new("gram", mass, "kilogram", 0.001),
            UnitRecord::new("milligram", mass, "kilogram", 0.000001),
            UnitRecord::new("tonne", mass, "kilogram", 1000.0),
            UnitRecord::new("pound", mass, "kilogram", 0.45359237),
            UnitRecord::new("ounce", mass, "kilogram", 0.028349523125),
            UnitRecord::new("stone", mass, "kilogram", 6.35029318),
            UnitRecord::new("kelvin", temperature, "kelvin", 1.0),
            UnitRecord::new("celsius", temperature, "kelvin", 1.0).with_offset(273.15),
            UnitRecord::new("fahrenheit", temperature, "kelvin", 5.0 / 9.0)
                .with_offset(2298.35 / 9.0),
            UnitRecord::new("second", duration, "second", 1.0),
            UnitRecord::new("millisecond", duration, "second", 0.001),
            UnitRecord::new("minute", duration, "second", 60.0),
            UnitRecord::new("hour", duration, "second", 3600.0),
            UnitRecord::new("day", duration, "second", 86400.0),
            UnitRecord::new("week", duration, "second", 604800.0),
        ];

        let pref = UnitPreference::new;
        let preferences = vec![
            // Length
            PreferenceRecord::new(
                ROOT_LOCALE,
                DEFAULT_USAGE,
                length,
                vec![pref("kilometer").with_geq(1.0), pref("meter").with_geq(1.0), pref("centimeter")],
            ),
            PreferenceRecord::new(
                "US",
                DEFAULT_USAGE,
                length,
                vec![pref("mile").with_geq(1.0), pref("foot").with_geq(1.0), pref("inch")],
            ),
            PreferenceRecord::new(ROOT_LOCALE, "person-height", length, vec![pref("centimeter")]),
            PreferenceRecord::new("US", "person-height", length, vec![pref("inch")]),
            PreferenceRecord::new(
                ROOT_LOCALE,
                "road",
                length,
                vec![pref("kilometer").with_geq(0.9), pref("meter")],
            ),
            PreferenceRecord::new(
                "US",
                "road",
                length,
                vec![pref("mile").with_geq(0.5), pref("foot")],
            ),
            PreferenceRecord::new(
                "GB",
                "road",
                length,
                vec![pref("mile").with_geq(0.5), pref("yard")],
            ),
            // Mass
            PreferenceRecord::new(
                ROOT_LOCALE,
                DEFAULT_USAGE,
                mass,
                vec![pref("kilogram").with_geq(1.0), pref("gram")],
            ),
            PreferenceRecord::new(
                "US",
                DEFAULT_USAGE,
                mass,
                vec![pref("pound").with_geq(1.0), pref("ounce")],
            ),
            PreferenceRecord::new(ROOT_LOCALE, "person", mass, vec![pref("kilogram")]),
            PreferenceRecord::new("US", "person", mass, vec![pref("pound")]),
            PreferenceRecord::new("GB", "person", mass, vec![pref("stone")]),
            // Temperature
            PreferenceRecord::new(ROOT_LOCALE, DEFAULT_USAGE, temperature, vec![pref("celsius")]),
            PreferenceRecord::new("US", DEFAULT_USAGE, temperature, vec![pref("fahrenheit")]),
            PreferenceRecord::new(ROOT_LOCALE, "weather", temperature, vec![pref("celsius")]),
            PreferenceRecord::new("US", "weather", temperature, vec![pref("fahrenheit")]),
            // Duration
            PreferenceRecord::new(
                ROOT_LOCALE,
                DEFAULT_USAGE,
                duration,
                vec![pref("hour").with_geq(1.0), pref("minute").with_geq(1.0), pref("second")],
            ),
        ];

        Self { units, preferences }
    }
}
