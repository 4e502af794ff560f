// ============================================================================
// Conversion Graph
// Per-quantity-type unit nodes with affine edges to a shared base unit
// ============================================================================

use super::unit::{is_currency_code, is_unit_identifier, QuantityType};
use crate::numeric::{AmountError, AmountResult};
use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ============================================================================
// Unit Node
// ============================================================================

/// A unit and its affine edge to the base unit of its quantity type:
/// `base = value * factor + offset`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UnitNode {
    pub id: String,
    pub quantity_type: QuantityType,
    pub factor: f64,
    /// Nonzero only for affine scales such as temperature
    pub offset: f64,
}

impl UnitNode {
    /// Create a purely multiplicative unit.
    pub fn new(id: impl Into<String>, quantity_type: impl Into<QuantityType>, factor: f64) -> Self {
        Self {
            id: id.into(),
            quantity_type: quantity_type.into(),
            factor,
            offset: 0.0,
        }
    }

    /// Builder method: Set the additive offset
    pub fn with_offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }

    /// Whether this node is its quantity type's base unit.
    pub fn is_identity(&self) -> bool {
        self.factor == 1.0 && self.offset == 0.0
    }

    /// Validate the node before it enters a graph
    pub fn validate(&self) -> AmountResult<()> {
        if is_currency_code(&self.id) {
            return Err(AmountError::validation(format!(
                "currency {} cannot be a conversion unit",
                self.id
            )));
        }
        if !is_unit_identifier(&self.id) {
            return Err(AmountError::validation(format!(
                "{:?} is not a valid unit identifier",
                self.id
            )));
        }
        if self.quantity_type.as_str().is_empty() {
            return Err(AmountError::validation(format!(
                "unit {} has an empty quantity type",
                self.id
            )));
        }
        if !self.factor.is_finite() || self.factor == 0.0 {
            return Err(AmountError::validation(format!(
                "unit {} needs a finite nonzero factor",
                self.id
            )));
        }
        if !self.offset.is_finite() {
            return Err(AmountError::validation(format!(
                "unit {} needs a finite offset",
                self.id
            )));
        }
        Ok(())
    }
}

// ============================================================================
// Affine Transform
// ============================================================================

/// Composed source → base → target conversion.
///
/// Applies `((value * source_factor) + source_offset - target_offset) / target_factor`.
/// No rounding happens here; the caller rounds the result once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineTransform {
    source_factor: f64,
    source_offset: f64,
    target_factor: f64,
    target_offset: f64,
}

impl AffineTransform {
    /// The transform that leaves every value unchanged.
    pub const IDENTITY: Self = Self {
        source_factor: 1.0,
        source_offset: 0.0,
        target_factor: 1.0,
        target_offset: 0.0,
    };

    pub fn between(source: &UnitNode, target: &UnitNode) -> Self {
        Self {
            source_factor: source.factor,
            source_offset: source.offset,
            target_factor: target.factor,
            target_offset: target.offset,
        }
    }

    /// True when neither side carries an offset.
    pub fn is_multiplicative(&self) -> bool {
        self.source_offset == 0.0 && self.target_offset == 0.0
    }

    /// Effective multiplier of the composed transform.
    pub fn factor(&self) -> f64 {
        self.source_factor / self.target_factor
    }

    /// Effective additive term of the composed transform.
    pub fn offset(&self) -> f64 {
        (self.source_offset - self.target_offset) / self.target_factor
    }

    pub fn apply(&self, value: f64) -> f64 {
        if self.is_multiplicative() {
            (value * self.source_factor) / self.target_factor
        } else {
            ((value * self.source_factor) + self.source_offset - self.target_offset)
                / self.target_factor
        }
    }
}

// ============================================================================
// Conversion Graph
// ============================================================================

/// Unit nodes grouped by quantity type. Edges always run unit → base; a
/// conversion between two units composes through the base.
///
/// Populated once at startup, then shared read-only.
#[derive(Debug, Clone, Default)]
pub struct ConversionGraph {
    units: HashMap<String, UnitNode>,
    base_units: HashMap<QuantityType, String>,
}

impl ConversionGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a unit, returning the node it replaced, if any.
    ///
    /// The first identity node (factor 1, offset 0) of a quantity type becomes
    /// its base unit unless one was declared with [`Self::set_base_unit`].
    pub fn insert(&mut self, node: UnitNode) -> AmountResult<Option<UnitNode>> {
        node.validate()?;

        if node.is_identity() && !self.base_units.contains_key(node.quantity_type.as_str()) {
            self.base_units
                .insert(node.quantity_type.clone(), node.id.clone());
        }

        let replaced = self.units.insert(node.id.clone(), node);
        if let Some(previous) = &replaced {
            tracing::debug!(unit = %previous.id, "replacing unit in conversion graph");
        }
        Ok(replaced)
    }

    /// Builder method: Insert a unit
    pub fn with_unit(mut self, node: UnitNode) -> AmountResult<Self> {
        self.insert(node)?;
        Ok(self)
    }

    /// Declare the base unit of a quantity type. The unit must already be a
    /// node of that type.
    pub fn set_base_unit(&mut self, quantity_type: &str, unit: &str) -> AmountResult<()> {
        match self.units.get(unit) {
            Some(node) if node.quantity_type.as_str() == quantity_type => {
                self.base_units
                    .insert(QuantityType::new(quantity_type), unit.to_string());
                Ok(())
            }
            Some(node) => Err(AmountError::validation(format!(
                "base unit {unit} belongs to {}, not {quantity_type}",
                node.quantity_type
            ))),
            None => Err(AmountError::validation(format!(
                "base unit {unit} is not in the conversion graph"
            ))),
        }
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn contains(&self, unit: &str) -> bool {
        self.units.contains_key(unit)
    }

    pub fn node(&self, unit: &str) -> Option<&UnitNode> {
        self.units.get(unit)
    }

    pub fn quantity_type_of(&self, unit: &str) -> Option<&QuantityType> {
        self.units.get(unit).map(|node| &node.quantity_type)
    }

    pub fn base_unit(&self, quantity_type: &str) -> Option<&str> {
        self.base_units.get(quantity_type).map(String::as_str)
    }

    /// All units of one quantity type, in no particular order.
    pub fn units_of<'a>(&'a self, quantity_type: &'a str) -> impl Iterator<Item = &'a UnitNode> + 'a {
        self.units
            .values()
            .filter(move |node| node.quantity_type.as_str() == quantity_type)
    }

    /// Compose the transform from `source` to `target`.
    ///
    /// # Errors
    /// `UnsupportedConversion` when either unit is not in the graph
    /// (currencies never are) or the quantity types differ.
    pub fn resolve_transform(&self, source: &str, target: &str) -> AmountResult<AffineTransform> {
        let source_node = self.lookup(source)?;
        let target_node = self.lookup(target)?;

        if source_node.quantity_type != target_node.quantity_type {
            return Err(AmountError::unsupported_conversion(format!(
                "cannot convert {source} ({}) to {target} ({})",
                source_node.quantity_type, target_node.quantity_type
            )));
        }

        if source == target {
            return Ok(AffineTransform::IDENTITY);
        }
        Ok(AffineTransform::between(source_node, target_node))
    }

    /// Convert a float between two units.
    pub fn convert(&self, value: f64, source: &str, target: &str) -> AmountResult<f64> {
        self.resolve_transform(source, target)
            .map(|transform| transform.apply(value))
    }

    fn lookup(&self, unit: &str) -> AmountResult<&UnitNode> {
        self.units.get(unit).ok_or_else(|| {
            if is_currency_code(unit) {
                AmountError::unsupported_conversion(format!(
                    "currency {unit} cannot be converted"
                ))
            } else {
                AmountError::unsupported_conversion(format!("no conversion data for unit {unit}"))
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    fn graph() -> ConversionGraph {
        ConversionGraph::new()
            .with_unit(UnitNode::new("meter", "length", 1.0))
            .and_then(|g| g.with_unit(UnitNode::new("foot", "length", 0.3048)))
            .and_then(|g| g.with_unit(UnitNode::new("inch", "length", 0.0254)))
            .and_then(|g| g.with_unit(UnitNode::new("kilogram", "mass", 1.0)))
            .and_then(|g| g.with_unit(UnitNode::new("kelvin", "temperature", 1.0)))
            .and_then(|g| {
                g.with_unit(UnitNode::new("celsius", "temperature", 1.0).with_offset(273.15))
            })
            .and_then(|g| {
                g.with_unit(
                    UnitNode::new("fahrenheit", "temperature", 5.0 / 9.0)
                        .with_offset(2298.35 / 9.0),
                )
            })
            .unwrap()
    }

    #[test]
    fn test_multiplicative_conversion() {
        let g = graph();
        assert_close(g.convert(1.75, "foot", "inch").unwrap(), 21.0);
        assert_close(g.convert(1.0, "meter", "foot").unwrap(), 3.280839895013123);

        let transform = g.resolve_transform("foot", "inch").unwrap();
        assert!(transform.is_multiplicative());
        assert_close(transform.factor(), 12.0);
    }

    #[test]
    fn test_affine_conversion() {
        let g = graph();
        assert_close(g.convert(100.0, "celsius", "fahrenheit").unwrap(), 212.0);
        assert_close(g.convert(32.0, "fahrenheit", "celsius").unwrap(), 0.0);
        assert_close(g.convert(0.0, "celsius", "kelvin").unwrap(), 273.15);

        let transform = g.resolve_transform("celsius", "fahrenheit").unwrap();
        assert!(!transform.is_multiplicative());
        assert_close(transform.factor(), 1.8);
        assert_close(transform.offset(), 32.0);
    }

    #[test]
    fn test_identity_conversion() {
        let g = graph();
        assert_eq!(
            g.resolve_transform("inch", "inch").unwrap(),
            AffineTransform::IDENTITY
        );
    }

    #[test]
    fn test_cross_category_rejected() {
        let g = graph();
        assert!(matches!(
            g.resolve_transform("kilogram", "meter"),
            Err(AmountError::UnsupportedConversion(_))
        ));
    }

    #[test]
    fn test_unknown_and_currency_units_rejected() {
        let g = graph();
        assert!(matches!(
            g.resolve_transform("furlong", "meter"),
            Err(AmountError::UnsupportedConversion(_))
        ));
        assert!(matches!(
            g.resolve_transform("USD", "EUR"),
            Err(AmountError::UnsupportedConversion(_))
        ));
    }

    #[test]
    fn test_base_units() {
        let g = graph();
        assert_eq!(g.base_unit("length"), Some("meter"));
        assert_eq!(g.base_unit("temperature"), Some("kelvin"));
        assert_eq!(g.base_unit("volume"), None);
        assert_eq!(g.units_of("length").count(), 3);
        assert_eq!(g.quantity_type_of("inch").map(QuantityType::as_str), Some("length"));
    }

    #[test]
    fn test_set_base_unit() {
        let mut g = graph();
        assert!(g.set_base_unit("length", "kilogram").is_err());
        assert!(g.set_base_unit("length", "parsec").is_err());
        g.set_base_unit("length", "meter").unwrap();
    }

    #[test]
    fn test_invalid_nodes_rejected() {
        let mut g = ConversionGraph::new();
        assert!(g.insert(UnitNode::new("USD", "currency", 1.0)).is_err());
        assert!(g.insert(UnitNode::new("meter", "length", 0.0)).is_err());
        assert!(g.insert(UnitNode::new("meter", "length", f64::NAN)).is_err());
        assert!(g.insert(UnitNode::new("Meter", "length", 1.0)).is_err());
        assert!(g.is_empty());
    }

    #[test]
    fn test_insert_replaces() {
        let mut g = graph();
        let previous = g.insert(UnitNode::new("foot", "length", 0.3)).unwrap();
        assert_eq!(previous.map(|n| n.factor), Some(0.3048));
        assert_eq!(g.len(), 7);
    }
}
