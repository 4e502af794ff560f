// ============================================================================
// Decimal Value
// Exact base-10 number: sign + digit sequence + scale
// ============================================================================

use super::errors::{AmountError, AmountResult};
use smallvec::SmallVec;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Neg;
use std::str::FromStr;

/// Coefficient digits, most significant first.
pub(crate) type Digits = SmallVec<[u8; 24]>;

/// Largest scale magnitude accepted from textual input.
///
/// Covers every `f64` (whose shortest rendering needs at most ~340 fractional
/// digits) while keeping exponent inputs like `"1e999999999"` from
/// materialising enormous renderings.
pub const MAX_SCALE_MAGNITUDE: i32 = 1_000;

/// Exact decimal number.
///
/// The value is `(-1)^negative × coefficient × 10^(-scale)`. The coefficient
/// never carries leading zeros (zero is the single digit `0`), while trailing
/// zeros are kept exactly as given: `"1.50"` and `"1.5"` are numerically equal
/// but report different digit counts.
///
/// A negative scale means the coefficient is followed by implicit zeros, which
/// is how significant-digit rounding of integers keeps its digit count:
/// `12345` rounded to 2 significant digits is coefficient `12`, scale `-3`,
/// rendered `"12000"`.
///
/// # Example
/// ```
/// use amount_engine::numeric::DecimalValue;
///
/// let v: DecimalValue = "123.456".parse().unwrap();
/// assert_eq!(v.significant_digits(), 6);
/// assert_eq!(v.fractional_digits(), 3);
/// assert_eq!(v.pad_to_fraction_digits(4).to_string(), "123.4560");
/// ```
#[derive(Clone)]
pub struct DecimalValue {
    negative: bool,
    coefficient: Digits,
    scale: i32,
}

impl DecimalValue {
    // ========================================================================
    // Construction
    // ========================================================================

    /// Zero with no fractional digits.
    pub fn zero() -> Self {
        Self {
            negative: false,
            coefficient: smallvec::smallvec![0],
            scale: 0,
        }
    }

    /// Build from raw parts, stripping leading zeros from the coefficient.
    pub(crate) fn from_parts(negative: bool, coefficient: Digits, scale: i32) -> Self {
        let first_nonzero = coefficient.iter().position(|&d| d != 0);
        match first_nonzero {
            Some(start) => {
                let coefficient = if start == 0 {
                    coefficient
                } else {
                    coefficient[start..].iter().copied().collect()
                };
                Self {
                    negative,
                    coefficient,
                    scale,
                }
            }
            None => Self {
                negative,
                coefficient: smallvec::smallvec![0],
                // zero has no implicit trailing digits to track
                scale: scale.max(0),
            },
        }
    }

    /// Create from a float using its shortest round-trip decimal rendering.
    ///
    /// `1.75_f64` becomes exactly `1.75`, not the binary expansion.
    ///
    /// # Errors
    /// Returns `Validation` for NaN or infinite input.
    pub fn from_f64(value: f64) -> AmountResult<Self> {
        if !value.is_finite() {
            return Err(AmountError::validation(format!(
                "cannot represent non-finite number {value} as a decimal"
            )));
        }
        // `Display` for f64 never uses exponent notation
        format!("{value}").parse()
    }

    /// Convert to `rust_decimal::Decimal`.
    ///
    /// Intended for API boundaries.
    ///
    /// # Errors
    /// Returns `Validation` when the value needs more than the 96-bit mantissa
    /// or 28-digit scale `Decimal` provides.
    pub fn to_decimal(&self) -> AmountResult<rust_decimal::Decimal> {
        let unrepresentable =
            || AmountError::validation(format!("{self} is not representable as Decimal"));

        let value = self.pad_to_fraction_digits(0);
        let mut mantissa: i128 = 0;
        for &digit in &value.coefficient {
            mantissa = mantissa
                .checked_mul(10)
                .and_then(|m| m.checked_add(i128::from(digit)))
                .ok_or_else(unrepresentable)?;
        }
        if value.negative {
            mantissa = -mantissa;
        }
        let scale = u32::try_from(value.scale).map_err(|_| unrepresentable())?;
        rust_decimal::Decimal::try_from_i128_with_scale(mantissa, scale)
            .map_err(|_| unrepresentable())
    }

    /// Convert to the nearest `f64`.
    pub fn to_f64(&self) -> f64 {
        // std float parsing is correctly rounded, and the rendering is always
        // well-formed decimal text
        self.to_string().parse().unwrap_or(f64::NAN)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Check if value is zero (of either sign).
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.coefficient.len() == 1 && self.coefficient[0] == 0
    }

    /// Check if value is strictly below zero.
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.negative && !self.is_zero()
    }

    /// Check if the sign bit is set, including negative zero.
    #[inline]
    pub fn is_sign_negative(&self) -> bool {
        self.negative
    }

    /// Digits right of the decimal point in the rendering.
    #[inline]
    pub fn fractional_digits(&self) -> u32 {
        self.scale.max(0).unsigned_abs()
    }

    /// Count of digits excluding leading zeros, trailing zeros included.
    ///
    /// Zero counts its units digit plus every fractional zero (`"0.00"` → 3).
    pub fn significant_digits(&self) -> u32 {
        if self.is_zero() {
            self.fractional_digits() + 1
        } else {
            u32::try_from(self.coefficient.len()).unwrap_or(u32::MAX)
        }
    }

    /// Position of the decimal point relative to the coefficient's last digit.
    #[inline]
    pub fn scale(&self) -> i32 {
        self.scale
    }

    /// `floor(log10(|self|))` for nonzero values, 0 for zero.
    pub fn magnitude(&self) -> i32 {
        if self.is_zero() {
            0
        } else {
            self.coefficient.len() as i32 - 1 - self.scale
        }
    }

    #[inline]
    pub(crate) fn coefficient(&self) -> &[u8] {
        &self.coefficient
    }

    /// Absolute value.
    pub fn abs(&self) -> Self {
        Self {
            negative: false,
            ..self.clone()
        }
    }

    // ========================================================================
    // Exact Rescaling
    // ========================================================================

    /// Zero-pad to `digits` fractional digits. Never lossy; a value that
    /// already has at least that many is returned unchanged.
    pub fn pad_to_fraction_digits(&self, digits: u32) -> Self {
        let target = digits as i32;
        if target <= self.scale {
            return self.clone();
        }
        if self.is_zero() {
            return Self {
                scale: target,
                ..self.clone()
            };
        }
        let mut padded = self.clone();
        padded
            .coefficient
            .extend(std::iter::repeat(0).take((target - self.scale) as usize));
        padded.scale = target;
        padded
    }

    /// Zero-pad to `digits` significant digits. Never lossy; a value that
    /// already has at least that many is returned unchanged.
    pub fn pad_to_significant_digits(&self, digits: u32) -> Self {
        let current = self.significant_digits();
        if digits <= current {
            return self.clone();
        }
        let extra = (digits - current) as i32;
        if self.is_zero() {
            return Self {
                scale: self.fractional_digits() as i32 + extra,
                ..self.clone()
            };
        }
        let mut padded = self.clone();
        padded
            .coefficient
            .extend(std::iter::repeat(0).take(extra as usize));
        padded.scale += extra;
        padded
    }

    /// Drop trailing fractional zeros while more than `min_digits` remain.
    pub fn trim_fraction_zeros(&self, min_digits: u32) -> Self {
        let floor = min_digits as i32;
        let mut trimmed = self.clone();
        if trimmed.is_zero() {
            trimmed.scale = trimmed.scale.min(floor).max(0);
            return trimmed;
        }
        while trimmed.scale > floor && trimmed.coefficient.last() == Some(&0) {
            trimmed.coefficient.pop();
            trimmed.scale -= 1;
        }
        trimmed
    }

    /// Drop trailing fractional zeros while more than `min_digits`
    /// significant digits remain.
    pub fn trim_significant_zeros(&self, min_digits: u32) -> Self {
        let mut trimmed = self.clone();
        while trimmed.scale > 0 && trimmed.significant_digits() > min_digits {
            if trimmed.is_zero() {
                trimmed.scale -= 1;
            } else if trimmed.coefficient.last() == Some(&0) {
                trimmed.coefficient.pop();
                trimmed.scale -= 1;
            } else {
                break;
            }
        }
        trimmed
    }

    fn cmp_magnitude(&self, other: &Self) -> Ordering {
        match (self.is_zero(), other.is_zero()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => {
                let by_exponent = self.magnitude().cmp(&other.magnitude());
                if by_exponent != Ordering::Equal {
                    return by_exponent;
                }
                let len = self.coefficient.len().max(other.coefficient.len());
                (0..len)
                    .map(|i| {
                        let a = self.coefficient.get(i).copied().unwrap_or(0);
                        let b = other.coefficient.get(i).copied().unwrap_or(0);
                        a.cmp(&b)
                    })
                    .find(|ord| *ord != Ordering::Equal)
                    .unwrap_or(Ordering::Equal)
            }
        }
    }
}

// ============================================================================
// Trait Implementations
// ============================================================================

impl Default for DecimalValue {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<i64> for DecimalValue {
    fn from(value: i64) -> Self {
        let coefficient: Digits = value
            .unsigned_abs()
            .to_string()
            .bytes()
            .map(|b| b - b'0')
            .collect();
        Self::from_parts(value < 0, coefficient, 0)
    }
}

impl TryFrom<f64> for DecimalValue {
    type Error = AmountError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::from_f64(value)
    }
}

impl From<rust_decimal::Decimal> for DecimalValue {
    fn from(value: rust_decimal::Decimal) -> Self {
        let coefficient: Digits = value
            .mantissa()
            .unsigned_abs()
            .to_string()
            .bytes()
            .map(|b| b - b'0')
            .collect();
        Self::from_parts(value.is_sign_negative(), coefficient, value.scale() as i32)
    }
}

/// Numeric equality: `1.5 == 1.50` and `-0 == 0`.
impl PartialEq for DecimalValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for DecimalValue {}

impl PartialOrd for DecimalValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DecimalValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.is_negative(), other.is_negative()) {
            (false, true) => Ordering::Greater,
            (true, false) => Ordering::Less,
            (false, false) => self.cmp_magnitude(other),
            (true, true) => other.cmp_magnitude(self),
        }
    }
}

impl Hash for DecimalValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Hash the canonical form so numerically equal values collide
        if self.is_zero() {
            0u8.hash(state);
            return;
        }
        let significant = self
            .coefficient
            .iter()
            .rposition(|&d| d != 0)
            .map_or(1, |last| last + 1);
        self.negative.hash(state);
        self.magnitude().hash(state);
        self.coefficient[..significant].hash(state);
    }
}

impl Neg for DecimalValue {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self {
            negative: !self.negative,
            ..self
        }
    }
}

// ============================================================================
// Display and Debug
// ============================================================================

impl fmt::Display for DecimalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits: String = self
            .coefficient
            .iter()
            .map(|&d| char::from(b'0' + d))
            .collect();

        if self.negative {
            f.write_str("-")?;
        }

        if self.scale <= 0 {
            f.write_str(&digits)?;
            if !self.is_zero() {
                for _ in 0..self.scale.unsigned_abs() {
                    f.write_str("0")?;
                }
            }
            return Ok(());
        }

        let scale = self.scale as usize;
        if digits.len() > scale {
            let (int_part, frac_part) = digits.split_at(digits.len() - scale);
            write!(f, "{int_part}.{frac_part}")
        } else {
            write!(f, "0.{:0>width$}", digits, width = scale)
        }
    }
}

impl fmt::Debug for DecimalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DecimalValue({self}, scale={})", self.scale)
    }
}

// ============================================================================
// String Parsing
// ============================================================================

impl FromStr for DecimalValue {
    type Err = AmountError;

    /// Parse `[+-]digits[.digits][(e|E)[+-]digits]`.
    ///
    /// # Examples
    /// - "123.456" -> 6 significant, 3 fractional digits
    /// - "0.050" -> 2 significant, 3 fractional digits
    /// - "1.5e3" -> 2 significant digits, renders "1500"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AmountError::validation(format!("invalid decimal input: {s:?}"));

        let trimmed = s.trim();
        let (negative, unsigned) = if let Some(rest) = trimmed.strip_prefix('-') {
            (true, rest)
        } else if let Some(rest) = trimmed.strip_prefix('+') {
            (false, rest)
        } else {
            (false, trimmed)
        };

        let (mantissa, exponent) = match unsigned.find(['e', 'E']) {
            Some(pos) => {
                let exp: i32 = unsigned[pos + 1..].parse().map_err(|_| invalid())?;
                (&unsigned[..pos], exp)
            }
            None => (unsigned, 0),
        };

        let (int_part, frac_part) = match mantissa.find('.') {
            Some(pos) => (&mantissa[..pos], &mantissa[pos + 1..]),
            None => (mantissa, ""),
        };

        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid());
        }
        if !int_part
            .bytes()
            .chain(frac_part.bytes())
            .all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }

        let scale = i32::try_from(frac_part.len())
            .ok()
            .and_then(|frac| frac.checked_sub(exponent))
            .filter(|scale| scale.abs() <= MAX_SCALE_MAGNITUDE)
            .ok_or_else(invalid)?;

        let coefficient: Digits = int_part
            .bytes()
            .chain(frac_part.bytes())
            .map(|b| b - b'0')
            .collect();

        Ok(Self::from_parts(negative, coefficient, scale))
    }
}

// ============================================================================
// Serde (string form, so no digit is ever lost to a float)
// ============================================================================

#[cfg(feature = "serde")]
impl serde::Serialize for DecimalValue {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for DecimalValue {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Tests
// ============================================================================
