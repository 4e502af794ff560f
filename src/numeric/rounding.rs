// ============================================================================
// Rounding Engine
// Eight rounding policies applied to an exact DecimalValue
// ============================================================================

use super::decimal_value::{DecimalValue, Digits};
use super::errors::AmountError;
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ============================================================================
// Rounding Mode
// ============================================================================

/// Rounding policy applied when digits are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase")
)]
pub enum RoundingMode {
    /// Toward +∞ whenever a nonzero digit is discarded
    Ceil,
    /// Toward −∞ whenever a nonzero digit is discarded
    Floor,
    /// Away from zero whenever a nonzero digit is discarded
    Expand,
    /// Toward zero (plain truncation)
    Trunc,
    /// Nearest; ties toward +∞
    HalfCeil,
    /// Nearest; ties toward −∞
    HalfFloor,
    /// Nearest; ties to an even last digit
    #[default]
    HalfEven,
    /// Nearest; ties away from zero
    HalfExpand,
}

impl RoundingMode {
    /// Every mode, in declaration order.
    pub const ALL: [RoundingMode; 8] = [
        RoundingMode::Ceil,
        RoundingMode::Floor,
        RoundingMode::Expand,
        RoundingMode::Trunc,
        RoundingMode::HalfCeil,
        RoundingMode::HalfFloor,
        RoundingMode::HalfEven,
        RoundingMode::HalfExpand,
    ];

    /// The option-string name of this mode.
    pub const fn as_str(self) -> &'static str {
        match self {
            RoundingMode::Ceil => "ceil",
            RoundingMode::Floor => "floor",
            RoundingMode::Expand => "expand",
            RoundingMode::Trunc => "trunc",
            RoundingMode::HalfCeil => "halfCeil",
            RoundingMode::HalfFloor => "halfFloor",
            RoundingMode::HalfEven => "halfEven",
            RoundingMode::HalfExpand => "halfExpand",
        }
    }
}

impl fmt::Display for RoundingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoundingMode {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RoundingMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| AmountError::validation(format!("unknown rounding mode: {s:?}")))
    }
}

// ============================================================================
// Tail Classification
// ============================================================================

/// Shape of the discarded digit tail relative to one unit of the last kept
/// digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TailShape {
    /// Every discarded digit is zero
    Zero,
    /// Nonzero, strictly less than half
    BelowHalf,
    /// Exactly half: a 5 followed only by zeros
    Half,
    /// Strictly more than half
    AboveHalf,
}

impl TailShape {
    /// Classify a discarded tail that is preceded by
    /// `implicit_leading_zeros` zero digits not present in `tail`.
    pub fn classify(tail: &[u8], implicit_leading_zeros: usize) -> Self {
        let any_nonzero = |digits: &[u8]| digits.iter().any(|&d| d != 0);

        if implicit_leading_zeros > 0 {
            return if any_nonzero(tail) {
                TailShape::BelowHalf
            } else {
                TailShape::Zero
            };
        }

        match tail.split_first() {
            None => TailShape::Zero,
            Some((&first, rest)) => match first {
                0 if !any_nonzero(rest) => TailShape::Zero,
                0..=4 => TailShape::BelowHalf,
                5 if !any_nonzero(rest) => TailShape::Half,
                _ => TailShape::AboveHalf,
            },
        }
    }
}

/// Decide whether the kept digits must be incremented in magnitude.
///
/// This is the single dispatch point for every rounding mode: it sees only
/// the tail shape, the sign, and the parity of the last kept digit.
pub fn rounds_up(mode: RoundingMode, tail: TailShape, negative: bool, last_kept_odd: bool) -> bool {
    if tail == TailShape::Zero {
        return false;
    }
    match mode {
        RoundingMode::Ceil => !negative,
        RoundingMode::Floor => negative,
        RoundingMode::Expand => true,
        RoundingMode::Trunc => false,
        RoundingMode::HalfCeil
        | RoundingMode::HalfFloor
        | RoundingMode::HalfEven
        | RoundingMode::HalfExpand => match tail {
            TailShape::Zero | TailShape::BelowHalf => false,
            TailShape::AboveHalf => true,
            TailShape::Half => match mode {
                RoundingMode::HalfCeil => !negative,
                RoundingMode::HalfFloor => negative,
                RoundingMode::HalfEven => last_kept_odd,
                _ => true,
            },
        },
    }
}

// ============================================================================
// Rounding Operations
// ============================================================================

/// Round to exactly `digits` fractional digits.
///
/// Values with fewer fractional digits are zero-padded instead; no rounding
/// mode is consulted for them.
pub fn round_to_fraction_digits(value: &DecimalValue, digits: u32, mode: RoundingMode) -> DecimalValue {
    let target = digits as i32;
    if value.scale() <= target {
        return value.pad_to_fraction_digits(digits);
    }
    discard_low_digits(value, (value.scale() - target) as usize, mode)
}

/// Round to exactly `digits` significant digits (`digits >= 1`).
///
/// A carry out of the leading digit (`9.96` → `10.0`) shifts the scale so the
/// result still has `digits` significant digits (`10`).
pub fn round_to_significant_digits(
    value: &DecimalValue,
    digits: u32,
    mode: RoundingMode,
) -> DecimalValue {
    let digits = digits.max(1);
    let current = value.significant_digits();
    if current <= digits {
        return value.pad_to_significant_digits(digits);
    }
    if value.is_zero() {
        // Zero only shrinks by dropping fractional zeros
        return round_to_fraction_digits(value, digits - 1, mode);
    }

    let rounded = discard_low_digits(value, (current - digits) as usize, mode);
    if rounded.significant_digits() > digits {
        // The carry produced one extra (zero) digit; fold it into the scale
        let mut coefficient: Digits = rounded.coefficient().iter().copied().collect();
        coefficient.pop();
        DecimalValue::from_parts(rounded.is_sign_negative(), coefficient, rounded.scale() - 1)
    } else {
        rounded
    }
}

/// Drop the `count` lowest coefficient digits, rounding the rest per `mode`.
fn discard_low_digits(value: &DecimalValue, count: usize, mode: RoundingMode) -> DecimalValue {
    let coefficient = value.coefficient();
    let (kept, tail, implicit_zeros) = if count <= coefficient.len() {
        let split = coefficient.len() - count;
        (&coefficient[..split], &coefficient[split..], 0)
    } else {
        (&coefficient[..0], coefficient, count - coefficient.len())
    };

    let shape = TailShape::classify(tail, implicit_zeros);
    let last_kept_odd = kept.last().is_some_and(|d| d % 2 == 1);
    let negative = value.is_sign_negative();

    let mut digits: Digits = kept.iter().copied().collect();
    if rounds_up(mode, shape, negative, last_kept_odd) {
        increment(&mut digits);
    }

    DecimalValue::from_parts(negative, digits, value.scale() - count as i32)
}

/// Add one unit in the last place, propagating the carry.
fn increment(digits: &mut Digits) {
    for digit in digits.iter_mut().rev() {
        if *digit == 9 {
            *digit = 0;
        } else {
            *digit += 1;
            return;
        }
    }
    digits.insert(0, 1);
}

// ============================================================================
// Tests
// ============================================================================
