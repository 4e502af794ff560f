// ============================================================================
// Amount Errors
// Error kinds raised by construction, rounding, conversion and rendering
// ============================================================================

/// Errors raised by amount operations.
///
/// Every operation either returns a fully-formed value or one of these; no
/// operation leaves partially-updated state behind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    /// Malformed or conflicting options, or unparseable input
    #[error("validation error: {0}")]
    Validation(String),

    /// No conversion path exists between the requested units
    #[error("unsupported conversion: {0}")]
    UnsupportedConversion(String),

    /// The renderer cannot produce text for the unit/locale pairing
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A digit-count field is outside its declared domain
    #[error("{field} out of range: {value} is not within {min}..={max}")]
    Range {
        field: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },
}

impl AmountError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        AmountError::Validation(message.into())
    }

    pub(crate) fn unsupported_conversion(message: impl Into<String>) -> Self {
        AmountError::UnsupportedConversion(message.into())
    }

    pub(crate) fn unsupported_format(message: impl Into<String>) -> Self {
        AmountError::UnsupportedFormat(message.into())
    }

    /// Check `value` against an inclusive range, naming the offending field.
    pub(crate) fn check_range(field: &'static str, value: u32, min: u32, max: u32) -> AmountResult<u32> {
        if value < min || value > max {
            Err(AmountError::Range {
                field,
                value,
                min,
                max,
            })
        } else {
            Ok(value)
        }
    }
}

/// Result type alias for amount operations
pub type AmountResult<T> = Result<T, AmountError>;
