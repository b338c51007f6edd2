// crates/autosar-cfg/src/error.rs

use alloc::string::String;
use core::fmt;

/// Errors raised while turning a caller's request into a typed parameter record.
///
/// Every variant is produced before any document is built, so a caller never
/// receives a partially generated configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamError {
    /// A required request field was not supplied.
    MissingField { field: &'static str },

    /// A numeric field is outside its allowed range.
    OutOfRange {
        field: &'static str,
        value: String,
        range: String,
    },

    /// A string field does not name one of the supported variants.
    UnknownVariant { field: &'static str, value: String },
}

impl fmt::Display for ParamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamError::MissingField { field } => write!(f, "Missing required field: {}", field),
            ParamError::OutOfRange {
                field,
                value,
                range,
            } => write!(
                f,
                "Field '{}' has value {} outside the allowed range {}",
                field, value, range
            ),
            ParamError::UnknownVariant { field, value } => {
                write!(f, "Field '{}' has unsupported value '{}'", field, value)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParamError {}
