// crates/autosar-cfg-arxml/src/error.rs

use autosar_cfg::ParamError;
use core::fmt;
use core::str::Utf8Error;
use quick_xml::escape::EscapeError;
use quick_xml::Error as XmlError;
use std::io;
use std::string::FromUtf8Error;

/// Errors that can occur while reading, building or writing ARXML.
#[derive(Debug)]
pub enum ArxmlError {
    /// An error from the underlying `quick-xml` reader.
    XmlParsing(XmlError),

    /// An error from the underlying `quick-xml` writer.
    XmlWriting(io::Error),

    /// Element names, text or attribute values were not valid UTF-8.
    Encoding(Utf8Error),

    /// An entity or character reference could not be resolved.
    Escape(EscapeError),

    /// A `&name;` reference other than the predefined XML entities.
    UnknownEntity { name: String },

    /// An element uses a namespace prefix that was never declared.
    UnknownPrefix { prefix: String },

    /// The input is well-formed so far but does not form a document
    /// (no root, several roots, unclosed elements, stray text).
    Malformed { reason: &'static str },

    /// A generator was called with parameters that failed validation.
    InvalidParameters(ParamError),

    /// The module type has no generator yet.
    NotImplemented { module: &'static str },
}

impl From<XmlError> for ArxmlError {
    fn from(e: XmlError) -> Self {
        ArxmlError::XmlParsing(e)
    }
}

impl From<io::Error> for ArxmlError {
    fn from(e: io::Error) -> Self {
        ArxmlError::XmlWriting(e)
    }
}

impl From<Utf8Error> for ArxmlError {
    fn from(e: Utf8Error) -> Self {
        ArxmlError::Encoding(e)
    }
}

impl From<FromUtf8Error> for ArxmlError {
    fn from(e: FromUtf8Error) -> Self {
        ArxmlError::Encoding(e.utf8_error())
    }
}

impl From<EscapeError> for ArxmlError {
    fn from(e: EscapeError) -> Self {
        ArxmlError::Escape(e)
    }
}

impl From<ParamError> for ArxmlError {
    fn from(e: ParamError) -> Self {
        ArxmlError::InvalidParameters(e)
    }
}

impl fmt::Display for ArxmlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArxmlError::XmlParsing(e) => write!(f, "{}", e),
            ArxmlError::XmlWriting(e) => write!(f, "XML writing error: {}", e),
            ArxmlError::Encoding(e) => write!(f, "Invalid UTF-8: {}", e),
            ArxmlError::Escape(e) => write!(f, "{}", e),
            ArxmlError::UnknownEntity { name } => write!(f, "Unknown entity '&{};'", name),
            ArxmlError::UnknownPrefix { prefix } => {
                write!(f, "Namespace prefix '{}' is not defined", prefix)
            }
            ArxmlError::Malformed { reason } => write!(f, "{}", reason),
            ArxmlError::InvalidParameters(e) => write!(f, "Invalid parameters: {}", e),
            ArxmlError::NotImplemented { module } => {
                write!(f, "{} configuration generation is not yet implemented", module)
            }
        }
    }
}

impl std::error::Error for ArxmlError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ArxmlError::XmlParsing(e) => Some(e),
            ArxmlError::XmlWriting(e) => Some(e),
            ArxmlError::Encoding(e) => Some(e),
            ArxmlError::Escape(e) => Some(e),
            ArxmlError::InvalidParameters(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ArxmlError;
    use autosar_cfg::ParamError;

    #[test]
    fn test_from_param_error() {
        let err: ArxmlError = ParamError::MissingField { field: "ecuType" }.into();
        assert!(matches!(err, ArxmlError::InvalidParameters(_)));
        assert_eq!(
            err.to_string(),
            "Invalid parameters: Missing required field: ecuType"
        );
    }

    #[test]
    fn test_from_utf8_error() {
        let bytes = vec![0xC3, 0x28];
        let utf8_err = String::from_utf8(bytes).unwrap_err();
        let err: ArxmlError = utf8_err.into();
        assert!(matches!(err, ArxmlError::Encoding(_)));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::other("sink closed");
        let err: ArxmlError = io_err.into();
        assert!(matches!(err, ArxmlError::XmlWriting(_)));
    }

    #[test]
    fn test_not_implemented_message() {
        let err = ArxmlError::NotImplemented { module: "OS" };
        assert_eq!(
            err.to_string(),
            "OS configuration generation is not yet implemented"
        );
    }
}
