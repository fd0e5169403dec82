//! Error types for JsonQuery.

use crate::value::ValueKind;
use std::fmt;

/// The main error type for JsonQuery operations.
///
/// Every error is detected synchronously while a request is planned or
/// executed, and aborts the whole request.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Malformed request or registration
    Validation(String),

    /// The `from` source is not registered
    NotFound(String),

    /// A selector path does not resolve against the element type
    SelectorResolution {
        /// The full selector as written in the request
        selector: String,
        /// The segment that failed to resolve, with the reason
        segment: String,
    },

    /// Filter operator not in the supported set
    UnsupportedOperator(String),

    /// A literal cannot be converted to the target field kind
    TypeCoercion {
        /// The literal text (or the offending selector for field comparisons)
        literal: String,
        /// The kind the literal had to be converted to
        kind: ValueKind,
    },
}

/// Error category, for callers that branch on the kind of failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`Error::Validation`]
    Validation,
    /// See [`Error::NotFound`]
    NotFound,
    /// See [`Error::SelectorResolution`]
    SelectorResolution,
    /// See [`Error::UnsupportedOperator`]
    UnsupportedOperator,
    /// See [`Error::TypeCoercion`]
    TypeCoercion,
}

impl Error {
    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation(_) => ErrorKind::Validation,
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::SelectorResolution { .. } => ErrorKind::SelectorResolution,
            Error::UnsupportedOperator(_) => ErrorKind::UnsupportedOperator,
            Error::TypeCoercion { .. } => ErrorKind::TypeCoercion,
        }
    }

    pub(crate) fn selector(selector: &str, segment: impl Into<String>) -> Self {
        Error::SelectorResolution {
            selector: selector.to_string(),
            segment: segment.into(),
        }
    }

    pub(crate) fn coercion(literal: &str, kind: ValueKind) -> Self {
        Error::TypeCoercion {
            literal: literal.to_string(),
            kind,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Validation(msg) => write!(f, "Validation error: {}", msg),
            Error::NotFound(name) => write!(f, "Queryable '{}' not found", name),
            Error::SelectorResolution { selector, segment } => {
                write!(f, "Cannot resolve selector '{}': {}", selector, segment)
            }
            Error::UnsupportedOperator(op) => write!(f, "Unknown operator '{}'", op),
            Error::TypeCoercion { literal, kind } => {
                write!(f, "Cannot convert '{}' to {}", literal, kind)
            }
        }
    }
}

impl std::error::Error for Error {}

/// A specialized `Result` type for JsonQuery operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_matches_variant() {
        assert_eq!(
            Error::NotFound("Foo".into()).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            Error::selector("a.b", "no field 'b' on 'A'").kind(),
            ErrorKind::SelectorResolution
        );
        assert_eq!(
            Error::coercion("abc", ValueKind::Integer).kind(),
            ErrorKind::TypeCoercion
        );
    }

    #[test]
    fn test_display_names_offending_input() {
        let err = Error::coercion("abc", ValueKind::Integer);
        assert_eq!(err.to_string(), "Cannot convert 'abc' to Integer");

        let err = Error::UnsupportedOperator("LIKE".into());
        assert!(err.to_string().contains("LIKE"));
    }
}
