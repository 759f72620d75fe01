use crate::byte_stream::Location;
use std::fmt::{Display, Formatter};
use thiserror::Error;

/// Parser error that defines an error (message) on the given position
#[derive(Clone, Debug, PartialEq)]
pub struct CssError {
    /// Error message
    pub message: String,
    /// Location of the error, if available (during parsing mostly)
    pub location: Option<Location>,
}

impl CssError {
    #[must_use]
    pub fn new(message: &str) -> Self {
        CssError {
            message: message.to_string(),
            location: None,
        }
    }

    #[must_use]
    pub fn with_location(message: &str, location: Location) -> Self {
        CssError {
            message: message.to_string(),
            location: Some(location),
        }
    }
}

impl Display for CssError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.location {
            Some(location) => write!(f, "{} at {:?}", self.message, location),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Serious errors: misuse of the token accessors and failures of the underlying input
#[derive(Debug, Error)]
pub enum Error {
    #[error("type mismatch: expected {expected}, got {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type CssResult<T> = Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_with_and_without_location() {
        let err = CssError::new("unexpected end of input");
        assert_eq!(err.to_string(), "unexpected end of input");

        let err = CssError::with_location("unexpected end of input", Location::new(3, 7, 20));
        assert_eq!(err.to_string(), "unexpected end of input at (3:7)");
    }

    #[test]
    fn type_mismatch_message() {
        let err = Error::TypeMismatch {
            expected: "NUMBER",
            found: "IDENT",
        };
        assert_eq!(err.to_string(), "type mismatch: expected NUMBER, got IDENT");
    }
}
