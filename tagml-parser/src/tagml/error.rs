//! Error types for parsing and tree operations
//!
//!     Every structural failure is the same error kind: a descriptive message
//!     plus, when one is at hand, the offending line's text. There is no
//!     recovery; the first violation aborts the parse and no partial tree is
//!     returned.

use std::fmt;

/// The single error kind for parse and tree failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    message: String,
    line: Option<String>,
}

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        ParseError {
            message: message.into(),
            line: None,
        }
    }

    /// Attach the offending line's text to the message.
    pub fn with_line(message: impl Into<String>, line: impl Into<String>) -> Self {
        ParseError {
            message: message.into(),
            line: Some(line.into()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn line(&self) -> Option<&str> {
        self.line.as_deref()
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.line {
            Some(line) => write!(f, "{}: {:?}", self.message, line),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for ParseError {}

impl From<std::io::Error> for ParseError {
    fn from(err: std::io::Error) -> Self {
        ParseError::new(format!("IO error: {}", err))
    }
}

/// Type alias for results returned throughout the parser.
pub type ParseResult<T> = Result<T, ParseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_without_line() {
        let err = ParseError::new("no closing bracket found");
        assert_eq!(format!("{}", err), "no closing bracket found");
    }

    #[test]
    fn test_display_with_line() {
        let err = ParseError::with_line("incorrect indent", "  oops\n");
        assert_eq!(format!("{}", err), "incorrect indent: \"  oops\\n\"");
        assert_eq!(err.line(), Some("  oops\n"));
    }

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: ParseError = io.into();
        assert!(err.message().starts_with("IO error"));
    }
}
