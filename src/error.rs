//! Error types.
//!
//! Only the codec and configuration loading can fail; the translation core degrades to
//! empty or unchanged results instead of returning errors.

use thiserror::Error;

use crate::token::Span;

/// PQL text could not be parsed.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
    pub span: Option<Span>,
}

impl ParseError {
    pub(crate) fn new(message: String, span: Option<Span>) -> Self {
        Self { message, span }
    }

    pub(crate) fn at_position(message: String, span: Span) -> Self {
        Self { message, span: Some(span) }
    }
}

/// Configuration could not be loaded.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config file does not exist: {0}")]
    NotFound(String),

    #[error("cannot read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse config file {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ParseError::at_position("Unknown operator 'foo'".to_string(), Span::new(0, 3));
        assert_eq!(err.to_string(), "Unknown operator 'foo'");
        assert_eq!(err.span, Some(Span::new(0, 3)));

        let err = ConfigError::NotFound("pql.json".to_string());
        assert_eq!(err.to_string(), "config file does not exist: pql.json");
    }
}
