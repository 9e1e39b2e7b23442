//! Error types for phone XML parsing

use thiserror::Error;

/// Errors that can occur while decoding a phone's XML reply
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The reply body was empty or contained only whitespace
    #[error("Empty XML document")]
    EmptyDocument,

    /// The reply body was not well-formed XML
    #[error("Malformed XML: {0}")]
    MalformedXml(String),
}

/// Result type alias for parsing operations
pub type ParseResult<T> = Result<T, ParseError>;
