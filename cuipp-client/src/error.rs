//! Error types for the phone transport

use thiserror::Error;

/// Failures moving bytes to or from a phone
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection refused, DNS failure or I/O error
    #[error("Network error: {0}")]
    Network(String),

    /// Connect or read timeout elapsed
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// The phone answered with a non-2xx status
    #[error("HTTP status {0}")]
    Status(u16),

    /// The phone rejected the supplied credentials
    #[error("Authentication rejected by phone")]
    Unauthorized,

    #[error("Reply exceeds {0} bytes")]
    ReplyTooLarge(u64),
}

/// Errors returned by [`crate::PhoneClient`] operations
#[derive(Debug, Error)]
pub enum PhoneError {
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Parse error: {0}")]
    Parse(#[from] cuipp_xml::ParseError),
}

impl PhoneError {
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse(_))
    }
}

/// Result type alias for phone operations
pub type Result<T> = std::result::Result<T, PhoneError>;
