//! Error types for the device poller

use thiserror::Error;

/// Errors raised when registering a device for polling.
///
/// Failed ticks are not errors at this level; they are logged and the
/// session keeps its schedule.
#[derive(Debug, Error)]
pub enum PollerError {
    /// The poller was created outside a tokio runtime
    #[error("No tokio runtime available: {0}")]
    NoRuntime(String),

    /// The registration cannot be polled as given
    #[error("Invalid registration: {0}")]
    InvalidRegistration(String),
}

/// Result type alias for poller operations
pub type PollerResult<T> = Result<T, PollerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poller_error_display() {
        let error = PollerError::InvalidRegistration("watched field is empty".to_string());
        assert_eq!(error.to_string(), "Invalid registration: watched field is empty");

        let error = PollerError::NoRuntime("must be called from the context of a Tokio runtime".to_string());
        assert!(error.to_string().starts_with("No tokio runtime available"));
    }
}
