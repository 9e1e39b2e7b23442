use cuipp_client::PhoneError;
use cuipp_poller::PollerError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Phone error: {0}")]
    Phone(#[from] PhoneError),

    #[error("Poller error: {0}")]
    Poller(#[from] PollerError),

    #[error("Phone not registered: {0}")]
    UnknownPhone(String),

    #[error("No action named '{action}' on phone {host}")]
    UnknownAction { host: String, action: String },

    #[error("Background exchange failed: {0}")]
    Task(String),
}

pub type BridgeResult<T> = Result<T, BridgeError>;
