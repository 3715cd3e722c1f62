//! Error types for pocketdesk.

use thiserror::Error;

/// Errors that can occur in pocketdesk operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown calculator button: '{0}'")]
    InvalidButton(String),

    #[error("Invalid date '{0}'. Expected {1}")]
    InvalidDate(String, &'static str),

    #[error("Event store is no longer running")]
    StoreClosed,

    #[error("Backend error: {0}")]
    Backend(String),
}

/// Result type alias for pocketdesk operations.
pub type Result<T> = std::result::Result<T, Error>;
