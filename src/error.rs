//! Error handling module for the booking widget
//!
//! Store validation never produces errors (gates are booleans). Everything
//! layered on top of the store - the wire layer, the API client, the session
//! driver and the CLI - reports failures through `BookingError`.

use thiserror::Error;

/// Main error type for the booking widget
#[derive(Error, Debug)]
pub enum BookingError {
    /// IO errors (config and plan files)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors (loading, validation)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation errors surfaced to the user (missing fields, bad selection)
    #[error("Validation error: {0}")]
    Validation(String),

    /// The booking API answered with a non-success status
    #[error("Error {status}: {message}")]
    Api { status: u16, message: String },

    /// The booking API could not be reached
    #[error("No response received from the server: {0}")]
    Transport(String),

    /// Malformed textual input (dates, clock times)
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Result type alias for booking operations
pub type Result<T> = std::result::Result<T, BookingError>;

impl BookingError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an API status error
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Whether the user may simply retry the same action.
    ///
    /// Remote failures are recoverable; validation failures need new input first.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Api { .. } | Self::Transport(_))
    }
}
