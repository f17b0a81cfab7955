//! Error types for the model test console.
//!
//! This module provides a unified error type [`TestError`] covering the
//! user-visible failure modes of a test run. Cancellation is intentionally
//! not an error: a stopped run ends in the `Cancelled` status and nothing is
//! surfaced to the user. Per-frame payload parse failures are likewise never
//! converted into errors; malformed frames simply contribute no output text.

use thiserror::Error;

/// Main error type for the console.
#[derive(Error, Debug)]
pub enum TestError {
    /// Pre-flight validation failure (missing token, missing model, empty
    /// prompt). Reported before any network call; the run never starts.
    #[error("validation error: {0}")]
    Validation(String),

    /// A test run is already in progress on this console instance.
    #[error("a test run is already in progress")]
    Busy,

    /// Non-success HTTP status or a network failure that was not an
    /// intentional cancellation.
    #[error("transport error{}: {message}", status.map(|s| format!(" (HTTP {})", s)).unwrap_or_default())]
    Transport {
        status: Option<u16>,
        message: String,
    },

    /// The response declared a streamed body but no readable stream could be
    /// obtained.
    #[error("streamed response body unavailable")]
    StreamUnavailable,

    /// HTTP request errors from the reqwest client
    #[error("HTTP request error: {0}")]
    Request(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl TestError {
    /// Build a transport error from an upstream HTTP status and error body.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        TestError::Transport {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Build a transport error with no associated HTTP status.
    pub fn transport(message: impl Into<String>) -> Self {
        TestError::Transport {
            status: None,
            message: message.into(),
        }
    }
}

/// Convenience type alias for Results using [`TestError`].
pub type Result<T> = std::result::Result<T, TestError>;
