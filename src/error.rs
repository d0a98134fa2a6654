// src/error.rs

//! Unified error handling for the publisher application.

use std::fmt;

use thiserror::Error;

/// Result type alias for publisher operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Server answered with a non-success status that is not worth retrying
    #[error("unexpected status {status} from feed endpoint")]
    Status { status: u16 },

    /// The feed body contained a line that is not a valid envelope
    #[error("malformed feed line {line_no}: {message}")]
    Feed { line_no: usize, message: String },

    /// A successful fetch produced no job records
    #[error("feed returned zero job records; refusing to publish empty output")]
    EmptyFeed,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Fetch gave up after exhausting all retry attempts
    #[error("fetch failed after {attempts} attempts: {last}")]
    RetriesExhausted { attempts: u32, last: String },
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a malformed-feed error for a specific line.
    pub fn feed(line_no: usize, message: impl fmt::Display) -> Self {
        Self::Feed {
            line_no,
            message: message.to_string(),
        }
    }

    /// Whether a fetch attempt that failed with this error may be retried.
    ///
    /// Transport failures and 5xx/429 statuses are transient; everything
    /// else (bad request, malformed line) is permanent. A reset while the
    /// body streams surfaces as a body/decode error, so those count as
    /// transport failures too.
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::Http(e) => e.is_timeout() || e.is_connect() || e.is_body() || e.is_decode(),
            AppError::Status { status } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}
