// src/error.rs

//! Unified error handling for the crawler application.

use std::fmt;

use thiserror::Error;

/// Result type alias for crawler operations.
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

    /// Remote service signalled the client is requesting too fast (HTTP 429)
    #[error("Throttled by remote service: {0}")]
    Throttled(String),

    /// Response decoded but did not have the expected shape
    #[error("Malformed response for {context}: {message}")]
    Malformed { context: String, message: String },

    /// Unrecoverable startup failure (no index obtainable)
    #[error("Startup error: {0}")]
    Startup(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Create a throttle error.
    pub fn throttled(message: impl Into<String>) -> Self {
        Self::Throttled(message.into())
    }

    /// Create a malformed-response error with context.
    pub fn malformed(context: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Malformed {
            context: context.into(),
            message: message.to_string(),
        }
    }

    /// Create a startup error.
    pub fn startup(message: impl Into<String>) -> Self {
        Self::Startup(message.into())
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Whether retrying the same request could plausibly succeed.
    ///
    /// Throttling and transport-level failures are transient; a payload that
    /// decoded into the wrong shape will decode into the wrong shape again.
    pub fn retryable(&self) -> bool {
        match self {
            Self::Throttled(_) => true,
            Self::Http(e) => {
                e.is_timeout()
                    || e.is_connect()
                    || e.is_request()
                    || e.status().is_some_and(|s| s.is_server_error())
            }
            _ => false,
        }
    }
}
