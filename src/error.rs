// src/error.rs

//! Unified error handling for the Afropedia client.

use std::fmt;

use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Transport-level HTTP failure (connect, timeout, TLS)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("{message} (HTTP {status})")]
    Api { status: u16, message: String },

    /// Backend answered 404
    #[error("Not found: {0}")]
    NotFound(String),

    /// Backend answered 401, or no session token was available
    #[error("Authentication required: {0}")]
    Unauthorized(String),

    /// Response body did not have the expected shape
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Client-side form validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create an API status error.
    pub fn api(status: u16, message: impl fmt::Display) -> Self {
        Self::Api {
            status,
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create an invalid-data error with context.
    pub fn invalid_data(context: impl fmt::Display, message: impl fmt::Display) -> Self {
        Self::InvalidData(format!("{context}: {message}"))
    }

    /// HTTP status associated with this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::NotFound(_) => Some(404),
            Self::Unauthorized(_) => Some(401),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Human-readable message without the variant prefix, for alerts.
    pub fn user_message(&self) -> String {
        match self {
            Self::Api { message, .. }
            | Self::NotFound(message)
            | Self::Unauthorized(message)
            | Self::InvalidData(message)
            | Self::Validation(message)
            | Self::Config(message) => message.clone(),
            other => other.to_string(),
        }
    }
}
