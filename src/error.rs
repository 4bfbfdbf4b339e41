//! Error types for the pitchdrill coaching engine
//!
//! This module provides structured error handling using thiserror for
//! error definitions and anyhow for error propagation at the CLI edge.
//!
//! The deterministic core (evaluator, coach mock, notes pipeline) is total
//! and never returns these errors; they exist for the LLM client, record
//! (de)serialization, and I/O at the boundaries.

use thiserror::Error;

/// Main error type for pitchdrill operations
#[derive(Error, Debug)]
pub enum PitchdrillError {
    /// LLM API request failed
    #[error("LLM API error: {0}")]
    LlmApi(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid record ID format
    #[error("Invalid record ID: {0}")]
    InvalidRecordId(#[from] uuid::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

/// Result type alias for pitchdrill operations
pub type Result<T> = std::result::Result<T, PitchdrillError>;

/// Convert anyhow::Error to PitchdrillError
impl From<anyhow::Error> for PitchdrillError {
    fn from(err: anyhow::Error) -> Self {
        PitchdrillError::Other(err.to_string())
    }
}
