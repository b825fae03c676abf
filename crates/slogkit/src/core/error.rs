//! Error types for slogkit

use std::error::Error as StdError;
use std::io;

/// Result type for logging operations
pub type LogResult<T> = Result<T, LogError>;

/// Errors surfaced by handlers, sinks and configuration.
///
/// [`Handler::handle`](crate::Handler::handle) returns only the sink's
/// failures: [`LogError::Io`] when the write fails, [`LogError::Encode`] or
/// [`LogError::Time`] when the line cannot be formatted. Extraction failures
/// and caller-location misses are recovered inside the handler.
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    /// Writing a formatted record failed
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Unparsable level string
    #[error("Invalid filter: {0}")]
    Filter(String),

    /// Record could not be encoded as JSON
    #[error("Encode error: {0}")]
    Encode(#[from] serde_json::Error),

    /// Record timestamp could not be formatted
    #[error("Time format error: {0}")]
    Time(#[from] time::error::Format),
}

/// Failure reported by a [`ContextExtractor`](crate::ContextExtractor).
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct ExtractError {
    message: String,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl ExtractError {
    /// Create an error from a message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Create an error that wraps an underlying cause
    pub fn with_source(
        message: impl Into<String>,
        source: impl Into<Box<dyn StdError + Send + Sync>>,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Human-readable message
    pub fn message(&self) -> &str {
        &self.message
    }
}
