//! Error types for mythly.

use thiserror::Error;

/// Errors returned by every mythly operation.
#[derive(Debug, Error)]
pub enum MythlyError {
    /// The content document could not be parsed or failed validation.
    #[error("Content error: {0}")]
    Content(String),

    /// A read or write against the local store failed.
    #[error("Database error: {0}")]
    Database(String),

    /// The requested record does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Configuration could not be read, written or resolved.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A failure a screen model already turned into a message.
    #[error("{0}")]
    Reported(String),

    /// Filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failure while formatting output.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MythlyError {
    /// Wrap a `rusqlite` error with a short description of what was attempted.
    #[must_use]
    pub fn database(context: &str, err: &rusqlite::Error) -> Self {
        Self::Database(format!("{context}: {err}"))
    }
}
