//! Error types for notepage.

use thiserror::Error;

/// Result type alias using notepage's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for notepage operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Invalid input (pagination bounds)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Cursor decoded cleanly but carries a version this server cannot resume.
    #[error("Unsupported cursor version: {0}. Expected version {expected}.", expected = crate::cursor::CURSOR_VERSION)]
    UnsupportedCursorVersion(i32),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl Error {
    /// Whether the error was caused by the client's request rather than the server.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidInput(_) | Error::UnsupportedCursorVersion(_)
        )
    }
}
