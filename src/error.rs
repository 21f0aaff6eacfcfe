//! Error types for mockgate

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using mockgate's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for mockgate
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The gateway artifact could not be read
    #[error("Artifact unavailable: {}: {}", path.display(), source)]
    Artifact {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// WebSocket transport error
    #[error("Socket error: {0}")]
    Socket(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Unauthorized access
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}

impl Error {
    /// Check if error means the peer went away
    pub fn is_disconnect(&self) -> bool {
        matches!(self, Error::Socket(_))
    }
}

impl From<axum::Error> for Error {
    fn from(err: axum::Error) -> Self {
        Error::Socket(err.to_string())
    }
}
