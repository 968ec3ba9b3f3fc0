//! Error types for Outpost.

use thiserror::Error;

/// Library-level error type for Outpost operations.
#[derive(Error, Debug)]
pub enum OutpostError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Upstream service unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Outlet store error: {0}")]
    Store(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

impl OutpostError {
    /// Whether the error was caused by the caller's input rather than by the
    /// engine or one of its collaborators.
    pub fn is_caller_error(&self) -> bool {
        matches!(self, OutpostError::InvalidParameter(_))
    }

    /// Whether the error came from the embedding or completion service.
    pub fn is_upstream(&self) -> bool {
        matches!(self, OutpostError::UpstreamUnavailable(_))
    }
}

/// Result type alias for Outpost operations.
pub type Result<T> = std::result::Result<T, OutpostError>;
