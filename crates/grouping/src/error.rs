use thiserror::Error;

/// Result type for grouping operations
pub type Result<T> = std::result::Result<T, GroupingError>;

/// Errors that can occur around a grouping run
///
/// The grouping algorithms themselves never fail; these cover configuration
/// checks and the file-backed helpers (stop-word lists).
#[derive(Error, Debug)]
pub enum GroupingError {
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON document
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GroupingError {
    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
