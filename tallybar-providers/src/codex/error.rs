//! Codex-specific error types.

use thiserror::Error;

/// Errors specific to Codex auth-file handling.
#[derive(Debug, Error)]
pub enum CodexError {
    /// Auth file not found.
    #[error("Auth file not found: {0}")]
    AuthNotFound(String),

    /// Invalid auth file format.
    #[error("Invalid auth file: {0}")]
    InvalidAuth(String),

    /// JWT decode error.
    #[error("JWT decode error: {0}")]
    JwtError(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for CodexError {
    fn from(e: serde_json::Error) -> Self {
        CodexError::InvalidAuth(e.to_string())
    }
}
