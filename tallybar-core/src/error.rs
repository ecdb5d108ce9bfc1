//! Core error types for Tallybar.

use thiserror::Error;

/// Core error type for Tallybar operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Provider not found or not registered.
    #[error("Provider not found: {0}")]
    ProviderNotFound(String),

    /// Invalid data from a provider response.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Stored session could not be cleared.
    #[error("Session error: {0}")]
    Session(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}
