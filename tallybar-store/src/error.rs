//! Store error types.

use thiserror::Error;

/// Error type for manager operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No provider registered under the given id.
    #[error("Provider not found: {0}")]
    ProviderNotFound(String),
}
