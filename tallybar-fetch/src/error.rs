//! Fetch error types.

use std::time::Duration;
use thiserror::Error;

// ============================================================================
// Main Fetch Error
// ============================================================================

/// Error type for fetch operations.
///
/// Most variants are stage-local: the pipeline swallows them and moves
/// on to the next strategy. [`FetchError::LoginRequired`] is terminal -
/// no amount of falling back will help an unauthenticated user.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Operation timed out.
    #[error("Timed out after {0} seconds")]
    Timeout(u64),

    /// Authentication is required before any data can be fetched.
    #[error("Login required: {0}")]
    LoginRequired(String),

    /// Invalid or unparseable response from the tool.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Core error.
    #[error("Core error: {0}")]
    Core(#[from] tallybar_core::CoreError),

    /// Subprocess error.
    #[error("Process error: {0}")]
    Process(#[from] ProcessError),

    /// RPC probe error.
    #[error("RPC error: {0}")]
    Rpc(#[from] RpcError),

    /// Strategy not available.
    #[error("Strategy not available: {0}")]
    StrategyNotAvailable(String),

    /// All strategies failed.
    #[error("All strategies failed")]
    AllStrategiesFailed,
}

// ============================================================================
// Process Error
// ============================================================================

/// Error type for subprocess operations.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Command not found on PATH.
    #[error("Command not found: {0}")]
    NotFound(String),

    /// Command execution failed.
    #[error("Execution failed: {0}")]
    ExecutionFailed(String),

    /// Command timed out.
    #[error("Command timed out after {0:?}")]
    Timeout(Duration),

    /// Non-zero exit code.
    #[error("Command exited with code {code}: {stderr}")]
    NonZeroExit {
        /// Exit code from the process.
        code: i32,
        /// Standard error output.
        stderr: String,
    },

    /// Output exceeded the configured capture limit.
    #[error("Command output exceeded {limit} bytes")]
    OutputTooLarge {
        /// The capture limit that was exceeded.
        limit: usize,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// ============================================================================
// RPC Error
// ============================================================================

/// Error type for the JSON-RPC subprocess probe.
#[derive(Debug, Error)]
pub enum RpcError {
    /// Command not found on PATH.
    #[error("Command not found: {0}")]
    NotFound(String),

    /// Failed to spawn the subprocess.
    #[error("Failed to spawn: {0}")]
    SpawnFailed(String),

    /// No valid response line within the timeout.
    #[error("RPC timed out after {0:?}")]
    Timeout(Duration),

    /// Subprocess exited before any valid line appeared.
    #[error("RPC subprocess closed without a response")]
    ClosedWithoutResponse,

    /// IO error on the child's streams.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
