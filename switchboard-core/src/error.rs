//! Error types for switchboard operations

use thiserror::Error;

/// Network layer errors raised by the directory source.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NetworkError {
    #[error("Request failed with status {status}: {message}")]
    RequestFailed { status: i32, message: String },

    #[error("Request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Invalid response: {reason}")]
    Decode { reason: String },

    #[error("Directory source unavailable: {reason}")]
    Unavailable { reason: String },
}

/// Storage layer errors raised by the channel store.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("Insert failed: {reason}")]
    InsertFailed { reason: String },

    #[error("Query failed: {reason}")]
    QueryFailed { reason: String },

    #[error("Storage lock poisoned")]
    LockPoisoned,
}

/// Top-level error enum wrapping all switchboard error types.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SwitchboardError {
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Result type alias for switchboard operations.
pub type SwitchboardResult<T> = Result<T, SwitchboardError>;

// =============================================================================
// TESTS
// =============================================================================
