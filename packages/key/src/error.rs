//! Error handling for secure store backends

use thiserror::Error;

/// Secure store errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Storage backend rejected or failed an operation
    #[error("Storage backend error: {operation} failed - {details}")]
    Backend {
        /// The storage operation that failed
        operation: String,
        /// Detailed error information
        details: String,
    },

    /// Storage backend is unreachable or locked
    #[error("Storage temporarily unavailable: {reason}")]
    Unavailable {
        /// Reason for unavailability
        reason: String,
    },

    /// Stored bytes could not be decoded
    #[error("Invalid stored data: {0}")]
    InvalidData(String),

    /// Operation did not finish within the caller's deadline
    #[error("Storage {operation} timed out after {after_ms}ms")]
    Timeout {
        /// The storage operation that timed out
        operation: String,
        /// Deadline in milliseconds
        after_ms: u64,
    },
}

impl StoreError {
    /// Create a backend error for `operation`
    pub fn backend(operation: impl Into<String>, details: impl Into<String>) -> Self {
        Self::Backend {
            operation: operation.into(),
            details: details.into(),
        }
    }

    /// Create an unavailable error
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }
}

impl StoreError {
    /// Create a timeout error for `operation`
    pub fn timeout(operation: impl Into<String>, after_ms: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            after_ms,
        }
    }
}

/// Result type for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;
