//! Caller-facing error type for session lifecycle operations

use thiserror::Error;
use tokenkeep_jwt::JwtError;
use tokenkeep_key::StoreError;

/// Session operation result type
pub type SessionResult<T> = Result<T, SessionError>;

/// Errors surfaced by [`crate::SessionManager`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Token is structurally invalid
    #[error("Malformed token: {0}")]
    MalformedToken(String),

    /// Token claims or header have the wrong shape
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// Token signature does not match
    #[error("Invalid token signature")]
    InvalidSignature,

    /// Secure store failed or timed out
    #[error("Secure store unavailable during {operation}: {reason}")]
    StoreUnavailable {
        /// Store operation that failed
        operation: &'static str,
        /// Failure details
        reason: String,
    },

    /// Signing key could not be used
    #[error("Invalid signing key: {0}")]
    InvalidKey(String),

    /// Configuration rejected
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl SessionError {
    /// True for errors produced by decoding a token
    #[must_use]
    pub fn is_codec_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedToken(_) | Self::MalformedPayload(_) | Self::InvalidSignature
        )
    }

    pub(crate) fn store(operation: &'static str, error: &StoreError) -> Self {
        Self::StoreUnavailable {
            operation,
            reason: error.to_string(),
        }
    }
}

impl From<JwtError> for SessionError {
    fn from(error: JwtError) -> Self {
        match error {
            JwtError::MalformedToken(msg) => Self::MalformedToken(msg),
            JwtError::MalformedPayload(msg) => Self::MalformedPayload(msg),
            JwtError::InvalidSignature => Self::InvalidSignature,
            JwtError::InvalidKey(msg) => Self::InvalidKey(msg),
        }
    }
}
