//! JWT error types

use thiserror::Error;

/// JWT operation result type
pub type JwtResult<T> = Result<T, JwtError>;

/// Errors raised while encoding, decoding or verifying a session token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JwtError {
    /// Structural problem: wrong segment count, empty segment, bad base64url
    #[error("Malformed token: {0}")]
    MalformedToken(String),
    /// Header or claims bytes are not the expected JSON shape
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),
    /// Recomputed digest does not match the token signature
    #[error("Invalid JWT signature")]
    InvalidSignature,
    /// Secret could not be used as an HMAC key
    #[error("Invalid key: {0}")]
    InvalidKey(String),
}

impl JwtError {
    /// Create a malformed token error
    #[inline]
    #[must_use]
    pub fn malformed_token(msg: impl Into<String>) -> Self {
        JwtError::MalformedToken(msg.into())
    }

    /// Create a malformed payload error
    #[inline]
    #[must_use]
    pub fn malformed_payload(msg: impl Into<String>) -> Self {
        JwtError::MalformedPayload(msg.into())
    }

    /// Create an invalid key error
    #[inline]
    #[must_use]
    pub fn invalid_key(msg: impl Into<String>) -> Self {
        JwtError::InvalidKey(msg.into())
    }
}
