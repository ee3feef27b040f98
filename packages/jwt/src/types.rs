//! Token, header, key and decoded-session types

use crate::claims::SessionClaims;
use serde::Serialize;
use zeroize::Zeroizing;

/// The only algorithm this crate signs or accepts
pub const ALGORITHM: &str = "HS256";

/// The only token type this crate emits
pub const TOKEN_TYPE: &str = "JWT";

/// JOSE header. Always `{"alg":"HS256","typ":"JWT"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Header {
    /// Signing algorithm
    pub alg: String,
    /// Token type
    pub typ: String,
}

impl Header {
    /// The fixed HS256 header
    #[must_use]
    pub fn hs256() -> Self {
        Self {
            alg: ALGORITHM.to_string(),
            typ: TOKEN_TYPE.to_string(),
        }
    }
}

impl Default for Header {
    fn default() -> Self {
        Self::hs256()
    }
}

/// Compact serialized token: `header.claims.signature`
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    /// Wrap a compact token string without validating it.
    ///
    /// Validation happens in [`crate::decode`].
    #[must_use]
    pub fn new(compact: impl Into<String>) -> Self {
        Self(compact.into())
    }

    /// The compact string
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the compact string
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for Token {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// Tokens are bearer credentials; keep them out of debug logs.
impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Token({} bytes)", self.0.len())
    }
}

/// Shared HMAC secret, wiped from memory on drop.
#[derive(Clone)]
pub struct SigningKey(Zeroizing<Vec<u8>>);

impl SigningKey {
    /// Wrap raw secret bytes
    #[must_use]
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self(Zeroizing::new(secret.into()))
    }

    /// Secret bytes
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<&str> for SigningKey {
    fn from(secret: &str) -> Self {
        Self::new(secret.as_bytes())
    }
}

impl From<&[u8]> for SigningKey {
    fn from(secret: &[u8]) -> Self {
        Self::new(secret)
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SigningKey(<redacted>)")
    }
}

/// Result of decoding a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedSession {
    /// Decoded header
    pub header: Header,
    /// Decoded claims
    pub claims: SessionClaims,
    /// Whether the signature was checked and matched
    pub signature_verified: bool,
}

impl DecodedSession {
    /// Expiry check against an explicit unix time. Decoding never checks expiry.
    #[inline]
    #[must_use]
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.claims.is_expired_at(now)
    }
}
