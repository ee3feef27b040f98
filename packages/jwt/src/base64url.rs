//! Unpadded URL-safe base64 (RFC 7515 section 2)

use crate::error::{JwtError, JwtResult};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};

/// Encode bytes with the URL-safe alphabet and no trailing `=`.
#[inline]
#[must_use]
pub fn encode(input: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(input)
}

/// Decode an unpadded URL-safe base64 string.
///
/// Padding characters, characters outside the `A-Za-z0-9-_` alphabet,
/// impossible lengths and non-zero trailing bits are all rejected.
pub fn decode(input: &str) -> JwtResult<Vec<u8>> {
    URL_SAFE_NO_PAD
        .decode(input)
        .map_err(|e| JwtError::malformed_token(format!("invalid base64url segment: {e}")))
}
