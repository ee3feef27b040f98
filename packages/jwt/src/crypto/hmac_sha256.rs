//! HMAC-SHA256 signing and constant-time verification

use crate::error::{JwtError, JwtResult};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Length in bytes of an HS256 digest
pub const DIGEST_LEN: usize = 32;

/// Raw HS256 digest
pub type Digest = [u8; DIGEST_LEN];

/// Compute HMAC-SHA256 of `message` under `secret`.
#[inline]
pub fn sign(secret: &[u8], message: &[u8]) -> JwtResult<Digest> {
    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| JwtError::invalid_key(format!("HMAC key rejected: {e}")))?;
    mac.update(message);
    let mut digest = [0u8; DIGEST_LEN];
    digest.copy_from_slice(&mac.finalize().into_bytes());
    Ok(digest)
}

/// Recompute the digest and compare it against `digest` in constant time.
///
/// A digest of the wrong length never matches. The comparison itself does
/// not short-circuit on the first differing byte.
pub fn verify(secret: &[u8], message: &[u8], digest: &[u8]) -> JwtResult<bool> {
    let expected = sign(secret, message)?;
    if digest.len() != DIGEST_LEN {
        return Ok(false);
    }
    Ok(bool::from(expected[..].ct_eq(digest)))
}
