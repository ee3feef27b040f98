//! HS256 session token codec
//!
//! This crate provides:
//! - Unpadded URL-safe base64 ([`base64url`])
//! - Canonical JSON for header and claims segments ([`canonical`])
//! - HMAC-SHA256 signing with constant-time verification ([`crypto::hmac_sha256`])
//! - Compact three-segment token [`encode`] / [`decode`]
//!
//! ```rust
//! use tokenkeep_jwt::{decode, encode, DecodeOptions, SessionClaims, SigningKey};
//!
//! # fn main() -> Result<(), tokenkeep_jwt::JwtError> {
//! let key = SigningKey::from("mysecretkey123");
//! let claims = SessionClaims::new(7, "testuser", 1_700_000_000, 1_700_003_600)?;
//! let token = encode(&claims, &key)?;
//!
//! let session = decode(token.as_str(), &key, DecodeOptions::default())?;
//! assert!(session.signature_verified);
//! assert!(!session.is_expired_at(1_700_003_599));
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod base64url;
pub mod canonical;
pub mod claims;
mod codec;
pub mod crypto;
mod error;
mod types;
mod validation;

pub use claims::SessionClaims;
pub use codec::{decode, encode};
pub use error::{JwtError, JwtResult};
pub use types::{DecodedSession, Header, SigningKey, Token, ALGORITHM, TOKEN_TYPE};
pub use validation::DecodeOptions;
