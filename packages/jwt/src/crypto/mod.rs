//! Keyed-hash primitives used by the token codec

pub mod hmac_sha256;
