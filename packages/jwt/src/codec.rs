//! Compact token encode/decode

use crate::{
    base64url, canonical,
    claims::SessionClaims,
    crypto::hmac_sha256,
    error::{JwtError, JwtResult},
    types::{DecodedSession, Header, SigningKey, Token, ALGORITHM, TOKEN_TYPE},
    validation::DecodeOptions,
};
use serde_json::Value;

/// Sign `claims` with `key` and return the compact token.
pub fn encode(claims: &SessionClaims, key: &SigningKey) -> JwtResult<Token> {
    let header_b64 = base64url::encode(&canonical::to_canonical_vec(&Header::hs256())?);
    let claims_b64 = base64url::encode(&canonical::to_canonical_vec(claims)?);

    let signing_input = format!("{header_b64}.{claims_b64}");
    let signature = hmac_sha256::sign(key.as_bytes(), signing_input.as_bytes())?;

    Ok(Token::new(format!(
        "{signing_input}.{}",
        base64url::encode(&signature)
    )))
}

/// Decode a compact token.
///
/// Expiry is not checked here; see [`DecodedSession::is_expired_at`].
pub fn decode(
    token: &str,
    key: &SigningKey,
    options: DecodeOptions,
) -> JwtResult<DecodedSession> {
    let mut parts = token.split('.');
    let (header_b64, claims_b64, signature_b64) =
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(h), Some(c), Some(s), None) => (h, c, s),
            _ => {
                return Err(JwtError::malformed_token(
                    "token must have exactly three segments",
                ))
            }
        };
    if header_b64.is_empty() || claims_b64.is_empty() || signature_b64.is_empty() {
        return Err(JwtError::malformed_token("token segment is empty"));
    }

    let header_bytes = base64url::decode(header_b64)?;
    let claims_bytes = base64url::decode(claims_b64)?;
    let signature = base64url::decode(signature_b64)?;

    let header = parse_header(&header_bytes)?;
    let claims = SessionClaims::from_map(canonical::decode(&claims_bytes)?)?;

    let signature_verified = if options.skips_signature_check() {
        false
    } else {
        // The signing input is the exact received text, not a re-encoding.
        let signing_input = &token[..header_b64.len() + 1 + claims_b64.len()];
        if !hmac_sha256::verify(key.as_bytes(), signing_input.as_bytes(), &signature)? {
            return Err(JwtError::InvalidSignature);
        }
        true
    };

    Ok(DecodedSession {
        header,
        claims,
        signature_verified,
    })
}

fn parse_header(bytes: &[u8]) -> JwtResult<Header> {
    let map = canonical::decode(bytes)?;
    let field = |name: &str| match map.get(name) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(JwtError::malformed_payload(format!(
            "header `{name}` must be a string"
        ))),
        None => Err(JwtError::malformed_payload(format!(
            "header is missing `{name}`"
        ))),
    };
    let header = Header {
        alg: field("alg")?,
        typ: field("typ")?,
    };
    if header.alg != ALGORITHM {
        return Err(JwtError::malformed_token(format!(
            "unsupported algorithm `{}`",
            header.alg
        )));
    }
    if header.typ != TOKEN_TYPE {
        return Err(JwtError::malformed_token(format!(
            "unsupported token type `{}`",
            header.typ
        )));
    }
    Ok(header)
}
