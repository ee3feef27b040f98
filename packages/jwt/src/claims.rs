//! Session claims carried in the token payload.

use crate::error::{JwtError, JwtResult};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Claim names with a fixed meaning; they cannot be set through [`SessionClaims::with_claim`].
pub const RESERVED_CLAIMS: [&str; 4] = ["userId", "username", "iat", "exp"];

/// Immutable identity claims embedded in a session token.
///
/// `exp > iat` holds for every value of this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionClaims {
    /// Opaque user identifier.
    #[serde(rename = "userId")]
    pub user_id: i64,
    /// Text identifier of the user.
    pub username: String,
    /// Issued-at (unix seconds).
    pub iat: i64,
    /// Expiry (unix seconds).
    pub exp: i64,
    /// Any further claims, kept in key order.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl SessionClaims {
    /// Build claims, rejecting `exp <= iat`.
    pub fn new(user_id: i64, username: impl Into<String>, iat: i64, exp: i64) -> JwtResult<Self> {
        if exp <= iat {
            return Err(JwtError::malformed_payload(format!(
                "exp ({exp}) must be later than iat ({iat})"
            )));
        }
        Ok(Self {
            user_id,
            username: username.into(),
            iat,
            exp,
            extra: BTreeMap::new(),
        })
    }

    /// Add a custom claim. Reserved names are refused.
    pub fn with_claim(mut self, name: impl Into<String>, value: Value) -> JwtResult<Self> {
        let name = name.into();
        if RESERVED_CLAIMS.contains(&name.as_str()) {
            return Err(JwtError::malformed_payload(format!(
                "claim `{name}` is reserved"
            )));
        }
        self.extra.insert(name, value);
        Ok(self)
    }

    /// Validate and extract claims from a decoded JSON object.
    pub fn from_map(mut map: Map<String, Value>) -> JwtResult<Self> {
        let user_id = take_integer(&mut map, "userId")?;
        let username = match map.remove("username") {
            Some(Value::String(s)) => s,
            Some(_) => return Err(JwtError::malformed_payload("claim `username` must be a string")),
            None => return Err(JwtError::malformed_payload("missing claim `username`")),
        };
        let iat = take_integer(&mut map, "iat")?;
        let exp = take_integer(&mut map, "exp")?;

        let mut claims = Self::new(user_id, username, iat, exp)?;
        claims.extra = map.into_iter().collect();
        Ok(claims)
    }

    /// True once `now` (unix seconds) has reached `exp`.
    #[inline]
    #[must_use]
    pub fn is_expired_at(&self, now: i64) -> bool {
        now >= self.exp
    }

    /// Seconds left before expiry, zero once expired.
    #[must_use]
    pub fn remaining_at(&self, now: i64) -> i64 {
        (self.exp - now).max(0)
    }

    /// Issue time as a UTC timestamp, if representable.
    #[must_use]
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.iat, 0)
    }

    /// Expiry time as a UTC timestamp, if representable.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

fn take_integer(map: &mut Map<String, Value>, name: &str) -> JwtResult<i64> {
    match map.remove(name) {
        Some(Value::Number(n)) => n.as_i64().ok_or_else(|| {
            JwtError::malformed_payload(format!("claim `{name}` must be an integer"))
        }),
        Some(_) => Err(JwtError::malformed_payload(format!(
            "claim `{name}` must be an integer"
        ))),
        None => Err(JwtError::malformed_payload(format!("missing claim `{name}`"))),
    }
}
