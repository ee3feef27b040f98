//! Session configuration

use crate::error::{SessionError, SessionResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Session lifecycle configuration.
///
/// Every field has a default, so `{}` is a valid JSON configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Keychain service name the token is filed under
    #[serde(default = "default_service_name")]
    pub service_name: String,
    /// Store slot (keychain account) holding the token
    #[serde(default = "default_account")]
    pub account: String,
    /// Token lifetime in seconds
    #[serde(default = "default_ttl_seconds")]
    pub ttl_seconds: i64,
    /// Username placed in generated claims
    #[serde(default = "default_username")]
    pub username: String,
    /// Generated user ids are drawn from `0..user_id_bound`
    #[serde(default = "default_user_id_bound")]
    pub user_id_bound: i64,
    /// Deadline for store reads, in milliseconds. Writes and deletes that
    /// run past it are logged and awaited to completion.
    #[serde(default = "default_store_timeout_ms")]
    pub store_timeout_ms: u64,
}

fn default_service_name() -> String {
    "tokenkeep".to_string()
}

fn default_account() -> String {
    "authToken".to_string()
}

fn default_ttl_seconds() -> i64 {
    3600 // 1 hour
}

fn default_username() -> String {
    "testuser".to_string()
}

fn default_user_id_bound() -> i64 {
    1000
}

fn default_store_timeout_ms() -> u64 {
    5000
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            account: default_account(),
            ttl_seconds: default_ttl_seconds(),
            username: default_username(),
            user_id_bound: default_user_id_bound(),
            store_timeout_ms: default_store_timeout_ms(),
        }
    }
}

impl SessionConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> SessionResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| SessionError::InvalidConfig(format!("unparseable config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Set the token lifetime
    #[must_use]
    pub fn with_ttl_seconds(mut self, ttl_seconds: i64) -> Self {
        self.ttl_seconds = ttl_seconds;
        self
    }

    /// Set the username placed in generated claims
    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    /// Set the store call timeout
    #[must_use]
    pub fn with_store_timeout(mut self, timeout: Duration) -> Self {
        self.store_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Store call timeout as a `Duration`
    #[must_use]
    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }

    /// Reject configurations that could mint invalid tokens
    pub fn validate(&self) -> SessionResult<()> {
        if self.ttl_seconds <= 0 {
            return Err(SessionError::InvalidConfig(format!(
                "ttl_seconds must be positive, got {}",
                self.ttl_seconds
            )));
        }
        if self.user_id_bound <= 0 {
            return Err(SessionError::InvalidConfig(format!(
                "user_id_bound must be positive, got {}",
                self.user_id_bound
            )));
        }
        if self.service_name.is_empty() || self.account.is_empty() {
            return Err(SessionError::InvalidConfig(
                "service_name and account must not be empty".to_string(),
            ));
        }
        if self.store_timeout_ms == 0 {
            return Err(SessionError::InvalidConfig(
                "store_timeout_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
