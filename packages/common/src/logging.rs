//! Structured logging bootstrap
//!
//! Library crates in this workspace emit `tracing` events, which are
//! forwarded to the `log` facade. `env_logger` prints them; configure with
//! `RUST_LOG`:
//! - `RUST_LOG=info` - lifecycle transitions
//! - `RUST_LOG=debug` - store calls and codec decisions
//! - `RUST_LOG=tokenkeep=debug,tokenkeep_key=warn` - per-crate levels

use log::{info, warn};
use sha2::{Digest, Sha256};
use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

/// Logging setup and privacy-preserving log helpers
pub struct LoggingTransformer;

impl LoggingTransformer {
    /// Initialize logging. Safe to call more than once; only the first call
    /// installs the logger.
    pub fn init() {
        INIT_LOGGER.call_once(|| {
            if env_logger::Builder::from_default_env()
                .format_timestamp_micros()
                .try_init()
                .is_ok()
            {
                info!("Structured logging initialized");
            }
        });
    }

    /// Initialize logging for test environments
    pub fn init_test() {
        let _ = env_logger::Builder::from_default_env()
            .is_test(true)
            .try_init();
    }

    /// Log a session lifecycle event.
    ///
    /// The username is logged only as a fingerprint.
    pub fn log_session_event(event: &str, username: Option<&str>, success: bool) {
        let user = username.map_or_else(|| "anonymous".to_string(), Self::fingerprint);
        if success {
            info!("Session {event} succeeded (user: {user})");
        } else {
            warn!("Session {event} failed (user: {user})");
        }
    }

    /// Short SHA-256 fingerprint for identifiers that must not appear in logs.
    ///
    /// Returns `#` followed by the first 12 hex characters of the digest.
    #[must_use]
    pub fn fingerprint(value: &str) -> String {
        let hash = Sha256::digest(value.as_bytes());
        let hex_hash = format!("{hash:x}");
        format!("#{}", &hex_hash[..12])
    }
}
