//! OS keychain-backed store (macOS Keychain, Windows Credential Manager,
//! Linux Secret Service).
//!
//! The secret is stored as the credential password itself, so it must be
//! UTF-8. Compact tokens always are.
//!
//! Platform backends are compiled in with the `keychain-store` feature.
//! Without it keyring falls back to its in-process mock credential, which
//! keeps nothing between entries.

use crate::{
    error::{StoreError, StoreResult},
    traits::SecureStore,
};
use zeroize::Zeroizing;

/// Keychain store scoped to one service name; slots are keychain accounts.
#[derive(Debug, Clone)]
pub struct KeychainStore {
    service_name: String,
}

impl KeychainStore {
    /// Create a keychain store for the specified app
    pub fn for_app(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
        }
    }

    /// Service name entries are filed under
    #[must_use]
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    fn entry(service: &str, account: &str) -> StoreResult<keyring::Entry> {
        keyring::Entry::new(service, account).map_err(|e| map_keyring_error("open", e))
    }

    fn perform_put(service: &str, account: &str, password: &str) -> StoreResult<()> {
        Self::entry(service, account)?
            .set_password(password)
            .map_err(|e| map_keyring_error("put", e))
    }

    fn perform_get(service: &str, account: &str) -> StoreResult<Option<Zeroizing<Vec<u8>>>> {
        match Self::entry(service, account)?.get_password() {
            Ok(password) => Ok(Some(Zeroizing::new(password.into_bytes()))),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(map_keyring_error("get", e)),
        }
    }

    fn perform_delete(service: &str, account: &str) -> StoreResult<()> {
        match Self::entry(service, account)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(map_keyring_error("delete", e)),
        }
    }
}

fn map_keyring_error(operation: &str, error: keyring::Error) -> StoreError {
    match error {
        keyring::Error::PlatformFailure(e) => {
            StoreError::unavailable(format!("keychain platform failure during {operation}: {e}"))
        }
        keyring::Error::NoStorageAccess(e) => {
            StoreError::unavailable(format!("keychain locked during {operation}: {e}"))
        }
        keyring::Error::BadEncoding(_) => {
            StoreError::InvalidData(format!("keychain entry read during {operation} is not UTF-8"))
        }
        other => StoreError::backend(operation, other.to_string()),
    }
}

/// Run a blocking keychain call off the async executor.
async fn run_blocking<T, F>(operation: &'static str, f: F) -> StoreResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> StoreResult<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(|e| {
        tracing::error!(operation, error = %e, "keychain task failed");
        StoreError::unavailable(format!("keychain task for {operation} failed: {e}"))
    })?
}

impl SecureStore for KeychainStore {
    async fn put(&self, slot: &str, secret: &[u8]) -> StoreResult<()> {
        let service = self.service_name.clone();
        let account = slot.to_owned();
        let password = match std::str::from_utf8(secret) {
            Ok(text) => Zeroizing::new(text.to_owned()),
            Err(e) => {
                return Err(StoreError::InvalidData(format!(
                    "keychain secrets must be UTF-8: {e}"
                )))
            }
        };
        run_blocking("put", move || Self::perform_put(&service, &account, &password)).await
    }

    async fn get(&self, slot: &str) -> StoreResult<Option<Zeroizing<Vec<u8>>>> {
        let service = self.service_name.clone();
        let account = slot.to_owned();
        run_blocking("get", move || Self::perform_get(&service, &account)).await
    }

    async fn delete(&self, slot: &str) -> StoreResult<()> {
        let service = self.service_name.clone();
        let account = slot.to_owned();
        run_blocking("delete", move || Self::perform_delete(&service, &account)).await
    }
}
