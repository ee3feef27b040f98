//! Secure store contract

use crate::error::StoreResult;
use std::future::Future;
use zeroize::Zeroizing;

/// Confidential single-slot key-value storage.
///
/// Implementations guarantee confidentiality at rest and atomic overwrite of
/// a slot. A slot holds at most one value; `put` replaces it.
pub trait SecureStore: Send + Sync {
    /// Write `secret` into `slot`, replacing any previous value.
    fn put(&self, slot: &str, secret: &[u8]) -> impl Future<Output = StoreResult<()>> + Send;

    /// Read `slot`. An empty slot is `Ok(None)`, not an error.
    fn get(
        &self,
        slot: &str,
    ) -> impl Future<Output = StoreResult<Option<Zeroizing<Vec<u8>>>>> + Send;

    /// Remove `slot`. Removing an empty slot succeeds.
    fn delete(&self, slot: &str) -> impl Future<Output = StoreResult<()>> + Send;
}

impl<T: SecureStore> SecureStore for std::sync::Arc<T> {
    fn put(&self, slot: &str, secret: &[u8]) -> impl Future<Output = StoreResult<()>> + Send {
        (**self).put(slot, secret)
    }

    fn get(
        &self,
        slot: &str,
    ) -> impl Future<Output = StoreResult<Option<Zeroizing<Vec<u8>>>>> + Send {
        (**self).get(slot)
    }

    fn delete(&self, slot: &str) -> impl Future<Output = StoreResult<()>> + Send {
        (**self).delete(slot)
    }
}
