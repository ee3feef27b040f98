//! Process-local store for tests and hosts without a keychain.

use crate::{
    error::{StoreError, StoreResult},
    traits::SecureStore,
};
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};
use tokio::sync::Mutex;
use zeroize::Zeroizing;

#[derive(Debug, Default)]
struct Inner {
    slots: Mutex<HashMap<String, Zeroizing<Vec<u8>>>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    fail_deletes: AtomicBool,
    latency_ms: AtomicU64,
    writes: AtomicU64,
}

/// In-memory [`SecureStore`]. Clones share the same slots.
///
/// Nothing is persisted and nothing is encrypted; values are zeroized when
/// overwritten or removed. Failures and latency can be injected to exercise
/// callers' error paths.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

impl MemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every `get` fail with [`StoreError::Unavailable`]
    pub fn fail_reads(&self, fail: bool) {
        self.inner.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every `put` fail with [`StoreError::Unavailable`]
    pub fn fail_writes(&self, fail: bool) {
        self.inner.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make every `delete` fail with [`StoreError::Unavailable`]
    pub fn fail_deletes(&self, fail: bool) {
        self.inner.fail_deletes.store(fail, Ordering::SeqCst);
    }

    /// Delay every operation by `latency`
    pub fn set_latency(&self, latency: Duration) {
        let millis = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
        self.inner.latency_ms.store(millis, Ordering::SeqCst);
    }

    /// Number of successful `put` calls so far
    #[must_use]
    pub fn write_count(&self) -> u64 {
        self.inner.writes.load(Ordering::SeqCst)
    }

    /// Raw contents of `slot`, bypassing injected failures
    pub async fn peek(&self, slot: &str) -> Option<Vec<u8>> {
        self.inner.slots.lock().await.get(slot).map(|v| v.to_vec())
    }

    /// Whether `slot` currently holds a value
    pub async fn contains(&self, slot: &str) -> bool {
        self.inner.slots.lock().await.contains_key(slot)
    }

    async fn simulate(&self, operation: &str, fail: &AtomicBool) -> StoreResult<()> {
        let latency = self.inner.latency_ms.load(Ordering::SeqCst);
        if latency > 0 {
            tokio::time::sleep(Duration::from_millis(latency)).await;
        }
        if fail.load(Ordering::SeqCst) {
            return Err(StoreError::unavailable(format!(
                "injected failure for {operation}"
            )));
        }
        Ok(())
    }
}

impl SecureStore for MemoryStore {
    async fn put(&self, slot: &str, secret: &[u8]) -> StoreResult<()> {
        self.simulate("put", &self.inner.fail_writes).await?;
        self.inner
            .slots
            .lock()
            .await
            .insert(slot.to_owned(), Zeroizing::new(secret.to_vec()));
        self.inner.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn get(&self, slot: &str) -> StoreResult<Option<Zeroizing<Vec<u8>>>> {
        self.simulate("get", &self.inner.fail_reads).await?;
        Ok(self.inner.slots.lock().await.get(slot).cloned())
    }

    async fn delete(&self, slot: &str) -> StoreResult<()> {
        self.simulate("delete", &self.inner.fail_deletes).await?;
        self.inner.slots.lock().await.remove(slot);
        Ok(())
    }
}
