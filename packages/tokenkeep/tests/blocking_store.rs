//! Manager behaviour over stores whose work runs on blocking threads, the way
//! the keychain backend does.

use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};
use tokenkeep::{
    LoggingTransformer, ManualClock, SecureStore, SessionConfig, SessionManager, SessionState,
    SigningKey, StoreError,
};
use tokenkeep_key::StoreResult;
use zeroize::Zeroizing;

/// Single-slot store that performs writes from `spawn_blocking`. The next
/// write or delete can be delayed once.
#[derive(Clone, Default)]
struct BlockingStore {
    slot: Arc<Mutex<Option<Vec<u8>>>>,
    next_put_delay_ms: Arc<AtomicU64>,
    next_delete_delay_ms: Arc<AtomicU64>,
}

impl BlockingStore {
    fn delay_next_put(&self, delay: Duration) {
        self.next_put_delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    fn delay_next_delete(&self, delay: Duration) {
        self.next_delete_delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    fn snapshot(&self) -> Option<Vec<u8>> {
        self.slot.lock().unwrap().clone()
    }

    async fn write(&self, delay_ms: u64, value: Option<Vec<u8>>) -> StoreResult<()> {
        let slot = Arc::clone(&self.slot);
        tokio::task::spawn_blocking(move || {
            std::thread::sleep(Duration::from_millis(delay_ms));
            *slot.lock().unwrap() = value;
        })
        .await
        .map_err(|e| StoreError::unavailable(e.to_string()))
    }
}

impl SecureStore for BlockingStore {
    async fn put(&self, _slot: &str, secret: &[u8]) -> StoreResult<()> {
        let delay = self.next_put_delay_ms.swap(0, Ordering::SeqCst);
        self.write(delay, Some(secret.to_vec())).await
    }

    async fn get(&self, _slot: &str) -> StoreResult<Option<Zeroizing<Vec<u8>>>> {
        Ok(self.snapshot().map(Zeroizing::new))
    }

    async fn delete(&self, _slot: &str) -> StoreResult<()> {
        let delay = self.next_delete_delay_ms.swap(0, Ordering::SeqCst);
        self.write(delay, None).await
    }
}

/// Store whose entry exists but cannot be decoded by the backend.
struct UndecodableStore;

impl SecureStore for UndecodableStore {
    async fn put(&self, _slot: &str, _secret: &[u8]) -> StoreResult<()> {
        Ok(())
    }

    async fn get(&self, _slot: &str) -> StoreResult<Option<Zeroizing<Vec<u8>>>> {
        Err(StoreError::InvalidData("keychain entry is not UTF-8".to_string()))
    }

    async fn delete(&self, _slot: &str) -> StoreResult<()> {
        Ok(())
    }
}

fn short_deadline() -> SessionConfig {
    SessionConfig::default().with_store_timeout(Duration::from_millis(30))
}

fn manager_over<S: SecureStore>(store: S, clock: &ManualClock) -> SessionManager<S, ManualClock> {
    LoggingTransformer::init_test();
    SessionManager::new(store, clock.clone(), SigningKey::from("k"), short_deadline()).unwrap()
}

#[tokio::test]
async fn slow_blocking_write_cannot_overwrite_a_later_generate() {
    let store = BlockingStore::default();
    let clock = ManualClock::new(1_700_000_000);
    let manager = manager_over(store.clone(), &clock);

    store.delay_next_put(Duration::from_millis(150));
    let first = manager.generate().await.unwrap();
    assert_eq!(store.snapshot().unwrap(), first.token.as_str().as_bytes());

    clock.advance(1);
    let second = manager.generate().await.unwrap();
    assert_eq!(second.claims().iat, 1_700_000_001);

    tokio::time::sleep(Duration::from_millis(300)).await;
    let current = manager.current().unwrap();
    assert_eq!(current, second);
    assert_eq!(store.snapshot().unwrap(), current.token.as_str().as_bytes());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_generates_agree_when_one_write_is_slow() {
    let store = BlockingStore::default();
    let clock = ManualClock::new(1_700_000_000);
    let manager = Arc::new(manager_over(store.clone(), &clock));

    store.delay_next_put(Duration::from_millis(150));
    let slow = tokio::spawn({
        let manager = Arc::clone(&manager);
        async move { manager.generate().await }
    });
    tokio::time::sleep(Duration::from_millis(10)).await;
    clock.advance(1);
    let fast = manager.generate().await.unwrap();
    let slow = slow.await.unwrap().unwrap();

    tokio::time::sleep(Duration::from_millis(200)).await;
    let current = manager.current().unwrap();
    assert!(current == fast || current == slow);
    assert_eq!(store.snapshot().unwrap(), current.token.as_str().as_bytes());
}

#[tokio::test]
async fn slow_blocking_delete_is_reflected_in_memory() {
    let store = BlockingStore::default();
    let manager = manager_over(store.clone(), &ManualClock::new(0));
    manager.generate().await.unwrap();

    store.delay_next_delete(Duration::from_millis(150));
    manager.clear().await.unwrap();
    assert_eq!(manager.state(), SessionState::NoToken);
    assert_eq!(store.snapshot(), None);
}

#[tokio::test]
async fn undecodable_entry_loads_as_no_token() {
    let manager = manager_over(UndecodableStore, &ManualClock::new(0));
    assert!(manager.load_on_startup().await.unwrap().is_none());
    assert_eq!(manager.state(), SessionState::NoToken);
}
