//! End-to-end lifecycle scenarios against an in-memory store and a manual clock

use std::{sync::Arc, time::Duration};
use tokenkeep::{
    LoggingTransformer, ManualClock, MemoryStore, SecureStore, SessionConfig, SessionError,
    SessionManager, SessionState, SessionStatus, SigningKey,
};
use tokenkeep_jwt::{encode, SessionClaims};

const SLOT: &str = "authToken";

fn manager_with(
    store: &MemoryStore,
    clock: &ManualClock,
    secret: &str,
) -> SessionManager<MemoryStore, ManualClock> {
    LoggingTransformer::init_test();
    SessionManager::new(
        store.clone(),
        clock.clone(),
        SigningKey::from(secret),
        SessionConfig::default(),
    )
    .unwrap()
}

#[tokio::test]
async fn scenario_a_expiry_boundary() {
    let store = MemoryStore::new();
    let clock = ManualClock::new(1_700_000_000);
    let manager = manager_with(&store, &clock, "mysecretkey123");

    let issued = manager.generate().await.unwrap();
    assert_eq!(issued.claims().iat, 1_700_000_000);
    assert_eq!(issued.claims().exp, 1_700_003_600);
    assert!(issued.session.signature_verified);

    clock.set(1_700_003_599);
    assert!(!manager.is_expired());
    assert_eq!(manager.status(), SessionStatus::Valid);

    clock.set(1_700_003_600);
    assert!(manager.is_expired());
    assert_eq!(manager.status(), SessionStatus::Expired);
    assert_eq!(manager.status().to_string(), "Expired");
}

#[tokio::test]
async fn scenario_b_foreign_secret_loads_as_no_token() {
    let store = MemoryStore::new();
    let clock = ManualClock::new(1_700_000_000);
    manager_with(&store, &clock, "A").generate().await.unwrap();
    let stored_before = store.peek(SLOT).await;

    let manager = manager_with(&store, &clock, "B");
    assert!(manager.load_on_startup().await.unwrap().is_none());
    assert_eq!(manager.state(), SessionState::NoToken);
    assert!(manager.current().is_none());

    // the rejected entry stays for the caller to clear
    assert_eq!(store.peek(SLOT).await, stored_before);
}

#[tokio::test]
async fn scenario_c_generate_clear_load() {
    let store = MemoryStore::new();
    let clock = ManualClock::new(1_700_000_000);
    let manager = manager_with(&store, &clock, "mysecretkey123");

    manager.generate().await.unwrap();
    manager.clear().await.unwrap();
    assert!(manager.load_on_startup().await.unwrap().is_none());
    assert_eq!(manager.state(), SessionState::NoToken);
    assert!(!store.contains(SLOT).await);
}

#[tokio::test]
async fn scenario_d_second_generate_replaces_first() {
    let store = MemoryStore::new();
    let clock = ManualClock::new(1_700_000_000);
    let manager = manager_with(&store, &clock, "mysecretkey123");

    let first = manager.generate().await.unwrap();
    clock.advance(1);
    let second = manager.generate().await.unwrap();

    assert!(second.claims().iat > first.claims().iat);
    assert_eq!(
        store.peek(SLOT).await.unwrap(),
        second.token.as_str().as_bytes()
    );
    assert_eq!(manager.current().unwrap(), second);
}

#[tokio::test]
async fn reload_in_new_process_restores_session() {
    let store = MemoryStore::new();
    let clock = ManualClock::new(1_700_000_000);
    let issued = manager_with(&store, &clock, "mysecretkey123")
        .generate()
        .await
        .unwrap();

    let restarted = manager_with(&store, &clock, "mysecretkey123");
    let loaded = restarted.load_on_startup().await.unwrap().unwrap();
    assert_eq!(loaded.token, issued.token);
    assert_eq!(loaded.claims(), issued.claims());
    assert!(loaded.session.signature_verified);
    assert_eq!(restarted.state(), SessionState::Stored(loaded));
}

#[tokio::test]
async fn expired_token_still_loads() {
    let store = MemoryStore::new();
    let clock = ManualClock::new(1_700_000_000);
    manager_with(&store, &clock, "k").generate().await.unwrap();

    clock.set(1_800_000_000);
    let manager = manager_with(&store, &clock, "k");
    assert!(manager.load_on_startup().await.unwrap().is_some());
    assert!(manager.is_expired());
    assert_eq!(manager.status(), SessionStatus::Expired);
    assert!(store.contains(SLOT).await);
}

#[tokio::test]
async fn is_expired_does_not_touch_store() {
    let store = MemoryStore::new();
    let clock = ManualClock::new(1_700_000_000);
    let manager = manager_with(&store, &clock, "k");
    manager.generate().await.unwrap();
    let writes = store.write_count();

    clock.set(1_900_000_000);
    assert!(manager.is_expired());
    assert!(manager.is_expired());
    assert_eq!(store.write_count(), writes);
    assert!(store.contains(SLOT).await);
    assert!(manager.current().is_some());
}

#[tokio::test]
async fn is_claims_expired_uses_manager_clock() {
    let clock = ManualClock::new(100);
    let manager = manager_with(&MemoryStore::new(), &clock, "k");
    let claims = SessionClaims::new(1, "u", 0, 200).unwrap();
    assert!(!manager.is_claims_expired(&claims));
    clock.set(200);
    assert!(manager.is_claims_expired(&claims));
}

#[tokio::test]
async fn clear_is_idempotent() {
    let store = MemoryStore::new();
    let manager = manager_with(&store, &ManualClock::new(0), "k");
    manager.clear().await.unwrap();
    manager.clear().await.unwrap();
    assert_eq!(manager.state(), SessionState::NoToken);
}

#[tokio::test]
async fn garbage_in_store_loads_as_no_token() {
    let store = MemoryStore::new();
    let manager = manager_with(&store, &ManualClock::new(0), "k");

    let cases: [&[u8]; 4] = [b"not-a-token", b"a.b", b"!!.??.**", &[0xff, 0xfe, 0xfd]];
    for garbage in cases {
        store.put(SLOT, garbage).await.unwrap();
        assert!(manager.load_on_startup().await.unwrap().is_none());
        assert_eq!(store.peek(SLOT).await.unwrap(), garbage);
    }
}

#[tokio::test]
async fn load_replaces_previous_session_with_no_token_when_store_is_bad() {
    let store = MemoryStore::new();
    let clock = ManualClock::new(1_700_000_000);
    let manager = manager_with(&store, &clock, "k");
    manager.generate().await.unwrap();

    let foreign = SessionClaims::new(1, "mallory", 1_700_000_000, 1_700_003_600).unwrap();
    let forged = encode(&foreign, &SigningKey::from("other")).unwrap();
    store.put(SLOT, forged.as_str().as_bytes()).await.unwrap();

    assert!(manager.load_on_startup().await.unwrap().is_none());
    assert_eq!(manager.state(), SessionState::NoToken);
}

#[tokio::test]
async fn failed_write_leaves_state_unchanged() {
    let store = MemoryStore::new();
    let clock = ManualClock::new(1_700_000_000);
    let manager = manager_with(&store, &clock, "k");
    let first = manager.generate().await.unwrap();

    store.fail_writes(true);
    clock.advance(10);
    let err = manager.generate().await.unwrap_err();
    assert!(matches!(err, SessionError::StoreUnavailable { operation: "put", .. }));
    assert_eq!(manager.current().unwrap(), first);
    assert_eq!(store.peek(SLOT).await.unwrap(), first.token.as_str().as_bytes());
}

#[tokio::test]
async fn failed_write_from_no_token_stays_no_token() {
    let store = MemoryStore::new();
    store.fail_writes(true);
    let manager = manager_with(&store, &ManualClock::new(0), "k");
    assert!(manager.generate().await.is_err());
    assert_eq!(manager.state(), SessionState::NoToken);
    assert!(!store.contains(SLOT).await);
}

#[tokio::test]
async fn failed_delete_keeps_stored_state() {
    let store = MemoryStore::new();
    let manager = manager_with(&store, &ManualClock::new(0), "k");
    let issued = manager.generate().await.unwrap();

    store.fail_deletes(true);
    let err = manager.clear().await.unwrap_err();
    assert!(matches!(err, SessionError::StoreUnavailable { operation: "delete", .. }));
    assert_eq!(manager.current().unwrap(), issued);
    assert!(store.contains(SLOT).await);
}

#[tokio::test]
async fn failed_read_is_surfaced() {
    let store = MemoryStore::new();
    store.fail_reads(true);
    let manager = manager_with(&store, &ManualClock::new(0), "k");
    let err = manager.load_on_startup().await.unwrap_err();
    assert!(matches!(err, SessionError::StoreUnavailable { operation: "get", .. }));
    assert!(!err.is_codec_error());
    assert_eq!(manager.state(), SessionState::NoToken);
}

#[tokio::test]
async fn failed_read_keeps_held_session() {
    let store = MemoryStore::new();
    let manager = manager_with(&store, &ManualClock::new(1_700_000_000), "k");
    let issued = manager.generate().await.unwrap();

    store.fail_reads(true);
    let err = manager.load_on_startup().await.unwrap_err();
    assert!(matches!(err, SessionError::StoreUnavailable { operation: "get", .. }));
    assert_eq!(manager.current().unwrap(), issued);
    assert_eq!(manager.status(), SessionStatus::Valid);
}

#[tokio::test]
async fn slow_read_times_out() {
    let store = MemoryStore::new();
    let manager = SessionManager::new(
        store.clone(),
        ManualClock::new(0),
        SigningKey::from("k"),
        SessionConfig::default().with_store_timeout(Duration::from_millis(20)),
    )
    .unwrap();
    let issued = manager.generate().await.unwrap();

    store.set_latency(Duration::from_millis(500));
    let err = manager.load_on_startup().await.unwrap_err();
    match err {
        SessionError::StoreUnavailable { operation, reason } => {
            assert_eq!(operation, "get");
            assert!(reason.contains("timed out after 20ms"), "{reason}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(manager.current().unwrap(), issued);
}

#[tokio::test]
async fn slow_write_is_awaited_past_the_deadline() {
    let store = MemoryStore::new();
    store.set_latency(Duration::from_millis(100));
    let manager = SessionManager::new(
        store.clone(),
        ManualClock::new(0),
        SigningKey::from("k"),
        SessionConfig::default().with_store_timeout(Duration::from_millis(20)),
    )
    .unwrap();

    let issued = manager.generate().await.unwrap();
    assert_eq!(store.peek(SLOT).await.unwrap(), issued.token.as_str().as_bytes());
    manager.clear().await.unwrap();
    assert!(!store.contains(SLOT).await);
    assert_eq!(manager.state(), SessionState::NoToken);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_generates_leave_store_and_memory_in_agreement() {
    let store = MemoryStore::new();
    store.set_latency(Duration::from_millis(5));
    let clock = ManualClock::new(1_700_000_000);
    let manager = Arc::new(manager_with(&store, &clock, "k"));

    let mut handles = Vec::new();
    for _ in 0..16 {
        let manager = Arc::clone(&manager);
        let clock = clock.clone();
        handles.push(tokio::spawn(async move {
            clock.advance(1);
            manager.generate().await.unwrap()
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let current = manager.current().unwrap();
    assert_eq!(store.peek(SLOT).await.unwrap(), current.token.as_str().as_bytes());
    assert_eq!(store.write_count(), 16);
}

#[tokio::test]
async fn configured_username_and_ttl_are_used() {
    let store = MemoryStore::new();
    let manager = SessionManager::new(
        store,
        ManualClock::new(1_000),
        SigningKey::from("k"),
        SessionConfig::default()
            .with_username("alice")
            .with_ttl_seconds(60),
    )
    .unwrap();

    let issued = manager.generate().await.unwrap();
    assert_eq!(issued.claims().username, "alice");
    assert_eq!(issued.claims().exp, 1_060);
}
