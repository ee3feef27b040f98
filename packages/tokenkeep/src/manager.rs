//! Token lifecycle manager.
//!
//! Owns the current in-memory session and the single store slot. Mutating
//! operations are serialized by one lock held across the store call and the
//! in-memory update, so the last completed store write always matches the
//! in-memory state. Readers take a lock-free snapshot.

use crate::{
    clock::{Clock, SystemClock},
    config::SessionConfig,
    error::{SessionError, SessionResult},
    state::{SessionState, SessionStatus, StoredSession},
};
use arc_swap::ArcSwapOption;
use rand::Rng;
use std::{future::Future, sync::Arc};
use tokenkeep_common::LoggingTransformer;
use tokenkeep_jwt::{
    decode, encode, DecodeOptions, DecodedSession, Header, SessionClaims, SigningKey, Token,
};
use tokenkeep_key::{KeychainStore, SecureStore, StoreError, StoreResult};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Issues, persists, reloads and clears one session token.
pub struct SessionManager<S, C = SystemClock> {
    store: S,
    clock: C,
    key: SigningKey,
    config: SessionConfig,
    current: ArcSwapOption<StoredSession>,
    write_lock: Mutex<()>,
}

impl SessionManager<KeychainStore, SystemClock> {
    /// Manager backed by the OS keychain and the system clock
    pub fn with_keychain(key: SigningKey, config: SessionConfig) -> SessionResult<Self> {
        let store = KeychainStore::for_app(config.service_name.clone());
        Self::new(store, SystemClock, key, config)
    }
}

impl<S: SecureStore, C: Clock> SessionManager<S, C> {
    /// Create a manager in the `NoToken` state. Nothing is read from the
    /// store until [`Self::load_on_startup`].
    pub fn new(store: S, clock: C, key: SigningKey, config: SessionConfig) -> SessionResult<Self> {
        config.validate()?;
        Ok(Self {
            store,
            clock,
            key,
            config,
            current: ArcSwapOption::empty(),
            write_lock: Mutex::new(()),
        })
    }

    /// Active configuration
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Mint a fresh token, persist it (replacing any previous one) and make
    /// it current.
    ///
    /// On a store failure nothing changes in memory.
    pub async fn generate(&self) -> SessionResult<Arc<StoredSession>> {
        let _guard = self.write_lock.lock().await;

        let claims = self.fresh_claims()?;
        let token = encode(&claims, &self.key)?;

        self.settled("put", self.store.put(&self.config.account, token.as_str().as_bytes()))
            .await
            .inspect_err(|_| {
                LoggingTransformer::log_session_event("generate", Some(&claims.username), false);
            })?;

        let stored = Arc::new(StoredSession {
            token,
            session: DecodedSession {
                header: Header::hs256(),
                claims,
                signature_verified: true,
            },
        });
        self.current.store(Some(Arc::clone(&stored)));

        info!(
            user = %LoggingTransformer::fingerprint(&stored.claims().username),
            iat = stored.claims().iat,
            exp = stored.claims().exp,
            "session token generated"
        );
        Ok(stored)
    }

    /// Read the persisted token and make it current.
    ///
    /// Returns `Ok(None)` when the slot is empty, when the store cannot decode
    /// the entry, or when the stored token fails to decode (bad structure, bad
    /// payload, signature mismatch). A bad entry is left in the store for the
    /// caller to [`Self::clear`]. Expired tokens load normally. A failing or
    /// timed-out store read is returned as
    /// [`SessionError::StoreUnavailable`] and leaves memory unchanged.
    pub async fn load_on_startup(&self) -> SessionResult<Option<Arc<StoredSession>>> {
        let _guard = self.write_lock.lock().await;

        let read = match self.bounded("get", self.store.get(&self.config.account)).await {
            Ok(read) => read,
            Err(StoreError::InvalidData(details)) => {
                warn!(%details, "stored session token unreadable; starting without a session");
                self.current.store(None);
                return Ok(None);
            }
            Err(error) => return Err(SessionError::store("get", &error)),
        };
        let Some(bytes) = read else {
            debug!("no stored session token");
            self.current.store(None);
            return Ok(None);
        };

        match self.decode_stored(&bytes) {
            Ok(stored) => {
                let stored = Arc::new(stored);
                self.current.store(Some(Arc::clone(&stored)));
                info!(
                    user = %LoggingTransformer::fingerprint(&stored.claims().username),
                    expired = stored.session.is_expired_at(self.clock.now_seconds()),
                    "session token loaded"
                );
                Ok(Some(stored))
            }
            Err(error) => {
                warn!(%error, "stored session token rejected; starting without a session");
                self.current.store(None);
                Ok(None)
            }
        }
    }

    /// Delete the persisted token and drop the in-memory session.
    ///
    /// Succeeds when nothing is stored. If the store delete fails, both the
    /// store and memory keep their previous contents.
    pub async fn clear(&self) -> SessionResult<()> {
        let _guard = self.write_lock.lock().await;

        self.settled("delete", self.store.delete(&self.config.account))
            .await?;
        self.current.store(None);

        LoggingTransformer::log_session_event("clear", None, true);
        Ok(())
    }

    /// Whether the current session has reached its expiry.
    ///
    /// `false` when no session is loaded.
    pub fn is_expired(&self) -> bool {
        self.current
            .load_full()
            .is_some_and(|stored| stored.session.is_expired_at(self.clock.now_seconds()))
    }

    /// Whether `claims` have expired according to this manager's clock
    pub fn is_claims_expired(&self, claims: &SessionClaims) -> bool {
        claims.is_expired_at(self.clock.now_seconds())
    }

    /// Snapshot of the current session
    pub fn current(&self) -> Option<Arc<StoredSession>> {
        self.current.load_full()
    }

    /// Snapshot of the lifecycle state
    pub fn state(&self) -> SessionState {
        match self.current.load_full() {
            Some(stored) => SessionState::Stored(stored),
            None => SessionState::NoToken,
        }
    }

    /// Display status of the current session
    pub fn status(&self) -> SessionStatus {
        match self.current.load_full() {
            None => SessionStatus::NoToken,
            Some(stored) if stored.session.is_expired_at(self.clock.now_seconds()) => {
                SessionStatus::Expired
            }
            Some(_) => SessionStatus::Valid,
        }
    }

    fn fresh_claims(&self) -> SessionResult<SessionClaims> {
        let now = self.clock.now_seconds();
        let exp = now.checked_add(self.config.ttl_seconds).ok_or_else(|| {
            SessionError::InvalidConfig("token expiry overflows i64 seconds".to_string())
        })?;
        let user_id = rand::rng().random_range(0..self.config.user_id_bound);
        Ok(SessionClaims::new(
            user_id,
            self.config.username.clone(),
            now,
            exp,
        )?)
    }

    fn decode_stored(&self, bytes: &[u8]) -> SessionResult<StoredSession> {
        let compact = std::str::from_utf8(bytes).map_err(|e| {
            SessionError::MalformedToken(format!("stored token is not UTF-8: {e}"))
        })?;
        let session = decode(compact, &self.key, DecodeOptions::default())?;
        Ok(StoredSession {
            token: Token::new(compact),
            session,
        })
    }

    /// Read with a deadline. Dropping a pending read has no side effect.
    async fn bounded<T>(
        &self,
        operation: &'static str,
        call: impl Future<Output = StoreResult<T>>,
    ) -> StoreResult<T> {
        let outcome = match tokio::time::timeout(self.config.store_timeout(), call).await {
            Ok(outcome) => outcome,
            Err(_) => Err(StoreError::timeout(operation, self.config.store_timeout_ms)),
        };
        outcome.inspect_err(|error| warn!(operation, %error, "secure store call failed"))
    }

    /// Await a mutating store call until it settles.
    ///
    /// A write may already be running on a blocking thread, so it is never
    /// abandoned while the write lock is held; the result reported is the
    /// one the store actually produced.
    async fn settled<T>(
        &self,
        operation: &'static str,
        call: impl Future<Output = StoreResult<T>>,
    ) -> SessionResult<T> {
        tokio::pin!(call);
        let outcome = match tokio::time::timeout(self.config.store_timeout(), &mut call).await {
            Ok(outcome) => outcome,
            Err(_) => {
                warn!(
                    operation,
                    timeout_ms = self.config.store_timeout_ms,
                    "secure store call is slow; waiting for it to finish"
                );
                call.await
            }
        };
        outcome.map_err(|error| {
            warn!(operation, %error, "secure store call failed");
            SessionError::store(operation, &error)
        })
    }
}

impl<S, C> std::fmt::Debug for SessionManager<S, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("config", &self.config)
            .field("stored", &self.current.load().is_some())
            .finish_non_exhaustive()
    }
}
