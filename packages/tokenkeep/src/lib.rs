//! # tokenkeep
//!
//! Client-side session tokens: issue an HS256-signed token carrying identity
//! claims, keep it in a secure store across restarts, reload and verify it on
//! startup, and discard it on logout.
//!
//! ```rust
//! use tokenkeep::{ManualClock, MemoryStore, SessionConfig, SessionManager, SigningKey};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), tokenkeep::SessionError> {
//! let clock = ManualClock::new(1_700_000_000);
//! let store = MemoryStore::new();
//! let manager = SessionManager::new(
//!     store.clone(),
//!     clock.clone(),
//!     SigningKey::from("mysecretkey123"),
//!     SessionConfig::default(),
//! )?;
//!
//! let issued = manager.generate().await?;
//! assert_eq!(issued.claims().exp, 1_700_003_600);
//!
//! clock.advance(3600);
//! assert!(manager.is_expired());
//!
//! manager.clear().await?;
//! assert!(manager.load_on_startup().await?.is_none());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod clock;
pub mod config;
mod error;
mod manager;
mod state;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::SessionConfig;
pub use error::{SessionError, SessionResult};
pub use manager::SessionManager;
pub use state::{SessionState, SessionStatus, StoredSession};

pub use tokenkeep_common::LoggingTransformer;
pub use tokenkeep_jwt::{DecodeOptions, DecodedSession, Header, SessionClaims, SigningKey, Token};
pub use tokenkeep_key::{KeychainStore, MemoryStore, SecureStore, StoreError};
