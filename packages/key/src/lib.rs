//! # Secure store backends
//!
//! The [`SecureStore`] contract used to persist session tokens, with an OS
//! keychain backend and an in-memory backend.
//!
//! ```rust
//! use tokenkeep_key::{MemoryStore, SecureStore};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), tokenkeep_key::StoreError> {
//! let store = MemoryStore::new();
//! store.put("authToken", b"header.claims.signature").await?;
//! assert!(store.get("authToken").await?.is_some());
//! store.delete("authToken").await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod store;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use store::{KeychainStore, MemoryStore};
pub use traits::SecureStore;
