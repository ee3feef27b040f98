//! Built-in secure store implementations

mod keychain_store;
mod memory_store;

pub use keychain_store::KeychainStore;
pub use memory_store::MemoryStore;
