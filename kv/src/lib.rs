//! Key-value storage for lexigraph.
//!
//! Everything lexigraph persists (word vectors, per-word adjacency lists,
//! cluster cache entries) goes through the [`KVStore`] trait. Two backends
//! ship with the crate: [`MemoryStore`] for tests and ephemeral sessions, and
//! [`RedbStore`] for durable on-disk storage.

pub mod memory;
pub mod redb;

use std::fmt;
use thiserror::Error;

/// Errors that can occur in KV store operations.
#[derive(Error, Debug)]
pub enum KVError {
    #[error("kv: storage error: {0}")]
    Storage(String),

    #[error("kv: lock poisoned")]
    Poisoned,
}

/// Result type for KV operations.
pub type KVResult<T> = Result<T, KVError>;

/// Key-value store with string keys and byte values.
///
/// `set` and `batch_set` must be durable before returning: callers rely on
/// write-before-return to resume interrupted embedding batches.
pub trait KVStore: Send + Sync {
    /// Get a value by key.
    fn get(&self, key: &str) -> KVResult<Option<Vec<u8>>>;

    /// Set a key-value pair, overwriting any previous value.
    fn set(&self, key: &str, value: &[u8]) -> KVResult<()>;

    /// Delete a key. No error if the key does not exist.
    fn delete(&self, key: &str) -> KVResult<()>;

    /// Return all pairs whose key starts with `prefix`, sorted by key.
    fn scan(&self, prefix: &str) -> KVResult<Vec<(String, Vec<u8>)>>;

    /// Return all keys starting with `prefix`, sorted.
    fn scan_keys(&self, prefix: &str) -> KVResult<Vec<String>> {
        Ok(self.scan(prefix)?.into_iter().map(|(k, _)| k).collect())
    }

    /// Set multiple pairs in one write.
    fn batch_set(&self, entries: &[(&str, &[u8])]) -> KVResult<()>;
}

impl fmt::Debug for dyn KVStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KVStore {{ ... }}")
    }
}

pub(crate) fn storage_err(e: impl fmt::Display) -> KVError {
    KVError::Storage(e.to_string())
}

pub use memory::MemoryStore;
pub use redb::RedbStore;
