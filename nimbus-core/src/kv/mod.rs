//! Key-value store implementation with sharding
//!
//! Provides a sharded map for high-performance concurrent access.
//! Each shard is independently lockable to reduce contention: the hash
//! of a key selects its shard, so operations on unrelated keys never
//! serialize behind one another.
//!
//! ## Consistency
//!
//! Operations on a single key are linearizable: once `put` or `delete`
//! returns, every subsequent `get` from any thread observes the effect.
//! No ordering is guaranteed between operations on different keys.

pub mod shard;

pub use shard::{Shard, ShardStats};

use crate::value::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use tracing::debug;

/// Store configuration
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Number of shards (must be a power of 2)
    pub num_shards: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { num_shards: 16 }
    }
}

/// Errors returned by store operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KvError {
    #[error("key must not be empty")]
    EmptyKey,

    #[error("key not found")]
    KeyNotFound,
}

/// Sharded in-memory key-value store
///
/// The store is the single shared mutable resource of the system; it is
/// constructed once at startup and shared behind an `Arc`. All access
/// goes through the per-shard locks.
pub struct Store {
    shards: Vec<Shard>,
    /// Mask for shard selection (num_shards - 1)
    shard_mask: u64,
    total_operations: AtomicU64,
}

impl Store {
    /// Create a store with the given configuration
    ///
    /// # Panics
    ///
    /// Panics if `num_shards` is zero or not a power of two.
    pub fn new(config: &StoreConfig) -> Self {
        assert!(
            config.num_shards.is_power_of_two(),
            "number of shards must be a power of 2"
        );

        let shards = (0..config.num_shards).map(|_| Shard::new()).collect();
        debug!(num_shards = config.num_shards, "store created");

        Self {
            shards,
            shard_mask: (config.num_shards - 1) as u64,
            total_operations: AtomicU64::new(0),
        }
    }

    /// Get shard for a given key
    fn shard_for(&self, key: &str) -> &Shard {
        let idx = (hash_key(key.as_bytes()) & self.shard_mask) as usize;
        &self.shards[idx]
    }

    fn validate_key(key: &str) -> Result<(), KvError> {
        if key.is_empty() {
            return Err(KvError::EmptyKey);
        }
        Ok(())
    }

    /// Insert or replace the value for a key
    ///
    /// Always succeeds for a non-empty key; overwrite is allowed. The
    /// new value is visible to any `get`/`delete` on the same key that
    /// starts after this call returns, from any thread.
    pub fn put(&self, key: &str, value: Value) -> Result<(), KvError> {
        Self::validate_key(key)?;
        self.total_operations.fetch_add(1, Ordering::Relaxed);
        self.shard_for(key).put(key.to_string(), value);
        Ok(())
    }

    /// Get the value for a key
    ///
    /// Returns the most recently completed `put`'s value, fully
    /// materialized (never a torn composite), or `KeyNotFound`.
    pub fn get(&self, key: &str) -> Result<Value, KvError> {
        Self::validate_key(key)?;
        self.total_operations.fetch_add(1, Ordering::Relaxed);
        self.shard_for(key).get(key).ok_or(KvError::KeyNotFound)
    }

    /// Remove the mapping for a key
    ///
    /// All-or-nothing: either the key was present and is removed, or
    /// `KeyNotFound` is returned and the store is unchanged.
    pub fn delete(&self, key: &str) -> Result<(), KvError> {
        Self::validate_key(key)?;
        self.total_operations.fetch_add(1, Ordering::Relaxed);
        if self.shard_for(key).delete(key) {
            Ok(())
        } else {
            Err(KvError::KeyNotFound)
        }
    }

    /// Number of shards
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// Bulk-copy one shard's entries under its read lock
    ///
    /// This is the snapshot iteration contract: callers walk shards
    /// `0..shard_count()` in turn, and each call returns a consistent
    /// copy of that shard while other shards remain fully available.
    pub fn export_shard(&self, idx: usize) -> Vec<(String, Value)> {
        self.shards[idx].export()
    }

    /// Total number of live entries across all shards
    pub fn len(&self) -> usize {
        self.shards.iter().map(|s| s.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(|s| s.is_empty())
    }

    /// Aggregate store statistics
    pub fn stats(&self) -> StoreStats {
        let mut entry_count = 0;
        let mut shard_operations = 0;
        for shard in &self.shards {
            let s = shard.stats();
            entry_count += s.entry_count;
            shard_operations += s.operation_count;
        }
        StoreStats {
            total_operations: self.total_operations.load(Ordering::Relaxed),
            shard_operations,
            entry_count,
        }
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new(&StoreConfig::default())
    }
}

/// Aggregate statistics across all shards
#[derive(Debug, Clone, Copy)]
pub struct StoreStats {
    pub total_operations: u64,
    pub shard_operations: u64,
    pub entry_count: u64,
}

/// FNV-1a hash for shard selection
fn hash_key(key: &[u8]) -> u64 {
    let mut hash = 0xcbf29ce484222325u64;
    for &byte in key {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}
