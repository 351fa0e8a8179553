//! Individual store shard implementation
//!
//! Each shard owns one slice of the key space behind its own lock, so
//! operations on keys that hash to different shards never contend.

use crate::value::Value;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Store shard with its own map and lock
///
/// The lock is held only for the duration of a single operation; every
/// operation does O(1) map work plus, for reads, one value clone. Values
/// returned to callers are clones, so callers never hold a reference
/// into shard storage.
pub struct Shard {
    /// Key-value mapping guarded by a read-write lock
    data: RwLock<HashMap<String, Value>>,
    /// Statistics
    operation_count: AtomicU64,
    entry_count: AtomicU64,
}

impl Shard {
    pub fn new() -> Self {
        Self {
            data: RwLock::new(HashMap::new()),
            operation_count: AtomicU64::new(0),
            entry_count: AtomicU64::new(0),
        }
    }

    /// Insert or replace the value for a key
    pub fn put(&self, key: String, value: Value) {
        let mut data = self.data.write();
        self.operation_count.fetch_add(1, Ordering::Relaxed);

        let was_new = data.insert(key, value).is_none();
        if was_new {
            self.entry_count.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Get a value by key, cloned out of the shard
    pub fn get(&self, key: &str) -> Option<Value> {
        let data = self.data.read();
        self.operation_count.fetch_add(1, Ordering::Relaxed);

        data.get(key).cloned()
    }

    /// Delete a key, returning whether it was present
    pub fn delete(&self, key: &str) -> bool {
        let mut data = self.data.write();
        self.operation_count.fetch_add(1, Ordering::Relaxed);

        if data.remove(key).is_some() {
            self.entry_count.fetch_sub(1, Ordering::Relaxed);
            true
        } else {
            false
        }
    }

    /// Bulk-copy every entry in this shard under a single read lock
    ///
    /// The copy is taken atomically with respect to this shard: no entry
    /// appears torn or twice, and every entry was live at some instant
    /// while the lock was held. Other shards are unaffected.
    pub fn export(&self) -> Vec<(String, Value)> {
        let data = self.data.read();
        data.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        self.entry_count.load(Ordering::Relaxed) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get shard statistics
    pub fn stats(&self) -> ShardStats {
        ShardStats {
            operation_count: self.operation_count.load(Ordering::Relaxed),
            entry_count: self.entry_count.load(Ordering::Relaxed),
        }
    }
}

impl Default for Shard {
    fn default() -> Self {
        Self::new()
    }
}

/// Shard statistics
#[derive(Debug, Clone, Copy)]
pub struct ShardStats {
    pub operation_count: u64,
    pub entry_count: u64,
}
