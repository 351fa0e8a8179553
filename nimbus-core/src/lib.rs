//! NimbusKV Core - In-memory key-value engine
//!
//! This crate provides the foundational components for NimbusKV:
//! - JSON value model with canonical encoding
//! - Sharded, lock-per-shard concurrent store
//! - Per-shard-consistent CSV snapshot export
//! - Configuration loading and validation

pub mod config;
pub mod kv;
pub mod snapshot;
pub mod value;

pub use config::{Config, ConfigError};
pub use kv::{KvError, Store, StoreConfig, StoreStats};
pub use snapshot::{SnapshotError, SnapshotExporter};
pub use value::Value;
