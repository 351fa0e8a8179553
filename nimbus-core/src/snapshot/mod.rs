//! Snapshot export for NimbusKV
//!
//! This module produces a point-in-time-consistent export of the full
//! store contents as CSV text:
//! - CSV field escaping helpers
//! - SnapshotExporter walking the store shard by shard
//! - Optional persistence of the CSV to a file
//!
//! ## Consistency
//!
//! The export is per-shard consistent: each shard is bulk-copied under
//! its read lock before moving to the next, so no row is ever torn and
//! no key appears twice, while operations against other shards proceed
//! concurrently. Every key stored before the export began (and not
//! deleted before it began) appears with a value that was live at some
//! instant during its shard's copy.

pub mod csv;
pub mod exporter;

pub use exporter::SnapshotExporter;

use thiserror::Error;

/// Errors during snapshot export
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// A value could not be re-encoded as JSON. The whole export fails;
    /// no partial CSV is ever returned.
    #[error("failed to encode value for key {key}: {source}")]
    Encode {
        key: String,
        source: serde_json::Error,
    },

    #[error("snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),
}
