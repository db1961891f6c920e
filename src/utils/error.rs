//! Error types for the collector.
//!
//! We use `thiserror` for library-style errors with custom types.
//! The event-handling hot path never fails: malformed SQL passes
//! through normalization unchanged and untraceable events are dropped,
//! so the only fallible surface is snapshot persistence.

use thiserror::Error;

/// Errors that can occur while persisting a snapshot
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Failed to write snapshot: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize snapshot: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
