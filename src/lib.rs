//! SQL Tracker
//!
//! Runtime query-instrumentation collector: subscribes to
//! query-execution events from a host application, normalizes each
//! query to a fingerprint, aggregates per-shape execution statistics
//! (count, cumulative duration, cache hits, call sites), and persists
//! JSON snapshots for later analysis.
//!
//! ## Getting Started
//!
//! ```no_run
//! use std::sync::Arc;
//! use sql_tracker::{PathPrefixCleaner, Tracker, TrackerConfig};
//!
//! let cleaner = Arc::new(PathPrefixCleaner::new("7.1.0", "/srv/app"));
//! let tracker = Tracker::new(TrackerConfig::default(), cleaner);
//!
//! // Register `tracker` on the host's query-execution channel, then
//! // at shutdown (or on an explicit flush trigger):
//! tracker.save()?;
//! # Ok::<(), sql_tracker::SnapshotError>(())
//! ```

pub mod aggregator;
pub mod config;
pub mod event;
pub mod filter;
pub mod normalizer;
pub mod output;
pub mod resolver;
pub mod tracker;
pub mod utils;

// Re-export the public API surface
pub use aggregator::{Aggregator, QueryStats};
pub use config::{TrackedCommands, TrackerConfig};
pub use event::{QueryEvent, QuerySubscriber, QUERY_EXECUTION_CHANNEL};
pub use normalizer::{fingerprint, normalize};
pub use output::{read_snapshot, Snapshot};
pub use resolver::{PathPrefixCleaner, StackCleaner};
pub use tracker::Tracker;
pub use utils::error::SnapshotError;
