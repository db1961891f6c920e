//! Aggregation of tracked query events into per-fingerprint statistics.
//!
//! The stateful heart of the collector: a mapping from fingerprint to
//! accumulated statistics, created empty at run start, mutated only
//! through [`Aggregator::record`], and read only at snapshot time.
//! There is no eviction and no size cap: a collection run is bounded
//! by process lifetime, and the unbounded `source` list is the price
//! of per-occurrence traceability within a run.

use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Accumulated statistics for one query shape
///
/// **Public** - serialized directly into the snapshot `data` map
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryStats {
    /// First-seen normalized text for this fingerprint, never overwritten
    pub sql: String,

    /// Total tracked occurrences
    pub count: u64,

    /// Occurrences served from the query cache; absent until the first one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cached_count: Option<u64>,

    /// Cumulative duration in milliseconds
    pub duration: f64,

    /// First call-site frame of each occurrence, in arrival order
    pub source: Vec<String>,
}

/// Per-run aggregation state keyed by fingerprint
///
/// **Public** - owned by the tracker, one instance per collection run
#[derive(Debug, Default)]
pub struct Aggregator {
    data: HashMap<String, QueryStats>,
}

impl Aggregator {
    /// Create an empty aggregator for a new collection run.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one tracked occurrence.
    ///
    /// A new fingerprint creates an entry; an existing one accumulates
    /// into it. `source_frame` is appended either way, preserving the
    /// invariant `count == source.len()`.
    pub fn record(
        &mut self,
        fingerprint: String,
        normalized_sql: &str,
        source_frame: String,
        duration_ms: f64,
        cached: bool,
    ) {
        match self.data.get_mut(&fingerprint) {
            Some(stats) => {
                stats.count += 1;
                stats.duration += duration_ms;
                stats.source.push(source_frame);
                if cached {
                    stats.cached_count = Some(stats.cached_count.unwrap_or(0) + 1);
                }
            }
            None => {
                debug!("new query shape: {}", normalized_sql);
                self.data.insert(
                    fingerprint,
                    QueryStats {
                        sql: normalized_sql.to_string(),
                        count: 1,
                        cached_count: cached.then_some(1),
                        duration: duration_ms,
                        source: vec![source_frame],
                    },
                );
            }
        }
    }

    /// True when nothing has been recorded this run.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of distinct query shapes seen this run.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Iterate entries as `(fingerprint, stats)`.
    pub fn entries(&self) -> impl Iterator<Item = (&String, &QueryStats)> {
        self.data.iter()
    }

    /// Clone the mapping for snapshot assembly.
    ///
    /// Flush-time cost only; the hot path never calls this.
    pub fn to_data(&self) -> HashMap<String, QueryStats> {
        self.data.clone()
    }
}
