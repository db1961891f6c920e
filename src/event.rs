//! Query-execution event payload.
//!
//! One `QueryEvent` is emitted by the host per query execution and
//! consumed immediately by the tracker; events are never persisted.

use chrono::{DateTime, Utc};

/// Name of the instrumentation channel the collector subscribes to
pub const QUERY_EXECUTION_CHANNEL: &str = "sql.query_execution";

/// A single query execution reported by the host
#[derive(Debug, Clone)]
pub struct QueryEvent {
    /// Raw SQL text as executed
    pub sql: String,

    /// When execution started
    pub started_at: DateTime<Utc>,

    /// When execution finished
    pub finished_at: DateTime<Utc>,

    /// Whether the result was served from the host's query cache
    pub cached: bool,

    /// Host-assigned event name, e.g. "CACHE" for cache hits
    pub name: Option<String>,

    /// Call-stack snapshot taken at the call site, outermost frame first
    pub stack: Vec<String>,
}

impl QueryEvent {
    /// Execution duration in milliseconds, clamped to zero for hosts
    /// that report out-of-order timestamps.
    pub fn duration_ms(&self) -> f64 {
        let elapsed = self.finished_at - self.started_at;
        let ms = match elapsed.num_microseconds() {
            Some(us) => us as f64 / 1000.0,
            // Overflows i64 microseconds only after ~292k years
            None => elapsed.num_milliseconds() as f64,
        };
        ms.max(0.0)
    }
}

/// Subscriber seam for the host's instrumentation channel.
///
/// The host registers an implementor under [`QUERY_EXECUTION_CHANNEL`]
/// and invokes it once per query execution.
pub trait QuerySubscriber {
    /// Handle one query execution to completion.
    fn on_query(&self, event: &QueryEvent);
}
