//! Tracker: the event-handling pipeline.
//!
//! One `Tracker` per collection run:
//! 1. Filter the event against the configuration
//! 2. Resolve the call site to its first relevant frame
//! 3. Normalize the query and derive its fingerprint
//! 4. Record the occurrence in the aggregator
//!
//! Each event is handled to completion before the next; the aggregate
//! mapping sits behind a single mutex so hosts that emit events from
//! multiple threads stay safe, and `save` observes a consistent state.

use crate::aggregator::Aggregator;
use crate::config::TrackerConfig;
use crate::event::{QueryEvent, QuerySubscriber};
use crate::filter::{is_cache_hit, should_track, CommandMatcher};
use crate::normalizer::{fingerprint, normalize};
use crate::output::schema::Snapshot;
use crate::output::write_snapshot;
use crate::resolver::{resolve_first_frame, StackCleaner};
use crate::utils::config::FORMAT_VERSION;
use crate::utils::error::SnapshotError;
use chrono::{DateTime, Utc};
use log::{debug, info};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

/// Query tracker for one collection run
///
/// **Public** - explicitly owned and injectable, never a process-wide
/// singleton; construct one per run and hand it (via `Arc`) to the
/// host's event-subscription point.
pub struct Tracker {
    config: TrackerConfig,
    matcher: CommandMatcher,
    cleaner: Arc<dyn StackCleaner>,
    started_at: DateTime<Utc>,
    aggregator: Mutex<Aggregator>,
}

impl Tracker {
    /// Create a tracker from caller-resolved configuration and the
    /// host's stack-cleaning service.
    ///
    /// The command-verb regex is compiled here, once per run.
    pub fn new(config: TrackerConfig, cleaner: Arc<dyn StackCleaner>) -> Self {
        let matcher = CommandMatcher::new(&config.tracked_commands);

        info!(
            "Query tracking {} (output: {})",
            if config.enabled { "enabled" } else { "disabled" },
            config.output_path.display()
        );

        Self {
            config,
            matcher,
            cleaner,
            started_at: Utc::now(),
            aggregator: Mutex::new(Aggregator::new()),
        }
    }

    /// The configuration this tracker was built with.
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Handle one query-execution event to completion.
    ///
    /// Untracked and untraceable events are dropped silently; nothing
    /// on this path performs I/O or fails.
    pub fn call(&self, event: &QueryEvent) {
        if !should_track(&self.config, &self.matcher, event) {
            return;
        }

        let Some(frame) = resolve_first_frame(self.cleaner.as_ref(), &event.stack, &self.config)
        else {
            return;
        };

        let normalized = normalize(&event.sql);
        let key = fingerprint(&normalized);

        self.lock_aggregator().record(
            key,
            &normalized,
            frame,
            event.duration_ms(),
            is_cache_hit(event),
        );
    }

    /// Number of distinct query shapes tracked so far.
    pub fn tracked_shapes(&self) -> usize {
        self.lock_aggregator().len()
    }

    /// Persist a snapshot of the current aggregate state.
    ///
    /// Returns `Ok(None)` without touching the filesystem when nothing
    /// has been tracked; an empty snapshot is never written. I/O
    /// failures propagate unchanged, there is no retry.
    pub fn save(&self) -> Result<Option<PathBuf>, SnapshotError> {
        let snapshot = {
            let aggregator = self.lock_aggregator();
            if aggregator.is_empty() {
                debug!("nothing tracked, skipping snapshot");
                return Ok(None);
            }

            Snapshot {
                data: aggregator.to_data(),
                generated_at: Utc::now().to_rfc3339(),
                started_at: self.started_at.to_rfc3339(),
                format_version: FORMAT_VERSION.to_string(),
                host_version: self.cleaner.framework_version(),
                host_root: self.cleaner.app_root(),
            }
        };

        // Lock released before any I/O happens
        write_snapshot(&snapshot, &self.config.output_path).map(Some)
    }

    /// A record in progress never leaves the mapping inconsistent, so
    /// a poisoned lock is recoverable.
    fn lock_aggregator(&self) -> MutexGuard<'_, Aggregator> {
        match self.aggregator.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl QuerySubscriber for Tracker {
    fn on_query(&self, event: &QueryEvent) {
        self.call(event);
    }
}
