//! Event filtering.
//!
//! Decides, from event metadata and configuration alone, whether an
//! event enters the pipeline at all. Pure decision logic, no side
//! effects; the command-verb regex is compiled once per tracker
//! instance and reused for every event.

use crate::config::{TrackedCommands, TrackerConfig};
use crate::event::QueryEvent;
use crate::utils::config::CACHE_EVENT_NAME;
use regex::Regex;

/// Compiled command filter
///
/// **Public** - built once by the tracker at construction
#[derive(Debug)]
pub struct CommandMatcher {
    /// None when every command passes
    pattern: Option<Regex>,
}

impl CommandMatcher {
    /// Compile the verb alternation, anchored at the start of the query.
    pub fn new(commands: &TrackedCommands) -> Self {
        let pattern = commands.verbs().map(|verbs| {
            let alternation = verbs
                .iter()
                .map(|verb| regex::escape(verb))
                .collect::<Vec<_>>()
                .join("|");
            // Escaped verbs always form a valid pattern
            Regex::new(&format!("(?i)^(?:{})", alternation))
                .expect("escaped verb alternation compiles")
        });

        Self { pattern }
    }

    /// True when the query, trimmed of leading whitespace, starts with
    /// one of the tracked verbs (case-insensitive).
    pub fn matches(&self, sql: &str) -> bool {
        match &self.pattern {
            None => true,
            Some(regex) => regex.is_match(sql.trim_start()),
        }
    }
}

/// True when the event represents a result served from the host's
/// query cache rather than executed fresh.
pub fn is_cache_hit(event: &QueryEvent) -> bool {
    event.cached || event.name.as_deref() == Some(CACHE_EVENT_NAME)
}

/// Decide whether an event should be tracked at all.
///
/// **Public** - first stage of the pipeline
pub fn should_track(config: &TrackerConfig, matcher: &CommandMatcher, event: &QueryEvent) -> bool {
    if !config.enabled {
        return false;
    }

    if config.ignore_cache && is_cache_hit(event) {
        return false;
    }

    matcher.matches(&event.sql)
}
