//! Collector configuration.
//!
//! Configuration is owned by the host application and read-only to the
//! core: defaults are applied once at construction, never re-derived
//! inside the event-handling path.

use std::path::PathBuf;

/// Which query verbs pass the command filter
///
/// An explicit tagged option instead of probing whether a list was
/// provided: `All` disables command filtering entirely, `Only` keeps
/// queries starting with one of the listed verbs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackedCommands {
    /// Every command passes the filter
    All,

    /// Only queries starting with one of these verbs pass
    Only(Vec<String>),
}

impl TrackedCommands {
    /// An empty verb list filters nothing, so it collapses to `All`.
    pub fn verbs(&self) -> Option<&[String]> {
        match self {
            TrackedCommands::All => None,
            TrackedCommands::Only(verbs) if verbs.is_empty() => None,
            TrackedCommands::Only(verbs) => Some(verbs),
        }
    }
}

/// Tracker configuration
///
/// **Public** - constructed by the host, handed to [`Tracker::new`](crate::Tracker::new)
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Master switch; when false every event is ignored with no work done
    pub enabled: bool,

    /// Path prefixes considered "inside the application" when resolving
    /// call sites; empty means no path restriction
    pub tracked_paths: Vec<String>,

    /// Query verbs to track
    pub tracked_commands: TrackedCommands,

    /// Drop events served from the host's query cache
    pub ignore_cache: bool,

    /// Directory snapshots are written into
    pub output_path: PathBuf,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            tracked_paths: vec!["app".to_string(), "lib".to_string()],
            tracked_commands: TrackedCommands::Only(vec![
                "SELECT".to_string(),
                "INSERT".to_string(),
                "UPDATE".to_string(),
                "DELETE".to_string(),
            ]),
            ignore_cache: false,
            output_path: PathBuf::from("tmp"),
        }
    }
}
