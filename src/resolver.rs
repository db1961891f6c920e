//! Call-site resolution.
//!
//! The host's stack-cleaning service is an external collaborator: it
//! turns an opaque raw call stack into readable, application-relative
//! frames, optionally restricted to an allow-list of path prefixes.
//! The collector talks to it through the [`StackCleaner`] trait and
//! never touches its internal state; the only thing kept per event is
//! the first surviving frame.

use crate::config::TrackerConfig;
use log::debug;

/// Boundary to the host's stack-cleaning service.
///
/// Implementations filter a raw stack down to frames inside the host
/// application and expose the host metadata recorded in snapshots.
pub trait StackCleaner: Send + Sync {
    /// Clean and filter a raw stack, keeping frame order.
    ///
    /// When `tracked_paths` is given, only frames whose path starts
    /// with one of the prefixes followed by a path separator survive.
    fn clean(&self, raw_stack: &[String], tracked_paths: Option<&[String]>) -> Vec<String>;

    /// Host framework version string, recorded in snapshot metadata.
    fn framework_version(&self) -> String;

    /// Host application root path, recorded in snapshot metadata.
    fn app_root(&self) -> String;
}

/// Prefix-based cleaner for hosts without a richer backtrace service.
///
/// Keeps frames whose path starts with an allowed prefix followed by
/// `/`; with no allow-list every frame survives unchanged.
#[derive(Debug, Clone)]
pub struct PathPrefixCleaner {
    framework_version: String,
    app_root: String,
}

impl PathPrefixCleaner {
    pub fn new(framework_version: impl Into<String>, app_root: impl Into<String>) -> Self {
        Self {
            framework_version: framework_version.into(),
            app_root: app_root.into(),
        }
    }
}

impl StackCleaner for PathPrefixCleaner {
    fn clean(&self, raw_stack: &[String], tracked_paths: Option<&[String]>) -> Vec<String> {
        match tracked_paths {
            None => raw_stack.to_vec(),
            Some(prefixes) => raw_stack
                .iter()
                .filter(|frame| {
                    prefixes
                        .iter()
                        .any(|prefix| frame.starts_with(&format!("{}/", prefix)))
                })
                .cloned()
                .collect(),
        }
    }

    fn framework_version(&self) -> String {
        self.framework_version.clone()
    }

    fn app_root(&self) -> String {
        self.app_root.clone()
    }
}

/// Resolve the call site of an event to its first relevant frame.
///
/// **Public** - second stage of the pipeline
///
/// Returns `None` when no frame survives cleaning; the pipeline drops
/// such events entirely (untraceable noise, not an error).
pub fn resolve_first_frame(
    cleaner: &dyn StackCleaner,
    raw_stack: &[String],
    config: &TrackerConfig,
) -> Option<String> {
    let tracked_paths = if config.tracked_paths.is_empty() {
        None
    } else {
        Some(config.tracked_paths.as_slice())
    };

    let cleaned = cleaner.clean(raw_stack, tracked_paths);
    if cleaned.is_empty() {
        debug!("no relevant frame in {} raw frames, dropping event", raw_stack.len());
    }

    cleaned.into_iter().next()
}
