//! JSON snapshot writer.
//!
//! Persists one uniquely named file per save call. The filename embeds
//! the process id and a unix-seconds timestamp, so concurrent runs
//! sharing an output directory never collide in practice. The document
//! goes to disk in a single write call; a failed save leaves no
//! partially written file behind.

use crate::output::schema::Snapshot;
use crate::utils::config::{SNAPSHOT_FILE_EXT, SNAPSHOT_FILE_PREFIX};
use crate::utils::error::SnapshotError;
use chrono::Utc;
use log::{debug, info};
use std::path::{Path, PathBuf};

/// Write a snapshot into the output directory
///
/// **Public** - main entry point for persistence
///
/// # Arguments
/// * `snapshot` - Snapshot document to persist
/// * `output_dir` - Directory to write into, created if missing
///
/// # Returns
/// Path of the file that was written
///
/// # Errors
/// * `SnapshotError::InvalidPath` - Output directory cannot be used
/// * `SnapshotError::WriteFailed` - Directory creation or write failed
/// * `SnapshotError::SerializationFailed` - JSON serialization failed
pub fn write_snapshot(snapshot: &Snapshot, output_dir: &Path) -> Result<PathBuf, SnapshotError> {
    validate_output_dir(output_dir)?;

    if !output_dir.exists() {
        debug!("Creating output directory: {}", output_dir.display());
        std::fs::create_dir_all(output_dir)?;
    }

    let path = output_dir.join(snapshot_filename());
    let body = serde_json::to_string(snapshot)?;

    // Single write call; no partial file on failure
    std::fs::write(&path, body)?;

    info!(
        "Snapshot written: {} ({} query shapes)",
        path.display(),
        snapshot.data.len()
    );

    Ok(path)
}

/// Read a snapshot back from disk
///
/// **Public** - useful for validation and testing
pub fn read_snapshot(path: impl AsRef<Path>) -> Result<Snapshot, SnapshotError> {
    let path = path.as_ref();

    debug!("Reading snapshot from: {}", path.display());

    let body = std::fs::read_to_string(path)?;
    let snapshot = serde_json::from_str(&body)?;

    Ok(snapshot)
}

/// `sql_tracker-<pid>-<unixSeconds>.json`
fn snapshot_filename() -> String {
    format!(
        "{}-{}-{}.{}",
        SNAPSHOT_FILE_PREFIX,
        std::process::id(),
        Utc::now().timestamp(),
        SNAPSHOT_FILE_EXT
    )
}

/// Reject output paths we could never write into
fn validate_output_dir(dir: &Path) -> Result<(), SnapshotError> {
    if dir.as_os_str().is_empty() {
        return Err(SnapshotError::InvalidPath("Path is empty".to_string()));
    }

    if dir.exists() && !dir.is_dir() {
        return Err(SnapshotError::InvalidPath(format!(
            "Not a directory: {}",
            dir.display()
        )));
    }

    Ok(())
}
