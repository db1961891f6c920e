//! Persisted snapshot schema.
//!
//! This module defines the structure of the JSON documents written to
//! disk. The serialized key set (including `rails_version` and
//! `rails_path`) is a compatibility contract with existing snapshot
//! consumers; schema evolution goes through `format_version`.

use crate::aggregator::QueryStats;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Point-in-time dump of the aggregate mapping plus run metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// Aggregated statistics keyed by fingerprint
    pub data: HashMap<String, QueryStats>,

    /// When this snapshot was generated
    pub generated_at: String,

    /// When the collection run started
    pub started_at: String,

    /// Snapshot format version for compatibility checking
    pub format_version: String,

    /// Host framework version
    #[serde(rename = "rails_version")]
    pub host_version: String,

    /// Host application root path
    #[serde(rename = "rails_path")]
    pub host_root: String,
}
