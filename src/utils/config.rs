//! Constants shared across the collector.

/// Current snapshot format version
pub const FORMAT_VERSION: &str = "1.0";

/// Prefix for snapshot filenames: `sql_tracker-<pid>-<unixSeconds>.json`
pub const SNAPSHOT_FILE_PREFIX: &str = "sql_tracker";

/// Extension for snapshot files
pub const SNAPSHOT_FILE_EXT: &str = "json";

/// Placeholder substituted for literal values during normalization
pub const PLACEHOLDER: &str = "xxx";

/// Event name used by hosts to flag queries served from a result cache
pub const CACHE_EVENT_NAME: &str = "CACHE";
