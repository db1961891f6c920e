//! End-to-end tests for the tracking pipeline.
//!
//! Drives the full path: event -> filter -> call-site resolution ->
//! normalization -> aggregation -> snapshot persistence, asserting on
//! the JSON actually written to disk.

use chrono::{Duration, Utc};
use pretty_assertions::assert_eq;
use sql_tracker::{
    PathPrefixCleaner, QueryEvent, QuerySubscriber, Tracker, TrackedCommands, TrackerConfig,
};
use std::sync::Arc;
use tempfile::TempDir;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn app_event(sql: &str, duration_ms: i64) -> QueryEvent {
    let started_at = Utc::now();
    QueryEvent {
        sql: sql.to_string(),
        started_at,
        finished_at: started_at + Duration::milliseconds(duration_ms),
        cached: false,
        name: None,
        stack: vec![
            "gems/activerecord-7.1.0/lib/query.rb:12:in `exec'".to_string(),
            "app/models/user.rb:10:in `find_recent'".to_string(),
            "lib/reports/daily.rb:44:in `build'".to_string(),
        ],
    }
}

fn tracker_in(dir: &TempDir) -> Tracker {
    tracker_with(dir, TrackerConfig::default())
}

fn tracker_with(dir: &TempDir, config: TrackerConfig) -> Tracker {
    let config = TrackerConfig {
        output_path: dir.path().join("snapshots"),
        ..config
    };
    Tracker::new(config, Arc::new(PathPrefixCleaner::new("7.1.0", "/srv/app")))
}

#[test]
fn test_identical_shapes_collapse_into_one_entry() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let tracker = tracker_in(&dir);

    tracker.call(&app_event(
        "SELECT * FROM users WHERE id = 5 AND name = 'Bob' LIMIT 10",
        3,
    ));
    tracker.call(&app_event(
        "SELECT * FROM users WHERE id = 9 AND name = 'Alice' LIMIT 1",
        2,
    ));
    tracker.call(&app_event("INSERT INTO users (name) VALUES ('Eve')", 1));

    assert_eq!(tracker.tracked_shapes(), 2);

    let path = tracker.save().unwrap().expect("snapshot should be written");
    let snapshot = sql_tracker::read_snapshot(&path).unwrap();

    let select = snapshot
        .data
        .values()
        .find(|stats| stats.sql.starts_with("SELECT"))
        .unwrap();
    assert_eq!(
        select.sql,
        "SELECT * FROM users WHERE id = xxx AND name = xxx LIMIT xxx"
    );
    assert_eq!(select.count, 2);
    assert_eq!(select.duration, 5.0);
    assert_eq!(select.count as usize, select.source.len());
    assert_eq!(select.source[0], "app/models/user.rb:10:in `find_recent'");

    let insert = snapshot
        .data
        .values()
        .find(|stats| stats.sql.starts_with("INSERT"))
        .unwrap();
    assert_eq!(insert.sql, "INSERT INTO users (name) VALUES (xxx)");
    assert_eq!(insert.count, 1);
}

#[test]
fn test_snapshot_document_matches_the_persisted_contract() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let tracker = tracker_in(&dir);

    tracker.call(&app_event("SELECT * FROM items WHERE category IN (1,2,3)", 2));

    let path = tracker.save().unwrap().unwrap();

    let filename = path.file_name().unwrap().to_str().unwrap();
    assert!(filename.starts_with(&format!("sql_tracker-{}-", std::process::id())));
    assert!(filename.ends_with(".json"));

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let doc = raw.as_object().unwrap();

    assert_eq!(doc["format_version"], "1.0");
    assert_eq!(doc["rails_version"], "7.1.0");
    assert_eq!(doc["rails_path"], "/srv/app");
    assert!(doc.contains_key("generated_at"));
    assert!(doc.contains_key("started_at"));

    let (_, entry) = doc["data"].as_object().unwrap().iter().next().unwrap();
    assert_eq!(
        entry["sql"],
        "SELECT * FROM items WHERE category IN (xxx)"
    );
    assert_eq!(entry["count"], 1);
    // No cache hit seen, so the key is absent rather than zero
    assert!(entry.get("cached_count").is_none());
}

#[test]
fn test_cache_hits_counted_when_not_ignored() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let tracker = tracker_in(&dir);

    tracker.call(&app_event("SELECT * FROM users WHERE id = 1", 2));

    let mut cached = app_event("SELECT * FROM users WHERE id = 2", 0);
    cached.cached = true;
    tracker.call(&cached);

    let mut named = app_event("SELECT * FROM users WHERE id = 3", 0);
    named.name = Some("CACHE".to_string());
    tracker.call(&named);

    let path = tracker.save().unwrap().unwrap();
    let snapshot = sql_tracker::read_snapshot(&path).unwrap();
    let stats = snapshot.data.values().next().unwrap();

    assert_eq!(stats.count, 3);
    assert_eq!(stats.cached_count, Some(2));
    assert!(stats.cached_count.unwrap() <= stats.count);
}

#[test]
fn test_ignore_cache_drops_cache_hits_entirely() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let tracker = tracker_with(
        &dir,
        TrackerConfig {
            ignore_cache: true,
            ..TrackerConfig::default()
        },
    );

    tracker.call(&app_event("SELECT * FROM users WHERE id = 1", 2));

    let mut cached = app_event("SELECT * FROM users WHERE id = 2", 0);
    cached.cached = true;
    tracker.call(&cached);

    assert_eq!(tracker.tracked_shapes(), 1);

    let path = tracker.save().unwrap().unwrap();
    let snapshot = sql_tracker::read_snapshot(&path).unwrap();
    let stats = snapshot.data.values().next().unwrap();

    // The cache hit neither created nor mutated any entry
    assert_eq!(stats.count, 1);
    assert_eq!(stats.cached_count, None);
}

#[test]
fn test_command_filter_applies_to_the_whole_pipeline() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let tracker = tracker_in(&dir);

    tracker.call(&app_event("BEGIN", 0));
    tracker.call(&app_event("SHOW search_path", 0));
    tracker.call(&app_event("  select 1", 0));

    assert_eq!(tracker.tracked_shapes(), 1);
}

#[test]
fn test_all_commands_tracked_without_a_verb_list() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let tracker = tracker_with(
        &dir,
        TrackerConfig {
            tracked_commands: TrackedCommands::All,
            ..TrackerConfig::default()
        },
    );

    tracker.call(&app_event("BEGIN", 0));
    tracker.call(&app_event("TRUNCATE audit_log", 0));

    assert_eq!(tracker.tracked_shapes(), 2);
}

#[test]
fn test_disabled_tracking_yields_no_entries_and_no_file() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let tracker = tracker_with(
        &dir,
        TrackerConfig {
            enabled: false,
            ..TrackerConfig::default()
        },
    );

    for i in 0..50 {
        tracker.call(&app_event(&format!("SELECT * FROM t WHERE id = {}", i), 1));
    }

    assert_eq!(tracker.tracked_shapes(), 0);
    assert_eq!(tracker.save().unwrap(), None);
    assert!(!dir.path().join("snapshots").exists());
}

#[test]
fn test_subscriber_seam_feeds_the_pipeline() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let tracker = tracker_in(&dir);

    let subscriber: &dyn QuerySubscriber = &tracker;
    subscriber.on_query(&app_event("SELECT * FROM users WHERE id = 7", 1));

    assert_eq!(tracker.tracked_shapes(), 1);
}

#[test]
fn test_concurrent_hosts_are_aggregated_safely() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let tracker = Arc::new(tracker_in(&dir));

    let handles: Vec<_> = (0..4)
        .map(|thread| {
            let tracker = Arc::clone(&tracker);
            std::thread::spawn(move || {
                for i in 0..25 {
                    tracker.call(&app_event(
                        &format!("SELECT * FROM users WHERE id = {}", thread * 100 + i),
                        1,
                    ));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let path = tracker.save().unwrap().unwrap();
    let snapshot = sql_tracker::read_snapshot(&path).unwrap();
    let stats = snapshot.data.values().next().unwrap();

    assert_eq!(snapshot.data.len(), 1);
    assert_eq!(stats.count, 100);
    assert_eq!(stats.source.len(), 100);
}
