use std::fs;
use std::path::PathBuf;

use chrono::{Duration, TimeZone, Utc};

use elective_advisor::history::{
    AppendOutcome, FileHistoryStore, HistoryEntry, HistoryStore, HISTORY_CAP,
};
use elective_advisor::recommend::StudentProfile;

fn store() -> (FileHistoryStore, PathBuf, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("history.json");
    (FileHistoryStore::new(path.clone()), path, dir)
}

fn entry(minute: u32) -> HistoryEntry {
    HistoryEntry {
        ts: Utc.with_ymd_and_hms(2026, 8, 7, 9, 0, 0).unwrap() + Duration::minutes(minute as i64),
        input: StudentProfile {
            current_semester: 4,
            ..StudentProfile::default()
        },
        results: Vec::new(),
    }
}

#[tokio::test]
async fn unknown_identity_lists_empty() {
    let (store, _, _dir) = store();
    assert!(store.list("never-seen").await.is_empty());
}

#[tokio::test]
async fn append_caps_at_twenty_newest_first() {
    let (store, _, _dir) = store();

    for minute in 0..25 {
        let outcome = store.append("student-1", entry(minute)).await;
        assert!(outcome.is_persisted(), "append {minute} persists");
    }

    let listed = store.list("student-1").await;
    assert_eq!(listed.len(), HISTORY_CAP);

    // Newest first: minutes 24 down to 5; the oldest five rounds fell off.
    let minutes: Vec<i64> = listed
        .iter()
        .map(|e| (e.ts - entry(0).ts).num_minutes())
        .collect();
    let expected: Vec<i64> = (5..25).rev().collect();
    assert_eq!(minutes, expected);
}

#[tokio::test]
async fn identities_are_isolated() {
    let (store, _, _dir) = store();
    store.append("student-1", entry(0)).await;
    store.append("student-2", entry(1)).await;

    assert_eq!(store.list("student-1").await.len(), 1);
    assert_eq!(store.list("student-2").await.len(), 1);
    assert!(store.list("student-3").await.is_empty());
}

#[tokio::test]
async fn stored_layout_round_trips() {
    let (store, path, _dir) = store();
    store.append("student-1", entry(0)).await;

    // One JSON object mapping identity id to entries with millisecond ts.
    let raw = fs::read_to_string(&path).expect("history file exists");
    let parsed: serde_json::Value = serde_json::from_str(&raw).expect("file is json");
    let entries = parsed["student-1"].as_array().expect("entries for identity");
    assert!(entries[0]["ts"].is_i64());
    assert_eq!(entries[0]["input"]["currentSemester"].as_u64(), Some(4));
}

#[tokio::test]
async fn corrupt_file_degrades_without_erroring() {
    let (store, path, _dir) = store();
    fs::create_dir_all(path.parent().unwrap()).expect("parent dir");
    fs::write(&path, "{ not json").expect("write garbage");

    assert!(store.list("student-1").await.is_empty());
    assert!(matches!(
        store.append("student-1", entry(0)).await,
        AppendOutcome::PersistFailed(_)
    ));
}

#[tokio::test]
async fn unwritable_path_reports_failure() {
    let blocker = tempfile::NamedTempFile::new().expect("temp file");
    let store = FileHistoryStore::new(blocker.path().join("history.json"));

    assert!(matches!(
        store.append("student-1", entry(0)).await,
        AppendOutcome::PersistFailed(_)
    ));
    assert!(store.list("student-1").await.is_empty());
}
