//! Single-file history backend for deployments without a relational store.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use async_trait::async_trait;
use tracing::warn;

use super::domain::HistoryEntry;
use super::store::{AppendOutcome, HistoryStore, HISTORY_CAP};

type HistoryMap = BTreeMap<String, Vec<HistoryEntry>>;

#[derive(Debug, thiserror::Error)]
enum FileStoreError {
    #[error("history file io: {0}")]
    Io(#[from] std::io::Error),
    #[error("history file corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// One JSON object mapping identity id to a capped, newest-first entry list.
/// Every call is a whole-file read-modify-write and no cross-writer locking
/// is provided, which restricts this backend to single-process,
/// low-concurrency deployment.
#[derive(Debug, Clone)]
pub struct FileHistoryStore {
    path: PathBuf,
}

impl FileHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_map(&self) -> Result<HistoryMap, FileStoreError> {
        if !self.path.exists() {
            return Ok(HistoryMap::new());
        }
        let raw = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    fn write_map(&self, map: &HistoryMap) -> Result<(), FileStoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let raw = serde_json::to_string_pretty(map)?;
        Ok(fs::write(&self.path, raw)?)
    }
}

#[async_trait]
impl HistoryStore for FileHistoryStore {
    async fn append(&self, identity_id: &str, entry: HistoryEntry) -> AppendOutcome {
        let mut map = match self.read_map() {
            Ok(map) => map,
            Err(err) => return AppendOutcome::PersistFailed(err.to_string()),
        };

        let entries = map.entry(identity_id.to_string()).or_default();
        entries.insert(0, entry);
        entries.truncate(HISTORY_CAP);

        match self.write_map(&map) {
            Ok(()) => AppendOutcome::Persisted,
            Err(err) => AppendOutcome::PersistFailed(err.to_string()),
        }
    }

    async fn list(&self, identity_id: &str) -> Vec<HistoryEntry> {
        match self.read_map() {
            Ok(mut map) => map.remove(identity_id).unwrap_or_default(),
            Err(err) => {
                warn!(
                    path = %self.path.display(),
                    error = %err,
                    "history file unreadable, answering empty"
                );
                Vec::new()
            }
        }
    }
}
