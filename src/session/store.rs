//! Snapshot persistence for the full application state.
//!
//! One fixed record (`eli_ai_perfect_v1.json`) is replaced wholesale on
//! every write. A capacity failure retries the write with attachments
//! stripped so the session list and message text survive; if the degraded
//! write also fails the failure is swallowed and in-memory state stays
//! authoritative.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

use super::types::Snapshot;

const SNAPSHOT_FILE: &str = "eli_ai_perfect_v1.json";
const QUOTA_ENV: &str = "ELIAI_STORAGE_QUOTA_BYTES";

/// Which write path a `save` ended up taking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistOutcome {
    Full,
    Degraded,
    Failed,
}

pub struct SnapshotStore {
    path: PathBuf,
    max_bytes: Option<usize>,
}

impl SnapshotStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(SNAPSHOT_FILE),
            max_bytes: quota_from_env(),
        }
    }

    /// Overrides the storage quota (bytes of serialized snapshot).
    pub fn with_max_bytes(mut self, max_bytes: Option<usize>) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// Writes the snapshot, degrading to the attachment-free form when the
    /// full record does not fit. Never propagates an error.
    pub fn save(&self, snapshot: &Snapshot) -> PersistOutcome {
        match self.try_write(snapshot) {
            Ok(()) => PersistOutcome::Full,
            Err(err) => {
                log::warn!("Snapshot write failed ({err}), retrying without attachments");
                let light = snapshot.strip_attachments();
                match self.try_write(&light) {
                    Ok(()) => PersistOutcome::Degraded,
                    Err(err) => {
                        log::warn!("Degraded snapshot write failed ({err}), keeping in-memory state");
                        PersistOutcome::Failed
                    }
                }
            }
        }
    }

    fn try_write(&self, snapshot: &Snapshot) -> Result<(), String> {
        let serialized =
            serde_json::to_string(snapshot).map_err(|e| format!("serialization failed: {e}"))?;

        if let Some(cap) = self.max_bytes {
            if serialized.len() > cap {
                return Err(format!(
                    "snapshot exceeds storage quota ({} > {} bytes)",
                    serialized.len(),
                    cap
                ));
            }
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, serialized).map_err(|e| e.to_string())?;
        if self.path.exists() {
            let _ = fs::remove_file(&self.path);
        }
        fs::rename(&tmp_path, &self.path).map_err(|e| e.to_string())
    }

    /// Reads the stored snapshot. A missing or unreadable record yields the
    /// default snapshot; a malformed field falls back to that field's
    /// default without rejecting the rest.
    pub fn load(&self) -> Snapshot {
        let Ok(contents) = fs::read_to_string(&self.path) else {
            return Snapshot::default();
        };
        match serde_json::from_str::<Value>(&contents) {
            Ok(value) => snapshot_from_value(value),
            Err(err) => {
                log::warn!("Stored snapshot is not valid JSON ({err}), starting fresh");
                Snapshot::default()
            }
        }
    }
}

fn quota_from_env() -> Option<usize> {
    std::env::var(QUOTA_ENV)
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok())
}

fn snapshot_from_value(value: Value) -> Snapshot {
    let Value::Object(mut map) = value else {
        return Snapshot::default();
    };
    Snapshot {
        sessions: take_field(&mut map, "sessions"),
        config: take_field(&mut map, "config"),
        theme: take_field(&mut map, "theme"),
        ui_mode: take_field(&mut map, "uiMode"),
        current_session_id: take_field(&mut map, "currentSessionId"),
    }
}

fn take_field<T: DeserializeOwned + Default>(map: &mut Map<String, Value>, key: &str) -> T {
    match map.remove(key) {
        Some(value) => serde_json::from_value(value).unwrap_or_else(|err| {
            log::warn!("Snapshot field '{key}' is malformed ({err}), using default");
            T::default()
        }),
        None => T::default(),
    }
}
