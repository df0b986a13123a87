//! API key rotation with a persisted active-slot pointer.
//!
//! The pointer lives in its own file, independent of the main snapshot,
//! and is written through on every rotation. Rotation is sticky: a later
//! slot that worked stays selected across restarts.

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

const KEY_INDEX_FILE: &str = "active_key_index";

/// Read-only rotation state for display.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyRingStatus {
    pub active_index: usize,
    pub total: usize,
}

pub struct KeyRing {
    keys: Vec<String>,
    active: usize,
    index_path: PathBuf,
}

impl KeyRing {
    /// Builds the ring from an already-parsed key pool, restoring the
    /// persisted index when it is still in range for this pool.
    pub fn load(keys: Vec<String>, dir: impl AsRef<Path>) -> Self {
        let index_path = dir.as_ref().join(KEY_INDEX_FILE);
        let saved = read_saved_index(&index_path);
        let active = match saved {
            Some(idx) if idx < keys.len() => idx,
            _ => 0,
        };
        Self {
            keys,
            active,
            index_path,
        }
    }

    /// The key requests should use right now, if any is configured.
    pub fn current(&self) -> Option<&str> {
        self.keys.get(self.active).map(String::as_str)
    }

    /// Advances to the next key circularly and persists the new index.
    /// Pools of size 0 or 1 have nothing to rotate to: no-op, returns false.
    pub fn rotate(&mut self) -> bool {
        if self.keys.len() <= 1 {
            return false;
        }
        self.active = (self.active + 1) % self.keys.len();
        self.persist_index();
        true
    }

    pub fn status(&self) -> KeyRingStatus {
        KeyRingStatus {
            active_index: self.active,
            total: self.keys.len(),
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    fn persist_index(&self) {
        if let Err(err) = fs::write(&self.index_path, self.active.to_string()) {
            log::warn!("Failed to persist active key index: {err}");
        }
    }
}

fn read_saved_index(path: &Path) -> Option<usize> {
    fs::read_to_string(path).ok()?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(keys: &[&str]) -> Vec<String> {
        keys.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn test_rotation_is_circular() {
        let dir = tempfile::tempdir().unwrap();
        let mut ring = KeyRing::load(pool(&["a", "b", "c"]), dir.path());

        let mut visited = vec![ring.status().active_index];
        for _ in 0..5 {
            assert!(ring.rotate());
            visited.push(ring.status().active_index);
        }
        assert_eq!(visited, vec![0, 1, 2, 0, 1, 2]);
    }

    #[test]
    fn test_rotate_noop_on_small_pools() {
        let dir = tempfile::tempdir().unwrap();

        let mut empty = KeyRing::load(Vec::new(), dir.path());
        assert!(!empty.rotate());
        assert!(empty.current().is_none());
        assert!(empty.is_empty());

        let mut single = KeyRing::load(pool(&["only"]), dir.path());
        assert!(!single.rotate());
        assert_eq!(single.status().active_index, 0);
        assert_eq!(single.current(), Some("only"));
    }

    #[test]
    fn test_index_restored_across_reload() {
        let dir = tempfile::tempdir().unwrap();
        let mut ring = KeyRing::load(pool(&["a", "b", "c"]), dir.path());
        ring.rotate();
        ring.rotate();
        assert_eq!(ring.status().active_index, 2);

        let reloaded = KeyRing::load(pool(&["a", "b", "c"]), dir.path());
        assert_eq!(reloaded.status().active_index, 2);
        assert_eq!(reloaded.current(), Some("c"));
    }

    #[test]
    fn test_out_of_range_index_falls_back_to_first() {
        let dir = tempfile::tempdir().unwrap();
        let mut ring = KeyRing::load(pool(&["a", "b", "c"]), dir.path());
        ring.rotate();
        ring.rotate();

        // Same directory, smaller pool: the saved index 2 is out of range.
        let reloaded = KeyRing::load(pool(&["a", "b"]), dir.path());
        assert_eq!(reloaded.status().active_index, 0);
        assert_eq!(reloaded.current(), Some("a"));
    }

    #[test]
    fn test_garbage_index_file_ignored() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(KEY_INDEX_FILE), "not a number").unwrap();

        let ring = KeyRing::load(pool(&["a", "b"]), dir.path());
        assert_eq!(ring.status().active_index, 0);
    }
}
