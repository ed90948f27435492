use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Serialize, de::DeserializeOwned};

use crate::session::SessionMode;
use crate::store::schema::{HighScoreData, ProgressSnapshot, SCHEMA_VERSION};

const HIGH_SCORE_FILE: &str = "highscore.json";

/// Key/value JSON files under the data directory. One file per
/// `(source, mode)` snapshot plus a single global high-score file.
pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("wordtrainer");
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    fn load<T: DeserializeOwned>(&self, name: &str) -> Option<T> {
        let path = self.file_path(name);
        if !path.exists() {
            return None;
        }
        let parsed = fs::read_to_string(&path)
            .map_err(anyhow::Error::from)
            .and_then(|content| serde_json::from_str(&content).map_err(anyhow::Error::from));
        match parsed {
            Ok(data) => Some(data),
            Err(err) => {
                tracing::warn!(file = %path.display(), error = %err, "ignoring unreadable store file");
                None
            }
        }
    }

    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let path = self.file_path(name);
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(data)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    pub fn snapshot_file_name(source_id: &str, mode: SessionMode) -> String {
        format!("progress-{}-{}.json", sanitize_key(source_id), mode.as_str())
    }

    /// Returns None when nothing was saved for this key, or when the saved
    /// file is corrupt, from another schema, or filed under the wrong key.
    pub fn load_snapshot(&self, source_id: &str, mode: SessionMode) -> Option<ProgressSnapshot> {
        let snapshot: ProgressSnapshot = self.load(&Self::snapshot_file_name(source_id, mode))?;
        if snapshot.needs_reset() || snapshot.source_id != source_id || snapshot.mode != mode {
            tracing::debug!(source = source_id, mode = mode.as_str(), "ignoring mismatched snapshot");
            return None;
        }
        Some(snapshot)
    }

    pub fn save_snapshot(&self, snapshot: &ProgressSnapshot) -> Result<()> {
        self.save(
            &Self::snapshot_file_name(&snapshot.source_id, snapshot.mode),
            snapshot,
        )
    }

    pub fn clear_snapshot(&self, source_id: &str, mode: SessionMode) -> Result<()> {
        let path = self.file_path(&Self::snapshot_file_name(source_id, mode));
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    pub fn load_high_score(&self) -> u64 {
        self.load::<HighScoreData>(HIGH_SCORE_FILE)
            .filter(|data| data.schema_version == SCHEMA_VERSION)
            .map(|data| data.high_score_secs)
            .unwrap_or(0)
    }

    pub fn save_high_score(&self, high_score_secs: u64) -> Result<()> {
        self.save(
            HIGH_SCORE_FILE,
            &HighScoreData {
                schema_version: SCHEMA_VERSION,
                high_score_secs,
            },
        )
    }
}

fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use tempfile::TempDir;

    use super::*;
    use crate::engine::ledger::ProgressEntry;
    use crate::words::WordItem;

    fn make_test_store() -> (TempDir, JsonStore) {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        (dir, store)
    }

    fn make_snapshot(source_id: &str, mode: SessionMode) -> ProgressSnapshot {
        let mut entry = ProgressEntry::new(WordItem::new(1, "Haus", "house"));
        entry.is_correct = true;
        entry.attempts = 2;
        entry.response_durations_ms = vec![900, 450];
        ProgressSnapshot {
            schema_version: SCHEMA_VERSION,
            ledger_entries: vec![(1, entry)],
            current_index: 3,
            source_id: source_id.to_string(),
            mode,
            reverse_direction: true,
            saved_at: Utc::now(),
        }
    }

    #[test]
    fn snapshot_round_trip() {
        let (_dir, store) = make_test_store();
        let snapshot = make_snapshot("basics.json", SessionMode::Exam);
        store.save_snapshot(&snapshot).unwrap();

        let loaded = store.load_snapshot("basics.json", SessionMode::Exam).unwrap();
        assert_eq!(loaded, snapshot);
    }

    #[test]
    fn keys_do_not_collide() {
        let (_dir, store) = make_test_store();
        store
            .save_snapshot(&make_snapshot("basics.json", SessionMode::Exam))
            .unwrap();
        assert!(store.load_snapshot("basics.json", SessionMode::Training).is_none());
        assert!(store.load_snapshot("verbs.json", SessionMode::Exam).is_none());
    }

    #[test]
    fn corrupt_snapshot_is_ignored() {
        let (_dir, store) = make_test_store();
        let name = JsonStore::snapshot_file_name("basics.json", SessionMode::Exam);
        fs::write(store.file_path(&name), "{ not json").unwrap();
        assert!(store.load_snapshot("basics.json", SessionMode::Exam).is_none());
    }

    #[test]
    fn stale_schema_is_ignored() {
        let (_dir, store) = make_test_store();
        let mut snapshot = make_snapshot("basics.json", SessionMode::Exam);
        snapshot.schema_version = 99;
        store.save_snapshot(&snapshot).unwrap();
        assert!(store.load_snapshot("basics.json", SessionMode::Exam).is_none());
    }

    #[test]
    fn clear_removes_only_that_key() {
        let (_dir, store) = make_test_store();
        store
            .save_snapshot(&make_snapshot("basics.json", SessionMode::Exam))
            .unwrap();
        store
            .save_snapshot(&make_snapshot("basics.json", SessionMode::Training))
            .unwrap();
        store.clear_snapshot("basics.json", SessionMode::Exam).unwrap();
        assert!(store.load_snapshot("basics.json", SessionMode::Exam).is_none());
        assert!(store.load_snapshot("basics.json", SessionMode::Training).is_some());
        // Clearing a missing key is fine.
        store.clear_snapshot("basics.json", SessionMode::Exam).unwrap();
    }

    #[test]
    fn snapshot_file_names_are_sanitized() {
        let name = JsonStore::snapshot_file_name("../etc/passwd", SessionMode::Training);
        assert_eq!(name, "progress-.._etc_passwd-training.json");
        assert!(!name.contains('/'));
    }

    #[test]
    fn high_score_defaults_to_zero_and_persists() {
        let (_dir, store) = make_test_store();
        assert_eq!(store.load_high_score(), 0);
        store.save_high_score(915).unwrap();
        assert_eq!(store.load_high_score(), 915);
    }

    #[test]
    fn no_tmp_files_left_after_save() {
        let (dir, store) = make_test_store();
        store
            .save_snapshot(&make_snapshot("basics.json", SessionMode::Exam))
            .unwrap();
        let tmp_files: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().and_then(|x| x.to_str()) == Some("tmp"))
            .collect();
        assert!(tmp_files.is_empty(), "no residual .tmp files");
    }
}
