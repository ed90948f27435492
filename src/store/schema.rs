use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::ledger::ProgressEntry;
use crate::session::SessionMode;

pub const SCHEMA_VERSION: u32 = 1;

/// Everything needed to resume a `(source, mode)` pass.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub schema_version: u32,
    pub ledger_entries: Vec<(u32, ProgressEntry)>,
    pub current_index: usize,
    pub source_id: String,
    pub mode: SessionMode,
    #[serde(default)]
    pub reverse_direction: bool,
    pub saved_at: DateTime<Utc>,
}

impl ProgressSnapshot {
    /// Check if loaded data has a stale schema version and should be ignored.
    pub fn needs_reset(&self) -> bool {
        self.schema_version != SCHEMA_VERSION
    }

    /// True when the saved pass has entries and every one of them is correct.
    pub fn is_complete(&self) -> bool {
        !self.ledger_entries.is_empty() && self.ledger_entries.iter().all(|(_, e)| e.is_correct)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HighScoreData {
    pub schema_version: u32,
    pub high_score_secs: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::words::WordItem;

    fn snapshot(flags: &[bool]) -> ProgressSnapshot {
        let ledger_entries = flags
            .iter()
            .enumerate()
            .map(|(i, &correct)| {
                let mut entry = ProgressEntry::new(WordItem::new(i as u32 + 1, "s", "t"));
                entry.is_correct = correct;
                (i as u32 + 1, entry)
            })
            .collect();
        ProgressSnapshot {
            schema_version: SCHEMA_VERSION,
            ledger_entries,
            current_index: 0,
            source_id: "basics.json".to_string(),
            mode: SessionMode::Exam,
            reverse_direction: false,
            saved_at: Utc::now(),
        }
    }

    #[test]
    fn completion_requires_entries() {
        assert!(!snapshot(&[]).is_complete());
        assert!(!snapshot(&[true, false]).is_complete());
        assert!(snapshot(&[true, true]).is_complete());
    }

    #[test]
    fn snapshot_json_uses_lowercase_mode() {
        let json = serde_json::to_string(&snapshot(&[true])).unwrap();
        assert!(json.contains("\"mode\":\"exam\""));
        let back: ProgressSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.mode, SessionMode::Exam);
        assert!(!back.needs_reset());
    }
}
