use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::words::WordItem;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProgressEntry {
    pub word: WordItem,
    pub is_correct: bool,
    pub attempts: u32,
    #[serde(default)]
    pub response_durations_ms: Vec<u64>,
}

impl ProgressEntry {
    pub fn new(word: WordItem) -> Self {
        Self {
            word,
            is_correct: false,
            attempts: 0,
            response_durations_ms: Vec::new(),
        }
    }
}

/// Learning state per word id. Iterates in ascending id order, which is
/// load order because ids are assigned sequentially.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProgressLedger {
    entries: BTreeMap<u32, ProgressEntry>,
}

impl ProgressLedger {
    pub fn get(&self, id: u32) -> Option<&ProgressEntry> {
        self.entries.get(&id)
    }

    /// Replace the entry for `id` wholesale.
    pub fn upsert(&mut self, id: u32, entry: ProgressEntry) {
        self.entries.insert(id, entry);
    }

    pub fn entries(&self) -> impl Iterator<Item = &ProgressEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_correct(&self, id: u32) -> bool {
        self.get(id).is_some_and(|e| e.is_correct)
    }

    /// Pre-populate an untouched entry so lookups for loaded words never miss.
    pub fn ensure_word(&mut self, word: &WordItem) {
        self.entries
            .entry(word.id)
            .or_insert_with(|| ProgressEntry::new(word.clone()));
    }

    /// Record one judged answer: bump attempts, overwrite correctness and
    /// append the response time when one was measured.
    pub fn record_answer(&mut self, word: &WordItem, is_correct: bool, duration_ms: Option<u64>) {
        let mut entry = self
            .get(word.id)
            .cloned()
            .unwrap_or_else(|| ProgressEntry::new(word.clone()));
        entry.attempts += 1;
        entry.is_correct = is_correct;
        if let Some(ms) = duration_ms {
            entry.response_durations_ms.push(ms);
        }
        self.upsert(word.id, entry);
    }

    /// Rebuild the ledger for the words that are loaded now. Saved progress is
    /// keyed by id and the freshly loaded word text wins. The result covers
    /// exactly the loaded words: saved entries for ids not loaded now are left
    /// out. Nothing is removed from an existing ledger except by `clear`.
    pub fn restore_from(saved: &[(u32, ProgressEntry)], words: &[WordItem]) -> Self {
        let saved: BTreeMap<u32, &ProgressEntry> =
            saved.iter().map(|(id, entry)| (*id, entry)).collect();
        let mut ledger = Self::default();
        for word in words {
            let entry = match saved.get(&word.id) {
                Some(prev) => ProgressEntry {
                    word: word.clone(),
                    ..(*prev).clone()
                },
                None => ProgressEntry::new(word.clone()),
            };
            ledger.upsert(word.id, entry);
        }
        ledger
    }

    pub fn to_pairs(&self) -> Vec<(u32, ProgressEntry)> {
        self.entries
            .iter()
            .map(|(id, entry)| (*id, entry.clone()))
            .collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
