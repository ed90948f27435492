use std::time::Instant;

use chrono::{DateTime, Utc};
use rand::Rng;
use rand::seq::SliceRandom;

use crate::engine::ledger::ProgressLedger;
use crate::engine::selection::next_incorrect_index;
use crate::engine::stats::{SessionStats, compute_stats};
use crate::session::SessionMode;
use crate::session::card::CardView;
use crate::store::schema::{ProgressSnapshot, SCHEMA_VERSION};
use crate::words::WordItem;

#[derive(Clone, Debug, PartialEq)]
pub enum AnswerOutcome {
    /// Not revealed, not in exam mode, or nothing to answer.
    Ignored,
    Next { index: usize },
    Complete(SessionStats),
}

/// The active roster, its progress ledger and the cursor over it.
///
/// Correct words stay in the roster for the rest of the pass; next-selection
/// skips them by consulting the ledger rather than removing them.
#[derive(Clone, Debug)]
pub struct Session {
    mode: Option<SessionMode>,
    source_id: String,
    roster: Vec<WordItem>,
    ledger: ProgressLedger,
    current_index: usize,
    revealed: bool,
    reveal_started_at: Option<Instant>,
    reverse_direction: bool,
    complete: bool,
}

impl Session {
    /// Build a session from freshly loaded words and whatever was saved for
    /// this `(source, mode)` key.
    pub fn start<R: Rng + ?Sized>(
        mode: SessionMode,
        source_id: &str,
        words: Vec<WordItem>,
        saved: Option<&ProgressSnapshot>,
        rng: &mut R,
    ) -> Self {
        let reverse_direction = saved.is_some_and(|s| s.reverse_direction);

        let (mut roster, ledger, current_index) = match mode {
            SessionMode::Training => {
                let ledger = fresh_ledger(&words);
                (words, ledger, 0)
            }
            SessionMode::Exam => {
                let resumed = saved
                    .filter(|s| !s.ledger_entries.is_empty())
                    .map(|s| (s.current_index, ProgressLedger::restore_from(&s.ledger_entries, &words)))
                    .filter(|(_, ledger)| !words.iter().all(|w| ledger.is_correct(w.id)));

                match resumed {
                    Some((index, ledger)) => {
                        let remaining: Vec<WordItem> = words
                            .into_iter()
                            .filter(|w| !ledger.is_correct(w.id))
                            .collect();
                        (remaining, ledger, index)
                    }
                    None => {
                        let ledger = fresh_ledger(&words);
                        (words, ledger, 0)
                    }
                }
            }
        };

        if mode == SessionMode::Exam {
            roster.shuffle(rng);
        }

        let current_index = current_index.min(roster.len().saturating_sub(1));
        tracing::info!(
            mode = mode.as_str(),
            source = source_id,
            roster = roster.len(),
            ledger = ledger.len(),
            "session started"
        );

        Self {
            mode: Some(mode),
            source_id: source_id.to_string(),
            roster,
            ledger,
            current_index,
            revealed: false,
            reveal_started_at: None,
            reverse_direction,
            complete: false,
        }
    }

    pub fn mode(&self) -> Option<SessionMode> {
        self.mode
    }

    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    pub fn roster(&self) -> &[WordItem] {
        &self.roster
    }

    pub fn ledger(&self) -> &ProgressLedger {
        &self.ledger
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_word(&self) -> Option<&WordItem> {
        self.roster.get(self.current_index)
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub fn reverse_direction(&self) -> bool {
        self.reverse_direction
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn is_active(&self) -> bool {
        self.mode.is_some() && !self.complete && !self.roster.is_empty()
    }

    pub fn reveal(&mut self, now: Instant) -> bool {
        if !self.is_active() || self.revealed {
            return false;
        }
        self.revealed = true;
        self.reveal_started_at = Some(now);
        true
    }

    pub fn answer(&mut self, is_correct: bool, now: Instant) -> AnswerOutcome {
        if !self.revealed || self.mode != Some(SessionMode::Exam) || !self.is_active() {
            tracing::debug!(revealed = self.revealed, "ignoring answer");
            return AnswerOutcome::Ignored;
        }
        let Some(word) = self.roster.get(self.current_index).cloned() else {
            return AnswerOutcome::Ignored;
        };

        let duration_ms = self
            .reveal_started_at
            .map(|started| now.saturating_duration_since(started).as_millis() as u64);
        self.ledger.record_answer(&word, is_correct, duration_ms);
        self.clear_reveal();

        self.select_next()
    }

    fn select_next(&mut self) -> AnswerOutcome {
        let correct: Vec<bool> = self
            .roster
            .iter()
            .map(|w| self.ledger.is_correct(w.id))
            .collect();

        match next_incorrect_index(&correct, self.current_index) {
            Some(index) => {
                self.current_index = index;
                AnswerOutcome::Next { index }
            }
            None => {
                self.complete = true;
                let stats = self.stats();
                tracing::info!(
                    source = %self.source_id,
                    total = stats.total_words,
                    "exam pass complete"
                );
                AnswerOutcome::Complete(stats)
            }
        }
    }

    /// Training navigation. Returns whether the cursor moved.
    pub fn next(&mut self) -> bool {
        if self.mode != Some(SessionMode::Training) || self.roster.is_empty() {
            return false;
        }
        let target = (self.current_index + 1).min(self.roster.len() - 1);
        self.move_to(target)
    }

    pub fn previous(&mut self) -> bool {
        if self.mode != Some(SessionMode::Training) || self.roster.is_empty() {
            return false;
        }
        self.move_to(self.current_index.saturating_sub(1))
    }

    pub fn has_next(&self) -> bool {
        self.current_index + 1 < self.roster.len()
    }

    pub fn has_previous(&self) -> bool {
        self.current_index > 0
    }

    fn move_to(&mut self, index: usize) -> bool {
        if index == self.current_index {
            return false;
        }
        self.current_index = index;
        self.clear_reveal();
        true
    }

    /// Swap prompt and answer. Refused in exam mode until the answer is
    /// revealed so it cannot be used to peek.
    pub fn toggle_direction(&mut self) -> bool {
        if self.mode.is_none() || (self.mode == Some(SessionMode::Exam) && !self.revealed) {
            return false;
        }
        self.reverse_direction = !self.reverse_direction;
        true
    }

    pub fn card(&self) -> Option<CardView> {
        let word = self.current_word()?;
        let conceal = self.mode == Some(SessionMode::Exam) && !self.revealed;
        Some(CardView::project(word, self.reverse_direction, conceal))
    }

    /// Words in the roster not yet answered correctly.
    pub fn remaining(&self) -> usize {
        self.roster
            .iter()
            .filter(|w| !self.ledger.is_correct(w.id))
            .count()
    }

    pub fn progress_ratio(&self) -> f64 {
        if self.roster.is_empty() {
            return 0.0;
        }
        (self.roster.len() - self.remaining()) as f64 / self.roster.len() as f64
    }

    pub fn stats(&self) -> SessionStats {
        compute_stats(&self.ledger)
    }

    /// Leave the session; roster position and progress are kept for saving.
    pub fn stop(&mut self) {
        tracing::info!(source = %self.source_id, "session stopped");
        self.mode = None;
        self.clear_reveal();
    }

    /// Forget all progress for this session.
    pub fn restart(&mut self) {
        tracing::info!(source = %self.source_id, "session restarted");
        self.mode = None;
        self.roster.clear();
        self.ledger.clear();
        self.current_index = 0;
        self.complete = false;
        self.clear_reveal();
    }

    pub fn snapshot(&self, saved_at: DateTime<Utc>) -> Option<ProgressSnapshot> {
        let mode = self.mode?;
        Some(ProgressSnapshot {
            schema_version: SCHEMA_VERSION,
            ledger_entries: self.ledger.to_pairs(),
            current_index: self.current_index,
            source_id: self.source_id.clone(),
            mode,
            reverse_direction: self.reverse_direction,
            saved_at,
        })
    }

    fn clear_reveal(&mut self) {
        self.revealed = false;
        self.reveal_started_at = None;
    }
}

fn fresh_ledger(words: &[WordItem]) -> ProgressLedger {
    let mut ledger = ProgressLedger::default();
    for word in words {
        ledger.ensure_word(word);
    }
    ledger
}
