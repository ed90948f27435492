use serde::{Deserialize, Serialize};

use crate::engine::ledger::ProgressLedger;
use crate::words::WordItem;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub total_words: usize,
    pub correct_words: usize,
    pub incorrect_words: usize,
    pub accuracy: f64,
    pub unknown_words: Vec<WordItem>,
    pub quickest_ms: Option<u64>,
    pub slowest_ms: Option<u64>,
    pub average_ms: Option<f64>,
}

pub fn compute_stats(ledger: &ProgressLedger) -> SessionStats {
    let total_words = ledger.len();
    let correct_words = ledger.entries().filter(|e| e.is_correct).count();
    let unknown_words: Vec<WordItem> = ledger
        .entries()
        .filter(|e| !e.is_correct)
        .map(|e| e.word.clone())
        .collect();

    let accuracy = if total_words > 0 {
        correct_words as f64 / total_words as f64 * 100.0
    } else {
        0.0
    };

    let durations: Vec<u64> = ledger
        .entries()
        .flat_map(|e| e.response_durations_ms.iter().copied())
        .collect();
    let average_ms = if durations.is_empty() {
        None
    } else {
        Some(durations.iter().sum::<u64>() as f64 / durations.len() as f64)
    };

    SessionStats {
        total_words,
        correct_words,
        incorrect_words: total_words - correct_words,
        accuracy,
        unknown_words,
        quickest_ms: durations.iter().min().copied(),
        slowest_ms: durations.iter().max().copied(),
        average_ms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger_with(results: &[(bool, &[u64])]) -> ProgressLedger {
        let mut ledger = ProgressLedger::default();
        for (i, (correct, durations)) in results.iter().enumerate() {
            let word = WordItem::new(i as u32 + 1, "s", "t");
            ledger.ensure_word(&word);
            for &ms in *durations {
                ledger.record_answer(&word, *correct, Some(ms));
            }
            if durations.is_empty() && *correct {
                ledger.record_answer(&word, true, None);
            }
        }
        ledger
    }

    #[test]
    fn empty_ledger_has_zero_accuracy() {
        let stats = compute_stats(&ProgressLedger::default());
        assert_eq!(stats.total_words, 0);
        assert_eq!(stats.accuracy, 0.0);
        assert!(stats.quickest_ms.is_none());
        assert!(stats.average_ms.is_none());
    }

    #[test]
    fn counts_and_accuracy() {
        let stats = compute_stats(&ledger_with(&[(true, &[]), (false, &[]), (true, &[])]));
        assert_eq!(stats.correct_words, 2);
        assert_eq!(stats.incorrect_words, 1);
        assert!((stats.accuracy - 200.0 / 3.0).abs() < 1e-9);
        assert_eq!(stats.unknown_words.len(), 1);
        assert_eq!(stats.unknown_words[0].id, 2);
    }

    #[test]
    fn timing_over_all_samples() {
        let stats = compute_stats(&ledger_with(&[(true, &[400, 1200]), (false, &[800])]));
        assert_eq!(stats.quickest_ms, Some(400));
        assert_eq!(stats.slowest_ms, Some(1200));
        assert_eq!(stats.average_ms, Some(800.0));
    }

    #[test]
    fn zero_duration_is_a_real_sample() {
        let stats = compute_stats(&ledger_with(&[(true, &[0])]));
        assert_eq!(stats.quickest_ms, Some(0));
        assert_eq!(stats.average_ms, Some(0.0));
    }

    #[test]
    fn unseen_words_count_as_unknown() {
        let stats = compute_stats(&ledger_with(&[(false, &[]), (false, &[])]));
        assert_eq!(stats.total_words, 2);
        assert_eq!(stats.unknown_words.len(), 2);
        assert_eq!(stats.accuracy, 0.0);
    }
}
