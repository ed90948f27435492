//! Property tests for the session engine.
//!
//! - Cursor stays inside the roster whatever the learner does
//! - Answering without a reveal changes nothing
//! - Answering every card correctly finishes an exam in exactly N answers
//! - A pass of wrong answers visits every word before repeating one
//! - An exam completes exactly when every ledger entry is correct
//! - Next-selection only ever lands on an incorrect word
//! - Scrambling keeps the characters of every run

use std::collections::HashSet;
use std::time::Instant;

use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use wordtrainer::engine::scramble::scramble;
use wordtrainer::engine::selection::next_incorrect_index;
use wordtrainer::session::SessionMode;
use wordtrainer::session::state::{AnswerOutcome, Session};
use wordtrainer::words::WordItem;

// ============================================================================
// Generators
// ============================================================================

#[derive(Clone, Copy, Debug)]
enum Action {
    Reveal,
    Answer(bool),
    Next,
    Previous,
    Toggle,
}

fn arb_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        Just(Action::Reveal),
        any::<bool>().prop_map(Action::Answer),
        Just(Action::Next),
        Just(Action::Previous),
        Just(Action::Toggle),
    ]
}

fn arb_mode() -> impl Strategy<Value = SessionMode> {
    prop_oneof![Just(SessionMode::Exam), Just(SessionMode::Training)]
}

fn words(n: usize) -> Vec<WordItem> {
    (1..=n as u32)
        .map(|id| WordItem::new(id, &format!("wort {id}"), &format!("word {id}")))
        .collect()
}

fn start(mode: SessionMode, n: usize, seed: u64) -> Session {
    let mut rng = SmallRng::seed_from_u64(seed);
    Session::start(mode, "prop.json", words(n), None, &mut rng)
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn cursor_stays_in_roster(
        mode in arb_mode(),
        n in 1usize..30,
        seed in any::<u64>(),
        actions in prop::collection::vec(arb_action(), 0..200),
    ) {
        let mut session = start(mode, n, seed);
        let now = Instant::now();
        for action in actions {
            match action {
                Action::Reveal => { session.reveal(now); }
                Action::Answer(ok) => { session.answer(ok, now); }
                Action::Next => { session.next(); }
                Action::Previous => { session.previous(); }
                Action::Toggle => { session.toggle_direction(); }
            }
            prop_assert!(session.current_index() < session.roster().len());
            let ratio = session.progress_ratio();
            prop_assert!((0.0..=1.0).contains(&ratio));
        }
    }

    #[test]
    fn answer_without_reveal_is_a_no_op(
        n in 1usize..30,
        seed in any::<u64>(),
        correct in any::<bool>(),
    ) {
        let mut session = start(SessionMode::Exam, n, seed);
        let index = session.current_index();
        let ledger = session.ledger().clone();

        prop_assert_eq!(session.answer(correct, Instant::now()), AnswerOutcome::Ignored);
        prop_assert_eq!(session.current_index(), index);
        prop_assert_eq!(session.ledger(), &ledger);
    }

    #[test]
    fn all_correct_exam_finishes_in_n_answers(n in 1usize..40, seed in any::<u64>()) {
        let mut session = start(SessionMode::Exam, n, seed);
        let now = Instant::now();

        for answered in 1..=n {
            prop_assert!(session.reveal(now));
            match session.answer(true, now) {
                AnswerOutcome::Complete(stats) => {
                    prop_assert_eq!(answered, n);
                    prop_assert_eq!(stats.correct_words, n);
                    prop_assert!(session.is_complete());
                    return Ok(());
                }
                AnswerOutcome::Next { .. } => prop_assert!(answered < n),
                AnswerOutcome::Ignored => prop_assert!(false, "answer was ignored"),
            }
        }
        prop_assert!(false, "exam never completed");
    }

    #[test]
    fn wrong_answers_visit_every_word(n in 1usize..25, seed in any::<u64>()) {
        let mut session = start(SessionMode::Exam, n, seed);
        let now = Instant::now();
        let mut seen = HashSet::new();

        for _ in 0..n {
            seen.insert(session.current_word().unwrap().id);
            prop_assert!(session.reveal(now));
            let outcome = session.answer(false, now);
            prop_assert!(matches!(outcome, AnswerOutcome::Next { .. }), "unexpected {:?}", outcome);
        }
        prop_assert_eq!(seen.len(), n);
    }

    #[test]
    fn exam_completes_exactly_when_all_correct(
        n in 1usize..25,
        seed in any::<u64>(),
        answers in prop::collection::vec(any::<bool>(), 0..150),
    ) {
        let mut session = start(SessionMode::Exam, n, seed);
        let now = Instant::now();

        // Random answers first, then correct ones until the pass ends.
        let tail = std::iter::repeat_n(true, n);
        for correct in answers.into_iter().chain(tail) {
            prop_assert!(session.reveal(now));
            let outcome = session.answer(correct, now);
            let all_correct = session.ledger().entries().all(|e| e.is_correct);
            match outcome {
                AnswerOutcome::Complete(stats) => {
                    prop_assert!(all_correct);
                    prop_assert_eq!(stats.correct_words, n);
                    prop_assert!(session.is_complete());
                    return Ok(());
                }
                AnswerOutcome::Next { index } => {
                    prop_assert!(!all_correct);
                    prop_assert!(!session.ledger().is_correct(session.roster()[index].id));
                }
                AnswerOutcome::Ignored => prop_assert!(false, "answer was ignored"),
            }
        }
        prop_assert!(false, "exam never completed");
    }

    #[test]
    fn selection_lands_on_incorrect(
        correct in prop::collection::vec(any::<bool>(), 1..50),
        current in 0usize..50,
    ) {
        let current = current % correct.len();
        match next_incorrect_index(&correct, current) {
            Some(index) => {
                prop_assert!(index < correct.len());
                prop_assert!(!correct[index]);
            }
            None => prop_assert!(correct.iter().all(|c| *c)),
        }
    }

    #[test]
    fn scramble_keeps_run_characters(text in "[a-zA-Zäöü ]{0,40}", seed in any::<u32>()) {
        let out = scramble(&text, seed);
        prop_assert_eq!(out.chars().count(), text.chars().count());
        for (a, b) in text.split(' ').zip(out.split(' ')) {
            let mut a: Vec<char> = a.chars().collect();
            let mut b: Vec<char> = b.chars().collect();
            a.sort_unstable();
            b.sort_unstable();
            prop_assert_eq!(a, b);
        }
        prop_assert_eq!(scramble(&text, seed), out);
    }
}
