use crate::engine::scramble::scramble;
use crate::words::WordItem;

/// What the front end shows for the current word. Derived on demand; the
/// stored word is never modified.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardView {
    pub word_id: u32,
    pub prompt: String,
    pub prompt_language: String,
    pub answer: String,
    pub answer_language: String,
    pub concealed: bool,
}

impl CardView {
    pub fn project(word: &WordItem, reverse_direction: bool, conceal: bool) -> Self {
        let (prompt, prompt_language, answer, answer_language) = if reverse_direction {
            (&word.target, &word.target_language, &word.source, &word.source_language)
        } else {
            (&word.source, &word.source_language, &word.target, &word.target_language)
        };

        let answer = if conceal {
            scramble(answer, word.id)
        } else {
            answer.clone()
        };

        Self {
            word_id: word.id,
            prompt: prompt.clone(),
            prompt_language: prompt_language.clone(),
            answer,
            answer_language: answer_language.clone(),
            concealed: conceal,
        }
    }
}
