pub mod card;
pub mod state;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionMode {
    /// Shuffled, judged, repeats misses until every word is correct.
    Exam,
    /// Load order, free navigation, nothing is judged.
    Training,
}

impl SessionMode {
    pub const ALL: [SessionMode; 2] = [SessionMode::Exam, SessionMode::Training];

    pub fn as_str(self) -> &'static str {
        match self {
            SessionMode::Exam => "exam",
            SessionMode::Training => "training",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SessionMode::Exam => "Exam",
            SessionMode::Training => "Training",
        }
    }
}
