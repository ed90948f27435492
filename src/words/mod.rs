pub mod error;
pub mod loader;
pub mod store;
pub mod transform;

use serde::{Deserialize, Serialize};

/// Synthetic source id that merges every manifest source in manifest order.
pub const ALL_SOURCES: &str = "all";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordItem {
    #[serde(default)]
    pub id: u32,
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub source_language: String,
    #[serde(default)]
    pub target_language: String,
}

impl WordItem {
    pub fn new(id: u32, source: &str, target: &str) -> Self {
        Self {
            id,
            source: source.to_string(),
            target: target.to_string(),
            source_language: String::new(),
            target_language: String::new(),
        }
    }

    pub fn with_languages(mut self, source_language: &str, target_language: &str) -> Self {
        self.source_language = source_language.to_string();
        self.target_language = target_language.to_string();
        self
    }
}

/// One selectable entry of the source manifest.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceOption {
    pub value: String,
    pub label: String,
}

/// Options applied while loading a word list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadOptions {
    pub split_compound_source: bool,
}
