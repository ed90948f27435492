use std::fs;
use std::path::PathBuf;

use rust_embed::Embed;

use crate::words::error::LoadError;
use crate::words::transform::{renumber, split_compound_source};
use crate::words::{ALL_SOURCES, LoadOptions, SourceOption, WordItem};

#[derive(Embed)]
#[folder = "assets/words/"]
struct BundledWords;

const MANIFEST_FILE: &str = "files.json";

/// Source used when neither the config nor the environment names one.
pub const DEFAULT_SOURCE: &str = "basics.json";

/// Word lists come from the user's words directory when a file exists there,
/// otherwise from the lists bundled into the binary.
pub struct WordStore {
    words_dir: Option<PathBuf>,
}

impl WordStore {
    pub fn new(words_dir: Option<PathBuf>) -> Self {
        Self { words_dir }
    }

    pub fn bundled() -> Self {
        Self { words_dir: None }
    }

    pub fn list_sources(&self) -> Vec<SourceOption> {
        let parsed = self.read_raw(MANIFEST_FILE).and_then(|content| {
            serde_json::from_str::<Vec<SourceOption>>(&content).map_err(|source| {
                LoadError::Parse {
                    name: MANIFEST_FILE.to_string(),
                    source,
                }
            })
        });

        match parsed {
            Ok(sources) if !sources.is_empty() => sources,
            Ok(_) => fallback_sources(),
            Err(err) => {
                tracing::warn!(error = %err, "could not load source manifest, using default");
                fallback_sources()
            }
        }
    }

    /// Load one source (or every source for `"all"`) and renumber ids 1..=N.
    pub fn load_words(
        &self,
        source_id: &str,
        options: LoadOptions,
    ) -> Result<Vec<WordItem>, LoadError> {
        let mut words = if source_id == ALL_SOURCES {
            self.load_all(options)
        } else {
            self.load_file(source_id, options)?
        };

        if words.is_empty() {
            return Err(LoadError::Empty(source_id.to_string()));
        }

        renumber(&mut words);
        tracing::info!(source = source_id, count = words.len(), "loaded words");
        Ok(words)
    }

    fn load_all(&self, options: LoadOptions) -> Vec<WordItem> {
        let mut all = Vec::new();
        for source in self.list_sources() {
            match self.load_file(&source.value, options) {
                Ok(words) => all.extend(words),
                Err(err) => {
                    tracing::warn!(source = %source.value, error = %err, "skipping word source");
                }
            }
        }
        all
    }

    fn load_file(&self, name: &str, options: LoadOptions) -> Result<Vec<WordItem>, LoadError> {
        let content = self.read_raw(name)?;
        let words: Vec<WordItem> =
            serde_json::from_str(&content).map_err(|source| LoadError::Parse {
                name: name.to_string(),
                source,
            })?;

        if options.split_compound_source {
            Ok(words.into_iter().map(split_compound_source).collect())
        } else {
            Ok(words)
        }
    }

    fn read_raw(&self, name: &str) -> Result<String, LoadError> {
        if !is_plain_file_name(name) {
            return Err(LoadError::UnknownSource(name.to_string()));
        }

        if let Some(ref dir) = self.words_dir {
            let path = dir.join(name);
            if path.exists() {
                return fs::read_to_string(&path).map_err(|source| LoadError::Read { path, source });
            }
        }

        BundledWords::get(name)
            .and_then(|file| String::from_utf8(file.data.into_owned()).ok())
            .ok_or_else(|| LoadError::UnknownSource(name.to_string()))
    }
}

fn fallback_sources() -> Vec<SourceOption> {
    vec![SourceOption {
        value: DEFAULT_SOURCE.to_string(),
        label: "Basics".to_string(),
    }]
}

fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(['/', '\\']) && name != "." && name != ".."
}
