use std::path::PathBuf;

use thiserror::Error;

/// Reasons a word source could not be turned into a word list.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unknown word source: {0}")]
    UnknownSource(String),

    #[error("failed to read word file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse word source {name}")]
    Parse {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("word source {0} contains no words")]
    Empty(String),
}
