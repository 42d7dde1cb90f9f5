//! Error types for the subword tokenizer.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the tokenizer library.
#[derive(Error, Debug)]
pub enum TokenizerError {
    /// Error loading vocabulary or merges
    #[error("Load error: {0}")]
    Load(String),

    /// A merges line that is not exactly two tokens separated by one space
    #[error("Invalid merges file format at line {line}: '{content}'")]
    InvalidMerge { line: usize, content: String },

    /// A merge rule whose concatenated result is not a vocabulary entry
    #[error("Merge target not in vocabulary: {0}")]
    MergeTargetMissing(String),

    /// The same pair listed by two merge rules
    #[error("Duplicate merge rule: '{0} {1}'")]
    DuplicateMerge(String, String),

    /// A character with no vocabulary entry and no unknown token to fall back on
    #[error("Token not representable: {character:?} at byte {position}")]
    Unrepresentable { character: char, position: usize },

    /// Error saving vocabulary or merges
    #[error("Save error: {0}")]
    Save(String),

    /// I/O error with file context
    #[error("I/O error for {path}: {err}")]
    Io {
        path: PathBuf,
        #[source]
        err: std::io::Error,
    },

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Unknown token ID
    #[error("Unknown token ID: {0}")]
    UnknownTokenId(u32),

    /// Unknown token string
    #[error("Unknown token: {0}")]
    UnknownToken(String),
}

impl TokenizerError {
    /// Wrap an I/O error with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            err,
        }
    }
}

/// Result type alias for tokenizer operations.
pub type Result<T> = std::result::Result<T, TokenizerError>;
