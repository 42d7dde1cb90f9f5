//! File formats for vocabulary and merges files.
//!
//! Two files describe a model:
//! - `vocab.json`: a JSON object mapping token strings to ids, written in
//!   ascending id order
//! - `merges.txt`: a version header line followed by one `left right` rule
//!   per line in ascending rank order

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::path::{Path, PathBuf};

/// First line of every merges file written by this crate.
pub const MERGES_HEADER: &str = "#version: 0.2 - Trained by `huggingface/tokenizers`";

/// Default vocabulary file name.
pub const VOCAB_FILE: &str = "vocab.json";

/// Default merges file name.
pub const MERGES_FILE: &str = "merges.txt";

/// Paths of the vocabulary and merges files inside `dir`.
///
/// With a prefix the names become `{prefix}-vocab.json` and `{prefix}-merges.txt`.
pub fn model_files(dir: &Path, prefix: Option<&str>) -> (PathBuf, PathBuf) {
    match prefix {
        Some(prefix) => (
            dir.join(format!("{prefix}-{VOCAB_FILE}")),
            dir.join(format!("{prefix}-{MERGES_FILE}")),
        ),
        None => (dir.join(VOCAB_FILE), dir.join(MERGES_FILE)),
    }
}

/// Vocabulary entries serialized as a JSON object in the given order.
pub struct OrderedVocab<'a> {
    entries: &'a [(u32, &'a str)],
}

impl<'a> OrderedVocab<'a> {
    /// Wrap `(id, token)` entries, already sorted by id.
    pub fn new(entries: &'a [(u32, &'a str)]) -> Self {
        Self { entries }
    }
}

impl Serialize for OrderedVocab<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, token) in self.entries {
            map.serialize_entry(token, id)?;
        }
        map.end()
    }
}
