//! Loading vocabulary and merges files.

use ahash::AHashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use subword_core::{parse_merges, Result, TokenizerError};
use tracing::debug;

/// Tokenizer loader - reads model files from disk.
pub struct TokenizerLoader;

impl TokenizerLoader {
    /// Read a `vocab.json` file into `(token, id)` entries.
    ///
    /// Key order in the file is irrelevant; ids must be non-negative integers.
    pub fn read_vocab(path: &Path) -> Result<Vec<(String, u32)>> {
        let file = File::open(path).map_err(|e| TokenizerError::io(path, e))?;
        let reader = BufReader::new(file);
        let vocab: AHashMap<String, u32> = serde_json::from_reader(reader).map_err(|e| {
            TokenizerError::Load(format!(
                "Failed to deserialize vocabulary {}: {}",
                path.display(),
                e
            ))
        })?;

        debug!(path = %path.display(), size = vocab.len(), "vocabulary read");
        Ok(vocab.into_iter().collect())
    }

    /// Read a `merges.txt` file into `(left, right)` rules in rank order.
    pub fn read_merges(path: &Path) -> Result<Vec<(String, String)>> {
        let content = std::fs::read_to_string(path).map_err(|e| TokenizerError::io(path, e))?;
        let rules = parse_merges(&content)?;

        debug!(path = %path.display(), count = rules.len(), "merges read");
        Ok(rules)
    }
}
