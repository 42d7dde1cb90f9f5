//! Saving vocabulary and merges files.

use super::format::{model_files, OrderedVocab, MERGES_HEADER};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use subword_core::{MergeRules, Result, TokenizerError, Vocabulary};
use tracing::debug;

/// Tokenizer saver - writes model files to disk.
pub struct TokenizerSaver<'a> {
    /// Vocabulary reference
    vocab: &'a Vocabulary,
    /// Merge rules reference
    merges: &'a MergeRules,
}

impl<'a> TokenizerSaver<'a> {
    /// Create a new tokenizer saver.
    pub fn new(vocab: &'a Vocabulary, merges: &'a MergeRules) -> Self {
        Self { vocab, merges }
    }

    /// Write `vocab.json` and `merges.txt` into `dir`, optionally prefixed.
    ///
    /// The directory must already exist. Returns the vocabulary and merges
    /// paths, in that order.
    pub fn save(&self, dir: &Path, prefix: Option<&str>) -> Result<(PathBuf, PathBuf)> {
        let (vocab_path, merges_path) = model_files(dir, prefix);

        self.write_vocab(&vocab_path)?;
        self.write_merges(&merges_path)?;

        debug!(
            vocab = %vocab_path.display(),
            merges = %merges_path.display(),
            "tokenizer saved"
        );
        Ok((vocab_path, merges_path))
    }

    fn write_vocab(&self, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|e| TokenizerError::io(path, e))?;
        let mut writer = BufWriter::new(file);

        let entries = self.vocab.entries_by_id();
        serde_json::to_writer(&mut writer, &OrderedVocab::new(&entries))
            .map_err(|e| TokenizerError::Save(format!("Failed to serialize vocab: {}", e)))?;
        writer.flush().map_err(|e| TokenizerError::io(path, e))
    }

    fn write_merges(&self, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|e| TokenizerError::io(path, e))?;
        let mut writer = BufWriter::new(file);

        writeln!(writer, "{}", MERGES_HEADER).map_err(|e| TokenizerError::io(path, e))?;
        for ((left, right), _rank) in self.merges.pairs_by_rank() {
            let left = self
                .vocab
                .get_token(left)
                .ok_or(TokenizerError::UnknownTokenId(left))?;
            let right = self
                .vocab
                .get_token(right)
                .ok_or(TokenizerError::UnknownTokenId(right))?;
            writeln!(writer, "{} {}", left, right).map_err(|e| TokenizerError::io(path, e))?;
        }
        writer.flush().map_err(|e| TokenizerError::io(path, e))
    }
}
