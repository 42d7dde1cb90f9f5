//! Vocabulary storage and lookup.
//!
//! This module provides efficient vocabulary storage using AHashMap for fast lookups
//! and CompactString for memory-efficient string storage. The forward and reverse
//! maps are always updated together so that ids stay unique in both directions.

use crate::error::{Result, TokenizerError};
use ahash::AHashMap;
use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// Forward mapping: token string -> ID
pub type Vocab = AHashMap<CompactString, u32>;

/// Reverse mapping: ID -> token string
pub type VocabR = AHashMap<u32, CompactString>;

/// Id reserved for the unknown token.
pub const UNK_ID: u32 = 0;

/// Vocabulary with forward and reverse mappings.
///
/// The maps are only reachable through methods that keep them in sync:
///
/// ```compile_fail
/// let mut vocab = subword_core::Vocabulary::new();
/// vocab.vocab.insert("a".into(), 1);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Vocabulary {
    /// Forward mapping: token string -> ID
    vocab: Vocab,
    /// Reverse mapping: ID -> token string
    vocab_r: VocabR,
    /// Unknown token string, registered at [`UNK_ID`]
    unk: Option<CompactString>,
}

impl Vocabulary {
    /// Create a new empty vocabulary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new vocabulary with capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            vocab: Vocab::with_capacity(capacity),
            vocab_r: VocabR::with_capacity(capacity),
            unk: None,
        }
    }

    /// Build a vocabulary from `(token, id)` entries.
    ///
    /// Fails if two tokens claim the same id.
    pub fn from_entries<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, u32)>,
        S: AsRef<str>,
    {
        let entries = entries.into_iter();
        let mut vocab = Self::with_capacity(entries.size_hint().0);
        for (token, id) in entries {
            vocab.add_token_with_id(token.as_ref(), id)?;
        }
        Ok(vocab)
    }

    /// Add a token with a specific ID.
    ///
    /// Returns an error if the ID is already taken.
    pub fn add_token_with_id(&mut self, token: &str, id: u32) -> Result<()> {
        if self.vocab_r.contains_key(&id) {
            return Err(TokenizerError::InvalidConfig(format!(
                "Token ID {} already exists",
                id
            )));
        }

        let token = CompactString::new(token);
        if let Some(old_id) = self.vocab.insert(token.clone(), id) {
            self.vocab_r.remove(&old_id);
        }
        self.vocab_r.insert(id, token);

        Ok(())
    }

    /// Register or clear the unknown token.
    ///
    /// Registering binds the token to [`UNK_ID`], evicting whatever held that id
    /// and whatever id the token previously had. Clearing removes the `UNK_ID`
    /// entry from both maps.
    pub fn set_unk_token(&mut self, token: Option<&str>) {
        match token {
            Some(token) => {
                let token = CompactString::new(token);
                if let Some(previous) = self.vocab_r.insert(UNK_ID, token.clone()) {
                    self.vocab.remove(&previous);
                }
                if let Some(old_id) = self.vocab.insert(token.clone(), UNK_ID) {
                    if old_id != UNK_ID {
                        self.vocab_r.remove(&old_id);
                    }
                }
                self.unk = Some(token);
            }
            None => {
                if let Some(previous) = self.vocab_r.remove(&UNK_ID) {
                    self.vocab.remove(&previous);
                }
                self.unk = None;
            }
        }
    }

    /// The unknown token string, if one is registered.
    #[inline]
    pub fn unk_token(&self) -> Option<&str> {
        self.unk.as_deref()
    }

    /// The unknown token id, if one is registered.
    #[inline]
    pub fn unk_id(&self) -> Option<u32> {
        self.unk.as_ref().map(|_| UNK_ID)
    }

    /// Get the ID for a token string.
    #[inline]
    pub fn get_id(&self, token: &str) -> Option<u32> {
        self.vocab.get(token).copied()
    }

    /// Get the token string for an ID.
    #[inline]
    pub fn get_token(&self, id: u32) -> Option<&str> {
        self.vocab_r.get(&id).map(|s| s.as_str())
    }

    /// Get the size of the vocabulary.
    #[inline]
    pub fn len(&self) -> usize {
        self.vocab.len()
    }

    /// Check if the vocabulary is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vocab.is_empty()
    }

    /// All entries as `(id, token)` in ascending id order.
    pub fn entries_by_id(&self) -> Vec<(u32, &str)> {
        let mut entries: Vec<(u32, &str)> = self
            .vocab_r
            .iter()
            .map(|(&id, token)| (id, token.as_str()))
            .collect();
        entries.sort_unstable_by_key(|&(id, _)| id);
        entries
    }
}
