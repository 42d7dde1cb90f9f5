//! Merge rule management for BPE.
//!
//! This module provides data structures for storing and accessing BPE merge rules.
//! Merge rules are stored using token IDs rather than strings for fast comparison.

use crate::core::vocab::Vocabulary;
use crate::error::{Result, TokenizerError};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;

/// A pair of token IDs that can be merged.
pub type Pair = (u32, u32);

/// Merge rule mapping: pair -> (rank, new_token_id).
///
/// The rank indicates the priority of this merge rule (lower rank = higher priority).
/// The new_token_id is the ID of the token created by merging this pair.
pub type MergeMap = AHashMap<Pair, (u32, u32)>;

/// Collection of BPE merge rules with efficient lookup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MergeRules {
    /// Merge rules: pair -> (rank, new_token_id)
    merges: MergeMap,
}

impl MergeRules {
    /// Create a new empty collection of merge rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new collection with capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            merges: MergeMap::with_capacity(capacity),
        }
    }

    /// Build merge rules from `(left, right)` token strings in priority order.
    ///
    /// Rule `i` gets rank `i`. The result token of `A B` is looked up as `A`
    /// with `continuing_subword_prefix` stripped, followed by `B`; if that is not
    /// a vocabulary entry, the plain concatenation `AB` is tried.
    pub fn from_rules<S: AsRef<str>>(
        vocab: &Vocabulary,
        rules: &[(S, S)],
        continuing_subword_prefix: Option<&str>,
    ) -> Result<Self> {
        let mut merges = Self::with_capacity(rules.len());

        for (rank, (left, right)) in rules.iter().enumerate() {
            let (left, right) = (left.as_ref(), right.as_ref());

            let left_id = vocab
                .get_id(left)
                .ok_or_else(|| TokenizerError::UnknownToken(left.to_string()))?;
            let right_id = vocab
                .get_id(right)
                .ok_or_else(|| TokenizerError::UnknownToken(right.to_string()))?;

            let stripped = continuing_subword_prefix
                .and_then(|prefix| left.strip_prefix(prefix))
                .unwrap_or(left);
            let new_id = vocab
                .get_id(&format!("{stripped}{right}"))
                .or_else(|| vocab.get_id(&format!("{left}{right}")))
                .ok_or_else(|| TokenizerError::MergeTargetMissing(format!("{stripped}{right}")))?;

            if !merges.add_merge((left_id, right_id), rank as u32, new_id) {
                return Err(TokenizerError::DuplicateMerge(
                    left.to_string(),
                    right.to_string(),
                ));
            }
        }

        Ok(merges)
    }

    /// Add a merge rule.
    ///
    /// Returns `false` and leaves the table untouched if the pair already has a rule.
    ///
    /// # Arguments
    /// * `pair` - The pair of token IDs to merge
    /// * `rank` - The priority rank (lower = higher priority)
    /// * `new_token_id` - The ID of the token created by this merge
    pub fn add_merge(&mut self, pair: Pair, rank: u32, new_token_id: u32) -> bool {
        match self.merges.entry(pair) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert((rank, new_token_id));
                true
            }
        }
    }

    /// Get the merge rule for a pair.
    ///
    /// Returns Some((rank, new_token_id)) if this pair should be merged,
    /// None otherwise.
    #[inline]
    pub fn get(&self, pair: Pair) -> Option<(u32, u32)> {
        self.merges.get(&pair).copied()
    }

    /// Get the number of merge rules.
    #[inline]
    pub fn len(&self) -> usize {
        self.merges.len()
    }

    /// Check if there are no merge rules.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.merges.is_empty()
    }

    /// All rules as `(pair, rank)` in ascending rank order.
    pub fn pairs_by_rank(&self) -> Vec<(Pair, u32)> {
        let mut pairs: Vec<(Pair, u32)> = self
            .merges
            .iter()
            .map(|(&pair, &(rank, _))| (pair, rank))
            .collect();
        pairs.sort_unstable_by_key(|&(_, rank)| rank);
        pairs
    }
}

/// Start of the header line written at the top of merges files.
const VERSION_PREFIX: &str = "#version";

/// Parse merges text into `(left, right)` rules in file order.
///
/// Empty lines and `#version` header lines are skipped. Every other line,
/// including ones that start with `#` such as `# #` or `##a ##b`, must be two
/// non-empty tokens separated by exactly one space.
pub fn parse_merges(content: &str) -> Result<Vec<(String, String)>> {
    let mut rules = Vec::new();

    for (line_num, line) in content.lines().enumerate() {
        if line.is_empty() || line.starts_with(VERSION_PREFIX) {
            continue;
        }

        let malformed = || TokenizerError::InvalidMerge {
            line: line_num + 1,
            content: line.to_string(),
        };
        let (left, right) = line.split_once(' ').ok_or_else(malformed)?;
        if left.is_empty() || right.is_empty() || right.contains(' ') {
            return Err(malformed());
        }

        rules.push((left.to_string(), right.to_string()));
    }

    Ok(rules)
}
