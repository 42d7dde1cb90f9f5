//! subword-core - Core BPE merge implementation
//!
//! This crate provides the fundamental data structures and algorithms for
//! byte-pair encoding (BPE) of a single pre-segmented word.
//!
//! # Features
//!
//! - Vocabulary storage using `AHashMap` and compact strings
//! - Ranked merge rules keyed by token-id pairs
//! - A greedy, priority-ordered merge over an index-linked symbol list,
//!   with optional merge dropout
//! - Error handling with detailed diagnostics
//!
//! # Example
//!
//! ```rust
//! use subword_core::{MergeRules, Vocabulary, Word};
//!
//! let vocab = Vocabulary::from_entries([("a", 1), ("b", 2), ("ab", 3)])?;
//! let merges = MergeRules::from_rules(&vocab, &[("a", "b")], None)?;
//!
//! let mut word = Word::new();
//! word.add(1, 1);
//! word.add(2, 1);
//! word.merge_all(&merges);
//! assert_eq!(word.ids(), vec![3]);
//! # Ok::<(), subword_core::TokenizerError>(())
//! ```

pub mod error;
pub use error::{Result, TokenizerError};

// Core BPE algorithm modules
pub mod core;
pub use self::core::{
    parse_merges, MergeCandidate, MergeMap, MergeQueue, MergeRules, Pair, Spans, Symbol, Vocab,
    VocabR, Vocabulary, Word, UNK_ID,
};
