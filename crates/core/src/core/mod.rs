//! Core BPE algorithm implementation.
//!
//! This module contains the fundamental data structures and algorithms
//! for byte-pair encoding, independent of how words are produced or
//! how results are rendered.

pub mod merges;
pub mod priority;
pub mod vocab;
pub mod word;

pub use merges::{parse_merges, MergeMap, MergeRules, Pair};
pub use priority::{MergeCandidate, MergeQueue};
pub use vocab::{Vocab, VocabR, Vocabulary, UNK_ID};
pub use word::{Spans, Symbol, Word};
