//! subword-tokenizer - High-level word tokenizer API
//!
//! This crate turns a single pre-segmented word into BPE tokens with byte
//! offsets, integrating the vocabulary, merge rules and greedy merge engine
//! from `subword-core` into one shareable `Tokenizer`.
//!
//! # Features
//!
//! - Builder-based configuration (unknown token, word affixes, unknown-token
//!   fusion, merge dropout, cache capacity, random source)
//! - A reader/writer-locked result cache shared by concurrent callers
//! - Loading and saving `vocab.json` / `merges.txt` files
//!
//! # Example
//!
//! ```rust
//! use subword_tokenizer::Tokenizer;
//!
//! let tokenizer = Tokenizer::builder()
//!     .vocab_and_merges(
//!         [("a", 1), ("b", 2), ("c", 3), ("ab", 4), ("abc", 5)],
//!         [("a", "b"), ("ab", "c")],
//!     )
//!     .build()?;
//!
//! let tokens = tokenizer.tokenize("abc")?;
//! assert_eq!(tokens[0].value, "abc");
//! assert_eq!(tokens[0].offsets, (0, 3));
//! # Ok::<(), subword_tokenizer::TokenizerError>(())
//! ```

// Re-export core types
pub use subword_core::{MergeRules, Result, TokenizerError, Vocabulary, Word};

// Tokenizer API
pub mod tokenizer;
pub use tokenizer::{BpeDecoder, Token, Tokenizer, TokenizerBuilder, TokenizerConfig};

// IO/Serialization
pub mod io;
pub use io::{TokenizerLoader, TokenizerSaver, MERGES_HEADER};

// Utilities
pub mod utils;
pub use utils::{Cache, WordCache, DEFAULT_CACHE_CAPACITY};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
