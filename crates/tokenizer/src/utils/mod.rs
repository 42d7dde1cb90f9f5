//! Utility modules for the tokenizer.

pub mod cache;

pub use cache::{Cache, WordCache, DEFAULT_CACHE_CAPACITY};
