//! CLI commands for the subword tokenizer.

pub mod benchmark;
pub mod lookup;
pub mod save;
pub mod tokenize;

pub use benchmark::BenchmarkCommand;
pub use lookup::LookupCommand;
pub use save::SaveCommand;
pub use tokenize::TokenizeCommand;

use anyhow::{Context, Result as AnyhowResult};
use clap::Args;
use std::path::PathBuf;
use subword_tokenizer::{Tokenizer, TokenizerBuilder};
use tracing::debug;

/// Model files and tokenizer options shared by every command.
#[derive(Args)]
pub struct ModelArgs {
    /// Path to the vocabulary JSON file
    #[arg(long)]
    pub vocab: PathBuf,

    /// Path to the merges file
    #[arg(long)]
    pub merges: Option<PathBuf>,

    /// Unknown token (defaults to the vocabulary entry with ID 0, if any)
    #[arg(long)]
    pub unk: Option<String>,

    /// Prefix for sub-words that continue a word
    #[arg(long)]
    pub prefix: Option<String>,

    /// Suffix for the sub-word that ends a word
    #[arg(long)]
    pub suffix: Option<String>,

    /// Fuse consecutive unknown characters into one unknown token
    #[arg(long, default_value_t = false)]
    pub fuse_unk: bool,

    /// Result cache capacity (0 disables the cache)
    #[arg(long, default_value_t = subword_tokenizer::DEFAULT_CACHE_CAPACITY)]
    pub cache_capacity: usize,
}

impl ModelArgs {
    /// A builder pre-filled with these arguments.
    pub fn builder(&self) -> TokenizerBuilder {
        debug!(vocab = %self.vocab.display(), merges = ?self.merges, "loading model files");
        let mut builder = Tokenizer::builder()
            .files(&self.vocab, self.merges.clone())
            .fuse_unk(self.fuse_unk)
            .cache_capacity(self.cache_capacity);

        if let Some(unk) = &self.unk {
            builder = builder.unk_token(unk);
        }
        if let Some(prefix) = &self.prefix {
            builder = builder.continuing_subword_prefix(prefix);
        }
        if let Some(suffix) = &self.suffix {
            builder = builder.end_of_word_suffix(suffix);
        }
        builder
    }

    /// Build the tokenizer with no further options.
    pub fn load(&self) -> AnyhowResult<Tokenizer> {
        self.builder()
            .build()
            .with_context(|| format!("Failed to load tokenizer from {}", self.vocab.display()))
    }
}
