//! Main tokenizer implementation.
//!
//! This module provides the high-level `Tokenizer` struct that integrates
//! the vocabulary, merge rules, result cache and dropout random source.

mod decoder;
mod token;

pub use decoder::BpeDecoder;
pub use token::Token;

use crate::io::{TokenizerLoader, TokenizerSaver};
use crate::utils::{WordCache, DEFAULT_CACHE_CAPACITY};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use subword_core::{MergeRules, Result, TokenizerError, Vocabulary, Word, UNK_ID};
use tracing::{debug, trace};

/// Configuration for building a tokenizer.
#[derive(Debug, Clone)]
pub struct TokenizerConfig {
    /// Token substituted for characters missing from the vocabulary
    pub unk_token: Option<String>,
    /// Prefix attached to every symbol that does not start a word
    pub continuing_subword_prefix: Option<String>,
    /// Suffix attached to the symbol that ends a word
    pub end_of_word_suffix: Option<String>,
    /// Collapse consecutive unknown characters into one unknown token
    pub fuse_unk: bool,
    /// Probability of skipping each merge, in `[0, 1]`
    pub dropout: Option<f32>,
    /// Capacity of the result cache, 0 disables it
    pub cache_capacity: usize,
    /// Seed for the dropout random source
    pub seed: Option<u64>,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            unk_token: None,
            continuing_subword_prefix: None,
            end_of_word_suffix: None,
            fuse_unk: false,
            dropout: None,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            seed: None,
        }
    }
}

/// Where the vocabulary and merge rules come from.
#[derive(Debug, Clone, Default)]
enum ModelSource {
    #[default]
    Empty,
    Files {
        vocab: PathBuf,
        merges: Option<PathBuf>,
    },
    Memory {
        vocab: Vec<(String, u32)>,
        merges: Vec<(String, String)>,
    },
}

impl ModelSource {
    fn read(self) -> Result<(Vec<(String, u32)>, Vec<(String, String)>)> {
        match self {
            Self::Empty => Ok((Vec::new(), Vec::new())),
            Self::Files { vocab, merges } => {
                let vocab = TokenizerLoader::read_vocab(&vocab)?;
                let merges = match merges {
                    Some(path) => TokenizerLoader::read_merges(&path)?,
                    None => Vec::new(),
                };
                Ok((vocab, merges))
            }
            Self::Memory { vocab, merges } => Ok((vocab, merges)),
        }
    }
}

/// Builder for creating a tokenizer.
#[derive(Default)]
pub struct TokenizerBuilder {
    config: TokenizerConfig,
    source: ModelSource,
    rng: Option<Box<dyn RngCore + Send>>,
}

impl TokenizerBuilder {
    /// Create a new tokenizer builder with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration.
    pub fn with_config(mut self, config: TokenizerConfig) -> Self {
        self.config = config;
        self
    }

    /// Load the vocabulary and, if given, the merge rules from files.
    pub fn files(mut self, vocab: impl Into<PathBuf>, merges: Option<PathBuf>) -> Self {
        self.source = ModelSource::Files {
            vocab: vocab.into(),
            merges,
        };
        self
    }

    /// Use an in-memory vocabulary and merge rules listed in priority order.
    pub fn vocab_and_merges<V, M, S1, S2, S3>(mut self, vocab: V, merges: M) -> Self
    where
        V: IntoIterator<Item = (S1, u32)>,
        M: IntoIterator<Item = (S2, S3)>,
        S1: Into<String>,
        S2: Into<String>,
        S3: Into<String>,
    {
        self.source = ModelSource::Memory {
            vocab: vocab.into_iter().map(|(t, id)| (t.into(), id)).collect(),
            merges: merges
                .into_iter()
                .map(|(a, b)| (a.into(), b.into()))
                .collect(),
        };
        self
    }

    /// Set the unknown token.
    pub fn unk_token(mut self, token: impl Into<String>) -> Self {
        self.config.unk_token = Some(token.into());
        self
    }

    /// Set the continuing-subword prefix.
    pub fn continuing_subword_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.continuing_subword_prefix = Some(prefix.into());
        self
    }

    /// Set the end-of-word suffix.
    pub fn end_of_word_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.config.end_of_word_suffix = Some(suffix.into());
        self
    }

    /// Fuse consecutive unknown characters into one unknown token.
    pub fn fuse_unk(mut self, fuse: bool) -> Self {
        self.config.fuse_unk = fuse;
        self
    }

    /// Set the merge dropout probability.
    pub fn dropout(mut self, dropout: f32) -> Self {
        self.config.dropout = Some(dropout);
        self
    }

    /// Set the result cache capacity.
    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.config.cache_capacity = capacity;
        self
    }

    /// Seed the dropout random source.
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Use a custom dropout random source. Takes precedence over `seed`.
    pub fn rng(mut self, rng: impl RngCore + Send + 'static) -> Self {
        self.rng = Some(Box::new(rng));
        self
    }

    /// Build the tokenizer.
    pub fn build(self) -> Result<Tokenizer> {
        let Self {
            mut config,
            source,
            rng,
        } = self;

        if let Some(dropout) = config.dropout {
            if !(0.0..=1.0).contains(&dropout) {
                return Err(TokenizerError::InvalidConfig(format!(
                    "Dropout must be within [0, 1], got {}",
                    dropout
                )));
            }
        }

        let (entries, rules) = source.read()?;
        let mut vocab = Vocabulary::from_entries(entries)?;

        // Without an explicit unknown token, whatever sits at its id is adopted.
        let unk_token = config
            .unk_token
            .take()
            .or_else(|| vocab.get_token(UNK_ID).map(str::to_owned));
        vocab.set_unk_token(unk_token.as_deref());
        config.unk_token = unk_token;

        let merges =
            MergeRules::from_rules(&vocab, &rules, config.continuing_subword_prefix.as_deref())?;

        let rng: Box<dyn RngCore + Send> = match (rng, config.seed) {
            (Some(rng), _) => rng,
            (None, Some(seed)) => Box::new(StdRng::seed_from_u64(seed)),
            (None, None) => Box::new(StdRng::from_os_rng()),
        };

        debug!(
            vocab_size = vocab.len(),
            merge_count = merges.len(),
            unk_token = ?config.unk_token,
            dropout = ?config.dropout,
            cache_capacity = config.cache_capacity,
            "BPE tokenizer initialized"
        );

        Ok(Tokenizer::from_parts(vocab, merges, config, rng))
    }
}

/// Main tokenizer struct.
///
/// A tokenizer is immutable after construction apart from its result cache
/// and random source, both of which are internally synchronized, so one
/// instance can be shared across threads.
pub struct Tokenizer {
    vocab: Vocabulary,
    merges: MergeRules,
    config: TokenizerConfig,
    cache: Option<WordCache>,
    rng: Mutex<Box<dyn RngCore + Send>>,
    decoder: BpeDecoder,
}

impl fmt::Debug for Tokenizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tokenizer")
            .field("vocab_size", &self.vocab.len())
            .field("merges", &self.merges.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Tokenizer {
    fn from_parts(
        vocab: Vocabulary,
        merges: MergeRules,
        config: TokenizerConfig,
        rng: Box<dyn RngCore + Send>,
    ) -> Self {
        let cache = (config.cache_capacity > 0)
            .then(|| WordCache::with_capacity(config.cache_capacity));
        let decoder = BpeDecoder::new(
            config.continuing_subword_prefix.clone(),
            config.end_of_word_suffix.clone(),
        );

        Self {
            vocab,
            merges,
            config,
            cache,
            rng: Mutex::new(rng),
            decoder,
        }
    }

    /// Create a tokenizer builder.
    pub fn builder() -> TokenizerBuilder {
        TokenizerBuilder::new()
    }

    /// Load a tokenizer from a vocabulary file and merges file with default settings.
    pub fn from_files(vocab: &Path, merges: &Path) -> Result<Self> {
        Self::builder()
            .files(vocab, Some(merges.to_path_buf()))
            .build()
    }

    /// Tokenize one pre-segmented word.
    ///
    /// Offsets in the returned tokens are byte offsets into `word`. An empty
    /// word yields no tokens. With dropout configured the result cache is
    /// neither consulted nor filled, and merging draws from the shared random
    /// source while holding its lock.
    pub fn tokenize(&self, word: &str) -> Result<Vec<Token>> {
        if word.is_empty() {
            return Ok(Vec::new());
        }

        if let Some(dropout) = self.config.dropout {
            let mut symbols = self.split_word(word)?;
            {
                let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
                symbols.merge_all_with_dropout(&self.merges, dropout, &mut **rng);
            }
            return self.word_to_tokens(&symbols);
        }

        if let Some(hit) = self.cache.as_ref().and_then(|cache| cache.get(word)) {
            trace!(word, "cache hit");
            return self.word_to_tokens(&hit);
        }

        let symbols = self.merge_word(word)?;
        let tokens = self.word_to_tokens(&symbols)?;
        if let Some(cache) = &self.cache {
            trace!(word, "cache miss");
            cache.set(word.to_owned(), symbols);
        }

        Ok(tokens)
    }

    /// Tokenize many words in parallel.
    pub fn tokenize_batch<S>(&self, words: &[S]) -> Result<Vec<Vec<Token>>>
    where
        S: AsRef<str> + Sync,
    {
        use rayon::prelude::*;

        words
            .par_iter()
            .map(|word| self.tokenize(word.as_ref()))
            .collect()
    }

    /// Split `word` into its initial symbols and apply every merge, without
    /// dropout and without touching the cache.
    pub fn merge_word(&self, word: &str) -> Result<Word> {
        let mut symbols = self.split_word(word)?;
        symbols.merge_all(&self.merges);
        Ok(symbols)
    }

    /// Render a merged word as tokens.
    pub fn word_to_tokens(&self, word: &Word) -> Result<Vec<Token>> {
        word.spans()
            .map(|(id, offsets)| {
                let value = self
                    .vocab
                    .get_token(id)
                    .ok_or(TokenizerError::UnknownTokenId(id))?;
                Ok(Token::new(id, value, offsets))
            })
            .collect()
    }

    /// One symbol per character, affixed as configured; characters missing
    /// from the vocabulary become unknown-token symbols.
    fn split_word(&self, word: &str) -> Result<Word> {
        let prefix = self.config.continuing_subword_prefix.as_deref();
        let suffix = self.config.end_of_word_suffix.as_deref();

        let mut symbols = Word::with_capacity(word.len());
        let mut unk: Option<(u32, usize)> = None;
        let mut piece = String::new();

        for (start, ch) in word.char_indices() {
            let len = ch.len_utf8();

            piece.clear();
            if let Some(prefix) = prefix.filter(|_| start > 0) {
                piece.push_str(prefix);
            }
            piece.push(ch);
            if let Some(suffix) = suffix.filter(|_| start + len == word.len()) {
                piece.push_str(suffix);
            }

            if let Some(id) = self.vocab.get_id(&piece) {
                if let Some((unk_id, unk_len)) = unk.take() {
                    symbols.add(unk_id, unk_len);
                }
                symbols.add(id, len);
                continue;
            }

            let unk_id = self
                .vocab
                .unk_id()
                .ok_or(TokenizerError::Unrepresentable {
                    character: ch,
                    position: start,
                })?;
            unk = match unk {
                Some((id, unk_len)) if self.config.fuse_unk => Some((id, unk_len + len)),
                Some((id, unk_len)) => {
                    symbols.add(id, unk_len);
                    Some((unk_id, len))
                }
                None => Some((unk_id, len)),
            };
        }

        if let Some((unk_id, unk_len)) = unk {
            symbols.add(unk_id, unk_len);
        }

        Ok(symbols)
    }

    /// Decode token IDs back to text.
    pub fn decode(&self, ids: &[u32]) -> Result<String> {
        let tokens = ids
            .iter()
            .map(|&id| {
                self.vocab
                    .get_token(id)
                    .ok_or(TokenizerError::UnknownTokenId(id))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(self.decoder.decode(tokens))
    }

    /// Get the ID for a token string.
    pub fn token_to_id(&self, token: &str) -> Option<u32> {
        self.vocab.get_id(token)
    }

    /// Get the token string for an ID.
    pub fn id_to_token(&self, id: u32) -> Option<&str> {
        self.vocab.get_token(id)
    }

    /// Get the vocabulary size.
    pub fn vocab_size(&self) -> usize {
        self.vocab.len()
    }

    /// Get a reference to the vocabulary.
    pub fn vocab(&self) -> &Vocabulary {
        &self.vocab
    }

    /// Get a reference to the merge rules.
    pub fn merges(&self) -> &MergeRules {
        &self.merges
    }

    /// Get the configuration the tokenizer was built with.
    pub fn config(&self) -> &TokenizerConfig {
        &self.config
    }

    /// The unknown token, if any.
    pub fn unk_token(&self) -> Option<&str> {
        self.vocab.unk_token()
    }

    /// The continuing-subword prefix, if any.
    pub fn continuing_subword_prefix(&self) -> Option<&str> {
        self.config.continuing_subword_prefix.as_deref()
    }

    /// The end-of-word suffix, if any.
    pub fn end_of_word_suffix(&self) -> Option<&str> {
        self.config.end_of_word_suffix.as_deref()
    }

    /// The merge dropout probability, if any.
    pub fn dropout(&self) -> Option<f32> {
        self.config.dropout
    }

    /// Whether consecutive unknown characters are fused.
    pub fn fuse_unk(&self) -> bool {
        self.config.fuse_unk
    }

    /// The result cache, unless disabled.
    pub fn cache(&self) -> Option<&WordCache> {
        self.cache.as_ref()
    }

    /// Empty the result cache.
    pub fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.clear();
        }
    }

    /// Save the vocabulary and merges files into `dir`.
    ///
    /// Returns the vocabulary and merges paths, in that order.
    pub fn save(&self, dir: &Path, prefix: Option<&str>) -> Result<(PathBuf, PathBuf)> {
        TokenizerSaver::new(&self.vocab, &self.merges).save(dir, prefix)
    }
}
