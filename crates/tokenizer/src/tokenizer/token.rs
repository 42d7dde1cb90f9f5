//! Output tokens.

use serde::Serialize;

/// A token produced by tokenizing a word.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Token {
    /// Token ID
    pub id: u32,
    /// Vocabulary string for `id`
    pub value: String,
    /// Half-open byte range of the input word covered by this token
    pub offsets: (usize, usize),
}

impl Token {
    /// Create a new token.
    pub fn new(id: u32, value: impl Into<String>, offsets: (usize, usize)) -> Self {
        Self {
            id,
            value: value.into(),
            offsets,
        }
    }

    /// Number of input bytes covered by this token.
    #[inline]
    pub fn len(&self) -> usize {
        self.offsets.1 - self.offsets.0
    }

    /// Check if the token covers no input.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
