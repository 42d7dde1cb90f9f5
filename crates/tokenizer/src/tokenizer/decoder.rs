//! Turning token strings back into text.

/// Joins BPE tokens into text, undoing word affixes.
///
/// A continuing-subword prefix at the start of a token is removed and an
/// end-of-word suffix becomes a single space. Trailing whitespace is trimmed.
#[derive(Debug, Clone, Default)]
pub struct BpeDecoder {
    continuing_subword_prefix: Option<String>,
    end_of_word_suffix: Option<String>,
}

impl BpeDecoder {
    /// Create a decoder for the given affixes.
    pub fn new(
        continuing_subword_prefix: Option<String>,
        end_of_word_suffix: Option<String>,
    ) -> Self {
        Self {
            continuing_subword_prefix: continuing_subword_prefix.filter(|p| !p.is_empty()),
            end_of_word_suffix: end_of_word_suffix.filter(|s| !s.is_empty()),
        }
    }

    /// Decode a sequence of token strings.
    pub fn decode<'a, I>(&self, tokens: I) -> String
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut text = String::new();

        for token in tokens {
            let token = match &self.continuing_subword_prefix {
                Some(prefix) => token.strip_prefix(prefix.as_str()).unwrap_or(token),
                None => token,
            };
            match &self.end_of_word_suffix {
                Some(suffix) => text.push_str(&token.replace(suffix.as_str(), " ")),
                None => text.push_str(token),
            }
        }

        text.truncate(text.trim_end().len());
        text
    }
}
