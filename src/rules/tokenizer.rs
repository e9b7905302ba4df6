//! Word tokenization

use unicode_segmentation::UnicodeSegmentation;

use crate::error::{Result, RuleError};

/// Locale used when none is given
pub const DEFAULT_LOCALE: &str = "en";

/// Splits text into word tokens at Unicode word boundaries.
///
/// Every fragment between two boundaries is trimmed and kept only if something
/// remains, so whitespace never becomes a token while punctuation does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tokenizer {
    locale: String,
}

impl Tokenizer {
    /// Create a tokenizer for English
    pub fn new() -> Self {
        Self::for_locale(DEFAULT_LOCALE)
    }

    /// Create a tokenizer for a BCP 47 language tag.
    ///
    /// Segmentation follows the default UAX #29 word boundary rules, which
    /// are the ones used for English and most space-delimited languages.
    pub fn for_locale(locale: &str) -> Self {
        Self {
            locale: locale.to_string(),
        }
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Segment `text` into its non-empty tokens, in order of appearance.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        text.split_word_bounds()
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Like [`tokenize`](Self::tokenize), failing on absent input.
    pub fn tokenize_opt(&self, text: Option<&str>) -> Result<Vec<String>> {
        text.map(|t| self.tokenize(t))
            .ok_or(RuleError::MissingInput { stage: "tokenizer" })
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}
