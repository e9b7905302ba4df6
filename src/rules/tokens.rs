//! Token selection

use crate::error::{Result, RuleError};
use crate::rules::selector::parse_selection_count;

/// Keeps every nth token, starting with the first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EveryNth {
    n: usize,
}

impl EveryNth {
    pub fn new(n: usize) -> Result<Self> {
        if n < 1 {
            return Err(RuleError::validation(format!("Non-positive word count: {}", n)));
        }
        Ok(Self { n })
    }

    /// Build from a selection string such as `"every"` or `"every2nd"`
    pub fn parse(selection: &str) -> Result<Self> {
        Self::new(parse_selection_count(selection)?)
    }

    pub fn n(&self) -> usize {
        self.n
    }

    /// Keep the tokens at positions `0, n, 2n, ...`
    pub fn select(&self, tokens: Vec<String>) -> Vec<String> {
        if self.n == 1 {
            return tokens;
        }
        tokens.into_iter().step_by(self.n).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_every_second() {
        let filter = EveryNth::new(2).unwrap();
        assert_eq!(
            filter.select(tokens(&["a", "b", "c", "d", "e"])),
            tokens(&["a", "c", "e"])
        );
    }

    #[test]
    fn test_every_third_from_selection() {
        let filter = EveryNth::parse("every3rd").unwrap();
        assert_eq!(filter.n(), 3);
        assert_eq!(
            filter.select(tokens(&["a", "b", "c", "d", "e", "f", "g"])),
            tokens(&["a", "d", "g"])
        );
    }

    #[test]
    fn test_identity() {
        let filter = EveryNth::parse("every").unwrap();
        let input = tokens(&["one", "two", "three"]);
        assert_eq!(filter.select(input.clone()), input);
    }

    #[test]
    fn test_empty_and_short_inputs() {
        let filter = EveryNth::new(4).unwrap();
        assert!(filter.select(Vec::new()).is_empty());
        assert_eq!(filter.select(tokens(&["a", "b"])), tokens(&["a"]));
    }

    #[test]
    fn test_zero_rejected() {
        assert!(EveryNth::new(0).unwrap_err().is_validation());
    }
}
