//! Character selection within a token

use crate::error::Result;
use crate::rules::selector::parse_index_list;

/// Picks characters at fixed positions of a token.
///
/// Index `0` is the first character and `-1` the last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterIndices {
    indices: Vec<isize>,
    output_duplicates: bool,
    round_robin: bool,
}

impl CharacterIndices {
    /// Create a selector.
    ///
    /// With `output_duplicates` a position named several times is emitted
    /// every time. With `round_robin` indices outside the token wrap around
    /// instead of being skipped.
    pub fn new(indices: Vec<isize>, output_duplicates: bool, round_robin: bool) -> Self {
        Self {
            indices,
            output_duplicates,
            round_robin,
        }
    }

    /// Build from an index list such as `"1st+last"`
    pub fn parse(config: &str, output_duplicates: bool, round_robin: bool) -> Result<Self> {
        Ok(Self::new(parse_index_list(config)?, output_duplicates, round_robin))
    }

    pub fn indices(&self) -> &[isize] {
        &self.indices
    }

    /// Concatenate the selected characters of `token` in index order
    pub fn select(&self, token: &str) -> String {
        let chars: Vec<char> = token.chars().collect();
        if chars.is_empty() {
            return String::new();
        }

        let len = chars.len() as isize;
        let mut emitted = vec![false; chars.len()];
        let mut output = String::with_capacity(self.indices.len());

        for &index in &self.indices {
            if !self.round_robin && (index < -len || index >= len) {
                continue;
            }

            let position = index.rem_euclid(len) as usize;
            if emitted[position] {
                continue;
            }

            output.push(chars[position]);
            if !self.output_duplicates {
                emitted[position] = true;
            }
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_and_last() {
        let filter = CharacterIndices::parse("1st+last", false, false).unwrap();
        assert_eq!(filter.select("Cat"), "Ct");
        assert_eq!(filter.select("a"), "a");
    }

    #[test]
    fn test_order_follows_indices() {
        let filter = CharacterIndices::new(vec![-1, 0, 1], false, false);
        assert_eq!(filter.select("abcd"), "dab");
    }

    #[test]
    fn test_duplicates() {
        let suppress = CharacterIndices::new(vec![0, 0], false, false);
        assert_eq!(suppress.select("ab"), "a");

        let keep = CharacterIndices::new(vec![0, 0], true, false);
        assert_eq!(keep.select("ab"), "aa");

        // -2 and 0 name the same position of a two-character token
        assert_eq!(CharacterIndices::new(vec![0, -2], false, false).select("ab"), "a");
    }

    #[test]
    fn test_out_of_range_skipped() {
        let filter = CharacterIndices::new(vec![5], false, false);
        assert_eq!(filter.select("abc"), "");

        let filter = CharacterIndices::new(vec![-4, 1], false, false);
        assert_eq!(filter.select("abc"), "b");
    }

    #[test]
    fn test_round_robin_wraps() {
        let filter = CharacterIndices::new(vec![5], false, true);
        assert_eq!(filter.select("abc"), "c");

        let filter = CharacterIndices::new(vec![-4], false, true);
        assert_eq!(filter.select("abc"), "c");
    }

    #[test]
    fn test_empty_token() {
        let filter = CharacterIndices::new(vec![0, -1], true, true);
        assert_eq!(filter.select(""), "");
    }

    #[test]
    fn test_invalid_config() {
        assert!(CharacterIndices::parse("", false, false).is_err());
        assert!(CharacterIndices::parse("first", false, false).is_err());
    }
}
