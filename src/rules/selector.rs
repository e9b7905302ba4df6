//! Selector grammar
//!
//! Parses the human-readable position strings used in rule configurations:
//!
//! - ordinals: `1st`, `2nd`, `23rd`, `4th`, ...
//! - back ordinals: `last`, `1stlast`, `2ndlast`, ...
//! - selections: `every`, `every2nd`, `every3rd`, ...
//! - index lists: `1st+last`, `1st+2nd+3rd`, ...

use crate::error::{Result, RuleError};

const KEYWORD_FROM_BACK: &str = "last";

const KEYWORD_SELECTION: &str = "every";

const INDEX_SEPARATOR: char = '+';

/// Parse an ordinal into a signed character index.
///
/// Front ordinals map to their number minus one (`"1st"` is `0`), back
/// ordinals to their negated number (`"2ndlast"` is `-2`) and `"last"` to `-1`.
/// The two suffix letters are required but not checked against the number.
pub fn parse_ordinal_index(text: &str) -> Result<isize> {
    let from_back = text.ends_with(KEYWORD_FROM_BACK);
    if from_back && text.len() == KEYWORD_FROM_BACK.len() {
        return Ok(-1);
    }

    let body = if from_back {
        &text[..text.len() - KEYWORD_FROM_BACK.len()]
    } else {
        text
    };

    let chars: Vec<char> = body.chars().collect();
    if chars.len() < 3 || !chars[chars.len() - 2..].iter().all(|c| c.is_alphabetic()) {
        return Err(RuleError::validation(format!(
            "Index strings must end in a two-letter number suffix, such a suffix \
             followed by \"{}\", or be \"{}\", but given string does not: '{}'",
            KEYWORD_FROM_BACK, KEYWORD_FROM_BACK, text
        )));
    }

    let number_str: String = chars[..chars.len() - 2].iter().collect();
    let number: isize = number_str
        .parse()
        .map_err(|_| RuleError::validation(format!("Invalid number in index string: '{}'", text)))?;
    if number < 1 {
        return Err(RuleError::validation(format!(
            "Index strings must start with a positive number: '{}'",
            text
        )));
    }

    Ok(if from_back { -number } else { number - 1 })
}

/// Parse an `every...` selection into the step between selected elements.
pub fn parse_selection_count(text: &str) -> Result<usize> {
    let Some(rest) = text.strip_prefix(KEYWORD_SELECTION) else {
        return Err(RuleError::validation(format!(
            "Selection strings must start with \"{}\", but given string does not: '{}'",
            KEYWORD_SELECTION, text
        )));
    };

    if rest.is_empty() {
        return Ok(1);
    }

    let index = parse_ordinal_index(rest.trim())?;
    if index < 0 {
        return Err(RuleError::validation(format!(
            "Selection strings must contain a positive index or be \"{}\", but given string is not: '{}'",
            KEYWORD_SELECTION, text
        )));
    }

    Ok(index as usize + 1)
}

/// Parse a `+`-separated list of ordinals, keeping the given order.
///
/// Trailing separators are ignored (`1st+` is `1st`); empty entries
/// anywhere else are rejected.
pub fn parse_index_list(text: &str) -> Result<Vec<isize>> {
    let mut parts: Vec<&str> = text.split(INDEX_SEPARATOR).map(str::trim).collect();
    while parts.len() > 1 && parts.last() == Some(&"") {
        parts.pop();
    }
    parts.into_iter().map(parse_ordinal_index).collect()
}
