//! Character set normalization
//!
//! Casts arbitrary Unicode text into one of the target alphabets a rule can
//! produce passwords in. Both conversions first spell out symbols the Unicode
//! decompositions leave alone, then decompose, then strip what is left over.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::error::RuleError;

/// Configuration value selecting [`CharacterSet::Ascii`]
pub const CHARSET_ASCII: &str = "ascii";

/// Configuration value selecting [`CharacterSet::LowercaseLetters`]
pub const CHARSET_LOWERCASE_LETTERS: &str = "lowercase-letters";

static NON_ASCII: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\x00-\x7F]").unwrap());

static CONTROL_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\x00-\x1F\x7F]").unwrap());

static NON_LETTERS_OR_SPACES: Lazy<Regex> = Lazy::new(|| Regex::new("[^a-zA-Z \t\n]").unwrap());

/// Target alphabet of the normalization step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharacterSet {
    /// 7-bit visible US-ASCII
    Ascii,
    /// The 26 lowercase latin letters plus space, tab and newline
    LowercaseLetters,
}

impl CharacterSet {
    /// Convert `text` into this character set.
    pub fn normalize(&self, text: &str) -> String {
        let decomposed = decompose(&ascii_dictionary_mapping(text));
        match self {
            Self::Ascii => strip_control_chars(&strip_non_ascii(&decomposed)),
            Self::LowercaseLetters => strip_non_letters_or_spaces(&decomposed).to_lowercase(),
        }
    }

    /// Like [`normalize`](Self::normalize), passing absent input through.
    pub fn normalize_opt(&self, text: Option<&str>) -> Option<String> {
        text.map(|t| self.normalize(t))
    }

    /// The configuration value for this character set
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ascii => CHARSET_ASCII,
            Self::LowercaseLetters => CHARSET_LOWERCASE_LETTERS,
        }
    }
}

impl FromStr for CharacterSet {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            CHARSET_ASCII => Ok(Self::Ascii),
            CHARSET_LOWERCASE_LETTERS => Ok(Self::LowercaseLetters),
            other => Err(RuleError::validation(format!("No valid character set: '{}'", other))),
        }
    }
}

impl fmt::Display for CharacterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compatibility composition followed by canonical decomposition.
///
/// Folds compatibility glyphs (the ellipsis becomes three periods) and then
/// splits accented letters into a base letter and combining marks.
pub fn decompose(text: &str) -> String {
    text.nfkc().nfd().collect()
}

/// Remove every code point above 127.
pub fn strip_non_ascii(text: &str) -> String {
    NON_ASCII.replace_all(text, "").into_owned()
}

/// Remove ASCII control characters.
pub fn strip_control_chars(text: &str) -> String {
    CONTROL_CHARS.replace_all(text, "").into_owned()
}

/// Remove everything but latin letters, space, tab and newline.
pub fn strip_non_letters_or_spaces(text: &str) -> String {
    NON_LETTERS_OR_SPACES.replace_all(text, "").into_owned()
}

/// Spell out latin-1 supplement symbols and the euro sign.
///
/// These are not reached by the Unicode decompositions. The table is
/// incomplete by nature.
pub fn ascii_dictionary_mapping(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    for c in text.chars() {
        match ascii_replacement(c) {
            Some(replacement) => output.push_str(replacement),
            None => output.push(c),
        }
    }
    output
}

fn ascii_replacement(c: char) -> Option<&'static str> {
    let replacement = match c {
        '\u{00A2}' => "Cent",
        '\u{00A3}' => "Pound",
        '\u{00A5}' => "Yen",
        '\u{00A6}' => "|",
        '\u{00A9}' => "C",
        '\u{00AB}' => "\"",
        '\u{00AE}' => "R",
        '\u{00B1}' => "+-",
        '\u{00B5}' => "mu",
        '\u{00BB}' => "\"",
        '\u{00BC}' => "1/4",
        '\u{00BD}' => "1/2",
        '\u{00BE}' => "3/4",
        '\u{00C6}' => "AE",
        '\u{00D0}' => "D",
        '\u{00D7}' => "x",
        '\u{00D8}' => "O",
        '\u{00DE}' => "Th", // capital thorn
        '\u{00DF}' => "ss",
        '\u{00E6}' => "ae",
        '\u{00F0}' => "d",
        '\u{00F7}' => "/",
        '\u{00F8}' => "o",
        '\u{00FE}' => "th", // small thorn
        '\u{20AC}' => "Euro",
        _ => return None,
    };
    Some(replacement)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_charset() {
        assert_eq!("ascii".parse::<CharacterSet>().unwrap(), CharacterSet::Ascii);
        assert_eq!(
            "lowercase-letters".parse::<CharacterSet>().unwrap(),
            CharacterSet::LowercaseLetters
        );
        assert!("ASCII".parse::<CharacterSet>().unwrap_err().is_validation());
        assert!("latin1".parse::<CharacterSet>().is_err());
    }

    #[test]
    fn test_dictionary_mapping() {
        assert_eq!(ascii_dictionary_mapping("5€"), "5Euro");
        assert_eq!(ascii_dictionary_mapping("Æsir straße"), "AEsir strasse");
        assert_eq!(ascii_dictionary_mapping("½ × ¾"), "1/2 x 3/4");
        assert_eq!(ascii_dictionary_mapping("«þórr»"), "\"thórr\"");
    }

    #[test]
    fn test_ascii_strips_diacritics() {
        let ascii = CharacterSet::Ascii;
        assert_eq!(ascii.normalize("Crème brûlée"), "Creme brulee");
        assert_eq!(ascii.normalize("naïve café"), "naive cafe");
    }

    #[test]
    fn test_ascii_compatibility_folding() {
        let ascii = CharacterSet::Ascii;
        assert_eq!(ascii.normalize("wait\u{2026}"), "wait...");
        assert_eq!(ascii.normalize("\u{FB01}ne"), "fine");
    }

    #[test]
    fn test_ascii_removes_remaining() {
        let ascii = CharacterSet::Ascii;
        assert_eq!(ascii.normalize("日本 go"), " go");
        assert_eq!(ascii.normalize("tab\there\nline"), "tabhereline");
    }

    #[test]
    fn test_lowercase_letters() {
        let lower = CharacterSet::LowercaseLetters;
        assert_eq!(lower.normalize("Hello, World! 123"), "hello world ");
        assert_eq!(lower.normalize("Ærøskøbing"), "aeroskobing");
        assert_eq!(lower.normalize("a\tb\nc\rd"), "a\tb\ncd");
    }

    #[test]
    fn test_absent_input() {
        assert_eq!(CharacterSet::Ascii.normalize_opt(None), None);
        assert_eq!(
            CharacterSet::LowercaseLetters.normalize_opt(Some("ABC")),
            Some("abc".to_string())
        );
    }

    #[test]
    fn test_ascii_idempotent() {
        let ascii = CharacterSet::Ascii;
        let once = ascii.normalize("Ça coûte 5€ — ½ prix…");
        assert_eq!(ascii.normalize(&once), once);
    }
}
