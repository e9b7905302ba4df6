//! Word prefix substitution
//!
//! Replaces known word prefixes with a single symbol, e.g. `"attack"` becomes
//! `"@tack"` and `"forever"` becomes `"4ever"`. Matching is case-insensitive.
//!
//! The dictionary is an ordered list of entries, one per line:
//!
//! ```text
//! <symbol>\t<-\t<prefix1>\t<prefix2>...
//! ```
//!
//! Entries are tried in file order and the first entry holding a matching
//! prefix wins, even if a later entry has a longer one.

use std::fs;
use std::path::Path;

use crate::error::{Result, RuleError};

const MAPPING_SYMBOL: &str = "<-";

const BUILTIN_NAME: &str = "word-prefix-map.txt";

static BUILTIN_MAP: &str = include_str!("word-prefix-map.txt");

/// One symbol with the prefixes it replaces
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixMapping {
    symbol: String,
    prefixes: Vec<String>,
}

impl PrefixMapping {
    /// Create a mapping. Prefixes are stored lowercased.
    pub fn new(symbol: impl Into<String>, prefixes: &[&str]) -> Self {
        Self {
            symbol: symbol.into(),
            prefixes: prefixes.iter().map(|p| p.to_lowercase()).collect(),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    /// First prefix of this mapping that the (lowercased) token starts with
    fn match_prefix(&self, lowercase_token: &str) -> Option<&str> {
        self.prefixes
            .iter()
            .find(|prefix| lowercase_token.starts_with(prefix.as_str()))
            .map(String::as_str)
    }
}

/// Read-only ordered prefix dictionary
///
/// Load it once at startup and share it behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixDictionary {
    mappings: Vec<PrefixMapping>,
}

impl PrefixDictionary {
    pub fn new(mappings: Vec<PrefixMapping>) -> Self {
        Self { mappings }
    }

    /// The dictionary shipped with the crate
    pub fn builtin() -> Result<Self> {
        Self::parse(BUILTIN_NAME, BUILTIN_MAP)
    }

    /// Load a dictionary file in the same format as the built-in one
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| RuleError::resource(path.display().to_string(), e.to_string()))?;
        Self::parse(&path.display().to_string(), &content)
    }

    /// Parse dictionary lines. Blank lines are skipped, anything else
    /// that is not a well-formed entry fails the whole load.
    pub fn parse(source_name: &str, content: &str) -> Result<Self> {
        let mut mappings = Vec::new();

        for (line_no, line) in content.lines().enumerate() {
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.is_empty() {
                continue;
            }

            if fields.len() < 3 || fields[1] != MAPPING_SYMBOL {
                return Err(RuleError::resource(
                    source_name,
                    format!(
                        "line {}: expected '<symbol> {} <prefix>...', got '{}'",
                        line_no + 1,
                        MAPPING_SYMBOL,
                        line
                    ),
                ));
            }

            mappings.push(PrefixMapping::new(fields[0], &fields[2..]));
        }

        log::debug!("Loaded {} prefix mappings from {}", mappings.len(), source_name);
        Ok(Self { mappings })
    }

    /// Replace the first matching prefix of `token` by its symbol.
    ///
    /// The remainder keeps the case of the original token.
    pub fn substitute(&self, token: &str) -> String {
        let lowercase = token.to_lowercase();
        for mapping in &self.mappings {
            if let Some(prefix) = mapping.match_prefix(&lowercase) {
                let rest: String = token.chars().skip(prefix.chars().count()).collect();
                return format!("{}{}", mapping.symbol, rest);
            }
        }
        token.to_string()
    }

    pub fn mappings(&self) -> &[PrefixMapping] {
        &self.mappings
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_builtin_loads() {
        let dict = PrefixDictionary::builtin().unwrap();
        assert!(!dict.is_empty());
        assert_eq!(dict.mappings()[0].symbol(), "8");
    }

    #[test]
    fn test_builtin_substitutions() {
        let dict = PrefixDictionary::builtin().unwrap();
        assert_eq!(dict.substitute("attack"), "@tack");
        assert_eq!(dict.substitute("Forever"), "4ever");
        assert_eq!(dict.substitute("today"), "2day");
        assert_eq!(dict.substitute("ate"), "8");
        assert_eq!(dict.substitute("Atelier"), "8lier");
        assert_eq!(dict.substitute("xylophone"), "xylophone");
    }

    #[test]
    fn test_whole_token_prefix() {
        let dict = PrefixDictionary::new(vec![PrefixMapping::new("B4", &["before"])]);
        assert_eq!(dict.substitute("before"), "B4");
        assert_eq!(dict.substitute("behind"), "behind");
    }

    #[test]
    fn test_suffix_keeps_original_case() {
        let dict = PrefixDictionary::new(vec![PrefixMapping::new("@", &["AT"])]);
        assert_eq!(dict.substitute("ATtEnd"), "@tEnd");
        assert_eq!(dict.substitute("atTIC"), "@TIC");
    }

    #[test]
    fn test_first_entry_wins_over_longer_prefix() {
        let dict = PrefixDictionary::new(vec![
            PrefixMapping::new("b", &["be"]),
            PrefixMapping::new("B4", &["before"]),
        ]);
        assert_eq!(dict.substitute("before"), "bfore");

        let dict = PrefixDictionary::new(vec![
            PrefixMapping::new("B4", &["before"]),
            PrefixMapping::new("b", &["be"]),
        ]);
        assert_eq!(dict.substitute("before"), "B4");
        assert_eq!(dict.substitute("beware"), "bware");
    }

    #[test]
    fn test_parse_entries() {
        let dict = PrefixDictionary::parse("test", "@\t<-\tat\t\n\n&\t<-\tand\tAmpersand\t\n").unwrap();
        assert_eq!(dict.len(), 2);
        assert_eq!(dict.mappings()[1].prefixes(), &["and".to_string(), "ampersand".to_string()]);
    }

    #[test]
    fn test_parse_malformed() {
        let err = PrefixDictionary::parse("test", "@\t<-\tat\n&\t=\tand\n").unwrap_err();
        match err {
            RuleError::ResourceLoad { source_name, reason } => {
                assert_eq!(source_name, "test");
                assert!(reason.starts_with("line 2"));
            }
            other => panic!("unexpected error: {:?}", other),
        }

        assert!(PrefixDictionary::parse("test", "@\t<-\n").is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "B4\t<-\tbefore\t").unwrap();
        writeln!(file, "2\t<-\tto\t").unwrap();

        let dict = PrefixDictionary::from_file(file.path()).unwrap();
        assert_eq!(dict.substitute("Before"), "B4");
        assert_eq!(dict.substitute("tomorrow"), "2morrow");
    }

    #[test]
    fn test_missing_file() {
        let err = PrefixDictionary::from_file(Path::new("/nonexistent/prefix-map.txt")).unwrap_err();
        assert!(matches!(err, RuleError::ResourceLoad { .. }));
    }
}
