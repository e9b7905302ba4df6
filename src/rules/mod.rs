//! Password generation rules
//!
//! A rule turns a phrase into a password by running a fixed chain of stages:
//!
//! 1. normalize the phrase into a character set and split it into tokens
//! 2. optionally replace word prefixes by symbols
//! 3. keep every nth token
//! 4. keep selected characters of each token
//!
//! The surviving characters are concatenated into the password.
//!
//! ```rust,no_run
//! use password_rules::rules::{Rule, RuleConfig};
//!
//! let config = RuleConfig::parse("ascii", "none", "every", "1st", None).unwrap();
//! let rule = Rule::new(&config, None).unwrap();
//! assert_eq!(rule.apply("Hello World"), "HW");
//! ```

pub mod charset;
pub mod chars;
pub mod prefix;
pub mod selector;
pub mod tokenizer;
pub mod tokens;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{Result, RuleError};

pub use charset::CharacterSet;
pub use chars::CharacterIndices;
pub use prefix::{PrefixDictionary, PrefixMapping};
pub use tokenizer::Tokenizer;
pub use tokens::EveryNth;

/// Configuration value selecting [`Replacement::None`]
pub const REPLACE_NONE: &str = "none";

/// Configuration value selecting [`Replacement::WordPrefixes`]
pub const REPLACE_WORD_PREFIXES: &str = "word-prefixes";

/// Smallest number of rule fields on a command line
pub const MIN_RULE_ARGS: usize = 4;

/// Largest number of rule fields on a command line
pub const MAX_RULE_ARGS: usize = 5;

/// Token replacement mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Replacement {
    /// Tokens are left as they are
    None,
    /// Word prefixes are replaced using a [`PrefixDictionary`]
    WordPrefixes,
}

impl Replacement {
    pub fn needs_dictionary(&self) -> bool {
        matches!(self, Self::WordPrefixes)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => REPLACE_NONE,
            Self::WordPrefixes => REPLACE_WORD_PREFIXES,
        }
    }
}

impl FromStr for Replacement {
    type Err = RuleError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            REPLACE_NONE => Ok(Self::None),
            REPLACE_WORD_PREFIXES => Ok(Self::WordPrefixes),
            other => Err(RuleError::validation(format!(
                "No valid replacement configuration: '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for Replacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsed rule configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleConfig {
    pub charset: CharacterSet,
    pub replacement: Replacement,
    /// Keep every nth token
    pub token_selector: usize,
    /// Character positions taken from each token, in output order
    pub character_selector: Vec<isize>,
    /// Put a space between each pair of output characters
    pub add_spaces: bool,
}

impl RuleConfig {
    /// Parse the configuration fields.
    ///
    /// `add_spaces` is `true` or `false` (any case) and defaults to `false`.
    pub fn parse(
        charset: &str,
        replacement: &str,
        token_selector: &str,
        character_selector: &str,
        add_spaces: Option<&str>,
    ) -> Result<Self> {
        let config = Self {
            charset: charset.parse()?,
            replacement: replacement.parse()?,
            token_selector: EveryNth::parse(token_selector)?.n(),
            character_selector: selector::parse_index_list(character_selector)?,
            add_spaces: match add_spaces {
                Some(flag) => parse_flag(flag)?,
                None => false,
            },
        };
        log::debug!("Parsed rule configuration: {:?}", config);
        Ok(config)
    }

    /// Parse the fields found in `args` from index `start` on.
    ///
    /// Exactly four or five fields must follow `start`.
    pub fn from_args<S: AsRef<str>>(args: &[S], start: usize) -> Result<Self> {
        let fields: Vec<&str> = args.iter().skip(start).map(AsRef::as_ref).collect();
        if fields.len() < MIN_RULE_ARGS || fields.len() > MAX_RULE_ARGS {
            return Err(RuleError::validation(format!(
                "Invalid number of arguments: {}",
                fields.len()
            )));
        }

        Self::parse(fields[0], fields[1], fields[2], fields[3], fields.get(4).copied())
    }
}

fn parse_flag(flag: &str) -> Result<bool> {
    if flag.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if flag.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(RuleError::validation(format!(
            "Add-spaces flag must be 'true' or 'false': '{}'",
            flag
        )))
    }
}

/// Points in the pipeline at which [`Rule::apply_in_steps`] takes a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Tokenize,
    Replace,
    SelectTokens,
    SelectCharacters,
}

impl Step {
    pub const ALL: [Step; 4] = [
        Step::Tokenize,
        Step::Replace,
        Step::SelectTokens,
        Step::SelectCharacters,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Tokenize => "tokenize",
            Self::Replace => "replace",
            Self::SelectTokens => "select tokens",
            Self::SelectCharacters => "select characters",
        }
    }
}

/// A token list stage of the pipeline
#[derive(Debug, Clone)]
enum Stage {
    Replace(Option<Arc<PrefixDictionary>>),
    SelectTokens(EveryNth),
    SelectCharacters(CharacterIndices),
}

impl Stage {
    fn step(&self) -> Step {
        match self {
            Self::Replace(_) => Step::Replace,
            Self::SelectTokens(_) => Step::SelectTokens,
            Self::SelectCharacters(_) => Step::SelectCharacters,
        }
    }

    fn apply(&self, tokens: Vec<String>) -> Vec<String> {
        match self {
            Self::Replace(None) => tokens,
            Self::Replace(Some(dictionary)) => {
                tokens.iter().map(|token| dictionary.substitute(token)).collect()
            }
            Self::SelectTokens(filter) => filter.select(tokens),
            Self::SelectCharacters(filter) => tokens.iter().map(|token| filter.select(token)).collect(),
        }
    }
}

/// A composed password generation rule
///
/// Immutable once built and safe to share between threads.
#[derive(Debug, Clone)]
pub struct Rule {
    config: RuleConfig,
    charset: CharacterSet,
    tokenizer: Tokenizer,
    stages: [Stage; 3],
    add_spaces: bool,
}

impl Rule {
    /// Compose a rule.
    ///
    /// `prefixes` is required when the configuration asks for word prefix
    /// replacement and ignored otherwise.
    pub fn new(config: &RuleConfig, prefixes: Option<Arc<PrefixDictionary>>) -> Result<Self> {
        let dictionary = match (config.replacement, prefixes) {
            (Replacement::None, _) => None,
            (Replacement::WordPrefixes, Some(dictionary)) => Some(dictionary),
            (Replacement::WordPrefixes, None) => {
                return Err(RuleError::resource(
                    REPLACE_WORD_PREFIXES,
                    "no prefix dictionary was loaded",
                ))
            }
        };

        Ok(Self {
            config: config.clone(),
            charset: config.charset,
            tokenizer: Tokenizer::new(),
            stages: [
                Stage::Replace(dictionary),
                Stage::SelectTokens(EveryNth::new(config.token_selector)?),
                Stage::SelectCharacters(CharacterIndices::new(
                    config.character_selector.clone(),
                    false,
                    false,
                )),
            ],
            add_spaces: config.add_spaces,
        })
    }

    pub fn config(&self) -> &RuleConfig {
        &self.config
    }

    /// Generate the password for `input`
    pub fn apply(&self, input: &str) -> String {
        let parts = self.run(input, |_, _| {});
        join(&parts, self.add_spaces)
    }

    /// Run the rule on `input` and return the state after every [`Step`].
    ///
    /// Token states are shown separated by single spaces, the final state is
    /// the unspaced password.
    pub fn apply_in_steps(&self, input: &str) -> Vec<String> {
        let mut snapshots = Vec::with_capacity(Step::ALL.len());
        self.run(input, |step, tokens| {
            snapshots.push(match step {
                Step::SelectCharacters => join(tokens, false),
                _ => tokens.join(" "),
            });
        });
        snapshots
    }

    fn run<F>(&self, input: &str, mut observe: F) -> Vec<String>
    where
        F: FnMut(Step, &[String]),
    {
        let mut tokens = self.tokenizer.tokenize(&self.charset.normalize(input));
        observe(Step::Tokenize, &tokens);

        for stage in &self.stages {
            tokens = stage.apply(tokens);
            observe(stage.step(), &tokens);
        }

        tokens
    }
}

/// Concatenate the per-token outputs, optionally spacing every character
fn join(parts: &[String], add_spaces: bool) -> String {
    let joined = parts.concat();
    if !add_spaces {
        return joined;
    }

    let mut spaced = String::with_capacity(joined.len() * 2);
    for c in joined.chars() {
        spaced.push(c);
        spaced.push(' ');
    }
    spaced.trim().to_string()
}
