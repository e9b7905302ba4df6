//! Command-line interface definition for password-rules
//!
//! Provides argument parsing for the `apply`, `batch` and `steps` commands.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::error::RuleError;
use crate::rules::RuleConfig;

/// Short form of the rule parameters
pub const RULE_PARAMETERS: &str =
    "<character set> <replacement> <word> <character position> [<add spaces between characters>]";

/// Help for the rule parameters shared by all commands
pub const RULE_HELP: &str = r#"RULE PARAMETERS:
    <character set>
        Specifies the character set to which the input is cast.
        Either 'ascii' or 'lowercase-letters'
    <replacement>
        Specifies whether to replace certain character sequences.
        Either 'none' or 'word-prefixes'
    <word>
        Specifies which tokens to take.
        Possible values: 'every', 'every2nd', ...
    <character position>
        Specifies which characters to take from each token.
        Possible values:
          '1st', '2nd', ...
          'last', '2ndlast', ...
          '1st+2nd', ..., '1st+last', ..., '1st+2nd+3rd', ...
    <add spaces between characters>
        Either 'false' (default) or 'true' (add one space
        between each pair of characters of the output passwords)
"#;

/// Derive password candidates from natural-language phrases
#[derive(Parser, Debug, Clone)]
#[command(
    name = "password-rules",
    version,
    about = "Derive password candidates from natural-language phrases",
    long_about = r#"
Applies a password generation rule to every phrase of a corpus. A rule
normalizes the phrase, splits it into words, optionally replaces word
prefixes by symbols, keeps every nth word and takes selected characters
of each kept word.

EXAMPLES:
    # First letter of every word
    password-rules apply phrases.txt passwords.txt ascii none every 1st

    # First and last letter, lowercase, with spaces between characters
    password-rules apply phrases.txt passwords.txt lowercase-letters none every 1st+last true

    # Bucket a corpus by password length (8 to 12 characters)
    password-rules batch corpus/ out/ 8 12 ascii word-prefixes every 1st --recursive

    # Show every step of a rule for one phrase
    password-rules steps "Attack the castle today" ascii word-prefixes every2nd 1st+last
"#,
    after_help = RULE_HELP
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Prefix dictionary file to use instead of the built-in one
    #[arg(long, value_name = "FILE", global = true)]
    pub prefix_map: Option<PathBuf>,

    /// Number of threads (default: auto-detect)
    #[arg(short = 't', long, value_name = "NUM", global = true)]
    pub threads: Option<usize>,

    /// Write buffer size per output file
    #[arg(long, value_name = "SIZE", default_value = "8MB", global = true)]
    pub buffer_size: String,

    /// Quiet mode - minimal output
    #[arg(short, long, default_value_t = false, global = true)]
    pub quiet: bool,

    /// Verbose mode - detailed logging
    #[arg(short, long, default_value_t = false, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Apply a rule to every line of a file, one password per line
    Apply {
        /// A file with one input phrase per line
        input: PathBuf,

        /// Output file which will contain one password per line
        output: PathBuf,

        /// Rule parameters (see below)
        #[arg(value_name = "RULE", required = true, num_args = 1..)]
        rule: Vec<String>,
    },

    /// Apply a rule to a corpus and bucket the passwords by length
    Batch {
        /// File or directory of files with one input phrase per line
        input: PathBuf,

        /// Output directory for the length-<N>.txt partition files
        output: PathBuf,

        /// Minimum password length to keep
        min_length: usize,

        /// Maximum password length to keep
        max_length: usize,

        /// Rule parameters (see below)
        #[arg(value_name = "RULE", required = true, num_args = 1..)]
        rule: Vec<String>,

        /// Process directories recursively
        #[arg(short, long, default_value_t = false)]
        recursive: bool,

        /// File extensions to process in directories
        #[arg(long, value_name = "EXT", default_value = "txt")]
        extensions: String,
    },

    /// Show the intermediate results of a rule for one phrase
    Steps {
        /// The phrase to transform
        phrase: String,

        /// Rule parameters (see below)
        #[arg(value_name = "RULE", required = true, num_args = 1..)]
        rule: Vec<String>,
    },
}

impl Command {
    /// Raw rule fields of the command
    pub fn rule_args(&self) -> &[String] {
        match self {
            Self::Apply { rule, .. } | Self::Batch { rule, .. } | Self::Steps { rule, .. } => rule,
        }
    }

    /// Usage line of the command
    pub fn usage(&self) -> String {
        match self {
            Self::Apply { .. } => format!("password-rules apply <input> <output> {}", RULE_PARAMETERS),
            Self::Batch { .. } => format!(
                "password-rules batch <input> <output> <min-password-length> <max-password-length> {}",
                RULE_PARAMETERS
            ),
            Self::Steps { .. } => format!("password-rules steps <phrase> {}", RULE_PARAMETERS),
        }
    }
}

impl Args {
    /// Parse the rule fields of the selected command
    pub fn rule_config(&self) -> Result<RuleConfig, RuleError> {
        RuleConfig::from_args(self.command.rule_args(), 0)
    }

    /// Parse buffer size string to bytes
    pub fn parse_buffer_size(&self) -> anyhow::Result<usize> {
        parse_size(&self.buffer_size)
    }

    /// Parse file extensions to process
    pub fn get_extensions(&self) -> Vec<String> {
        let Command::Batch { ref extensions, .. } = self.command else {
            return Vec::new();
        };
        extensions
            .split(',')
            .map(|s| s.trim().trim_start_matches('.').to_lowercase())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// Parse human-readable size string to bytes
fn parse_size(size_str: &str) -> anyhow::Result<usize> {
    let size_str = size_str.trim().to_uppercase();

    let (num_str, multiplier) = if let Some(n) = size_str.strip_suffix("GB") {
        (n, 1024 * 1024 * 1024)
    } else if let Some(n) = size_str.strip_suffix("MB") {
        (n, 1024 * 1024)
    } else if let Some(n) = size_str.strip_suffix("KB") {
        (n, 1024)
    } else if let Some(n) = size_str.strip_suffix('B') {
        (n, 1)
    } else {
        (size_str.as_str(), 1)
    };

    let num: usize = num_str
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid size format: '{}'", size_str))?;

    Ok(num * multiplier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{CharacterSet, Replacement};

    #[test]
    fn test_parse_apply() {
        let args = Args::try_parse_from([
            "password-rules", "apply", "in.txt", "out.txt", "ascii", "none", "every", "1st",
        ])
        .unwrap();

        match &args.command {
            Command::Apply { input, output, rule } => {
                assert_eq!(input, &PathBuf::from("in.txt"));
                assert_eq!(output, &PathBuf::from("out.txt"));
                assert_eq!(rule.len(), 4);
            }
            other => panic!("unexpected command: {:?}", other),
        }

        let config = args.rule_config().unwrap();
        assert_eq!(config.charset, CharacterSet::Ascii);
        assert_eq!(config.replacement, Replacement::None);
    }

    #[test]
    fn test_parse_batch() {
        let args = Args::try_parse_from([
            "password-rules", "-q", "batch", "corpus", "out", "8", "12",
            "lowercase-letters", "word-prefixes", "every2nd", "1st+last", "true",
            "--recursive", "--extensions", "txt, .LST",
        ])
        .unwrap();

        assert!(args.quiet);
        match &args.command {
            Command::Batch { min_length, max_length, recursive, .. } => {
                assert_eq!(*min_length, 8);
                assert_eq!(*max_length, 12);
                assert!(*recursive);
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert_eq!(args.get_extensions(), vec!["txt", "lst"]);

        let config = args.rule_config().unwrap();
        assert_eq!(config.token_selector, 2);
        assert!(config.add_spaces);
    }

    #[test]
    fn test_rule_arity_is_checked() {
        let args = Args::try_parse_from([
            "password-rules", "steps", "a phrase", "ascii", "none", "every",
        ])
        .unwrap();
        assert!(args.rule_config().unwrap_err().is_validation());
    }

    #[test]
    fn test_missing_rule_rejected_by_parser() {
        assert!(Args::try_parse_from(["password-rules", "apply", "in.txt", "out.txt"]).is_err());
    }

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("64MB").unwrap(), 64 * 1024 * 1024);
        assert_eq!(parse_size("8GB").unwrap(), 8 * 1024 * 1024 * 1024);
        assert_eq!(parse_size("1024KB").unwrap(), 1024 * 1024);
        assert_eq!(parse_size("512").unwrap(), 512);
        assert!(parse_size("lots").is_err());
    }
}
