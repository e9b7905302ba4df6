//! # Password Rules
//!
//! Derives password candidates from natural-language phrases, for building
//! password dictionaries out of large text corpora.
//!
//! ## Features
//!
//! - **Character sets**: cast phrases to visible ASCII or lowercase letters
//! - **Tokenization**: Unicode word segmentation
//! - **Word prefixes**: replace prefixes by symbols (`forever` -> `4ever`)
//! - **Selection**: every nth word, any characters of each word (`1st+last`)
//! - **Batch mode**: parallel processing with output bucketed by length
//!
//! ## Usage
//!
//! ```bash
//! # First letter of every word
//! password-rules apply phrases.txt passwords.txt ascii none every 1st
//!
//! # Bucket a corpus by password length
//! password-rules batch corpus/ out/ 8 12 ascii word-prefixes every 1st+last
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use password_rules::rules::{PrefixDictionary, Rule, RuleConfig};
//! use std::sync::Arc;
//!
//! let config = RuleConfig::parse("ascii", "word-prefixes", "every", "1st", None).unwrap();
//! let prefixes = Arc::new(PrefixDictionary::builtin().unwrap());
//! let rule = Rule::new(&config, Some(prefixes)).unwrap();
//!
//! assert_eq!(rule.apply("attack at dawn"), "@@d");
//! ```

pub mod cli;
pub mod encoding;
pub mod error;
pub mod filter;
pub mod output;
pub mod processor;
pub mod progress;
pub mod rules;

pub use cli::Args;
pub use error::RuleError;
pub use processor::{BatchProcessor, Generator};
pub use rules::{Rule, RuleConfig};
