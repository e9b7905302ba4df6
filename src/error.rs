//! Error types for rule construction and application

use thiserror::Error;

/// Errors raised while building or running a password generation rule.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    /// A configuration field, selector string or argument list is malformed.
    #[error("{0}")]
    Validation(String),

    /// A stage that needs concrete text was handed nothing.
    #[error("Missing input for stage: {stage}")]
    MissingInput {
        /// Name of the stage that received no input.
        stage: &'static str,
    },

    /// The prefix dictionary could not be read or parsed.
    #[error("Failed to load prefix dictionary '{source_name}': {reason}")]
    ResourceLoad {
        /// Where the dictionary was read from.
        source_name: String,
        /// What went wrong.
        reason: String,
    },
}

impl RuleError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn resource(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ResourceLoad {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }

    /// True for errors caused by a bad rule configuration.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

pub type Result<T> = std::result::Result<T, RuleError>;
