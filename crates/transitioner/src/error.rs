//! Error types for transitioner

use thiserror::Error;
use transitioner_core::Key;

/// Errors surfaced by fallible constructors.
///
/// Nothing on the transition path returns these: the group degrades to
/// "complete immediately" and logs instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    /// A transition spec without a `from` style
    #[error("transition spec is missing `from`")]
    MissingFrom,

    /// A transition spec without a `to` style
    #[error("transition spec is missing `to`")]
    MissingTo,

    /// The host could not resolve a visual node for a key
    #[error("no visual node bound for key `{0}`")]
    UnboundNode(Key),

    /// Configuration could not be parsed
    #[error("invalid transitioner config: {0}")]
    Config(String),
}

impl From<toml::de::Error> for TransitionError {
    fn from(err: toml::de::Error) -> Self {
        TransitionError::Config(err.to_string())
    }
}

/// Result type for transitioner operations
pub type Result<T> = std::result::Result<T, TransitionError>;
