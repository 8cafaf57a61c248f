//! Error types for building a game context.

use thiserror::Error;

/// Errors raised while building a [`GameContext`](crate::GameContext).
#[derive(Debug, Error)]
pub enum ContextError {
    /// The configuration document could not be parsed.
    #[error("invalid context configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// The configuration parsed but holds a value the context cannot accept.
    #[error("invalid value for {field}: {reason}")]
    InvalidValue {
        /// Dotted path of the offending field.
        field: String,
        /// Why the value was rejected.
        reason: String,
    },
}
