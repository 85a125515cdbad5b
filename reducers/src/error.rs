//! Error types for decoding actions and loading configuration

use thiserror::Error;

/// Errors raised while resolving a raw JSON action into an [`Action`](crate::Action)
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The action is not a JSON object
    #[error("Action must be a JSON object")]
    NotAnObject,

    /// The action has no string `type` field
    #[error("Action is missing a string `type` field")]
    MissingType,

    /// The request descriptor could not be parsed
    #[error("Invalid request descriptor: {0}")]
    InvalidRequest(#[source] serde_json::Error),

    /// A mutation references an updater that was never registered
    #[error("Unknown {kind} `{name}` in mutation of `{target}`")]
    UnknownUpdater {
        /// Query targeted by the mutation
        target: String,
        /// Descriptor field the name was found in
        kind: &'static str,
        /// The unresolved name
        name: String,
    },

    /// A mutation entry has an unexpected shape
    #[error("Invalid mutation of `{target}`: {reason}")]
    InvalidMutation {
        /// Query targeted by the mutation
        target: String,
        /// What was wrong with it
        reason: &'static str,
    },
}

/// Errors raised while building a [`RequestsConfig`](crate::RequestsConfig)
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Unknown server-side-rendering mode
    #[error("Invalid SSR mode: {0} (expected `server` or `client`)")]
    InvalidSsrMode(String),

    /// An action type suffix is empty
    #[error("The {0} suffix cannot be empty")]
    EmptySuffix(&'static str),

    /// Two lifecycle phases share a suffix
    #[error("Suffix `{0}` is used for more than one lifecycle phase")]
    DuplicateSuffix(String),
}
