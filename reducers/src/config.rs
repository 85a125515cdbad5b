//! Configuration for the request reducers.
//!
//! [`RequestsConfig`] is the environment of the queries reducer: it tells the
//! decoder how to recognize lifecycle variants of an action type and tells the
//! reducer how to pick entities out of response data. [`SsrMode`] is the
//! environment of the SSR reducer.
//!
//! Both can be loaded from environment variables:
//!
//! | Variable                  | Default     |
//! |---------------------------|-------------|
//! | `REQUESTS_SUCCESS_SUFFIX` | `_SUCCESS`  |
//! | `REQUESTS_ERROR_SUFFIX`   | `_ERROR`    |
//! | `REQUESTS_ABORT_SUFFIX`   | `_ABORT`    |
//! | `REQUESTS_SSR_MODE`       | unset (off) |

use crate::actions::Phase;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Environment variable holding the success suffix
pub const SUCCESS_SUFFIX_VAR: &str = "REQUESTS_SUCCESS_SUFFIX";
/// Environment variable holding the error suffix
pub const ERROR_SUFFIX_VAR: &str = "REQUESTS_ERROR_SUFFIX";
/// Environment variable holding the abort suffix
pub const ABORT_SUFFIX_VAR: &str = "REQUESTS_ABORT_SUFFIX";
/// Environment variable holding the SSR mode
pub const SSR_MODE_VAR: &str = "REQUESTS_SSR_MODE";

/// Picks entities out of response data.
///
/// An object is replaced by a placeholder when [`should_normalize`] accepts it;
/// its placeholder is built from [`object_key`].
///
/// [`should_normalize`]: NormalizationStrategy::should_normalize
/// [`object_key`]: NormalizationStrategy::object_key
pub trait NormalizationStrategy: Send + Sync {
    /// Key identifying `object` among all entities
    fn object_key(&self, object: &Map<String, Value>) -> Option<String>;

    /// Whether `object` is an entity
    fn should_normalize(&self, object: &Map<String, Value>) -> bool {
        self.object_key(object).is_some()
    }
}

impl<F> NormalizationStrategy for F
where
    F: Fn(&Map<String, Value>) -> Option<String> + Send + Sync,
{
    fn object_key(&self, object: &Map<String, Value>) -> Option<String> {
        self(object)
    }
}

/// Identifies entities by a single field holding a string or a number
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyField {
    field: String,
}

impl KeyField {
    /// Use `field` as the entity key
    #[must_use]
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }
}

impl Default for KeyField {
    fn default() -> Self {
        Self::new("id")
    }
}

impl NormalizationStrategy for KeyField {
    fn object_key(&self, object: &Map<String, Value>) -> Option<String> {
        match object.get(&self.field)? {
            Value::String(key) => Some(key.clone()),
            Value::Number(key) => Some(key.to_string()),
            _ => None,
        }
    }
}

/// Suffixes appended to a request action type by the dispatch layer
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionTypeSuffixes {
    /// Success suffix
    pub success: String,
    /// Error suffix
    pub error: String,
    /// Abort suffix
    pub abort: String,
}

impl Default for ActionTypeSuffixes {
    fn default() -> Self {
        Self {
            success: "_SUCCESS".to_string(),
            error: "_ERROR".to_string(),
            abort: "_ABORT".to_string(),
        }
    }
}

impl ActionTypeSuffixes {
    /// Validate the suffixes
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a suffix is empty or shared between phases.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, suffix) in [
            ("success", &self.success),
            ("error", &self.error),
            ("abort", &self.abort),
        ] {
            if suffix.is_empty() {
                return Err(ConfigError::EmptySuffix(name));
            }
        }
        if self.success == self.error || self.success == self.abort {
            return Err(ConfigError::DuplicateSuffix(self.success.clone()));
        }
        if self.error == self.abort {
            return Err(ConfigError::DuplicateSuffix(self.error.clone()));
        }
        Ok(())
    }

    /// Lifecycle phase encoded in an action type, by suffix
    #[must_use]
    pub fn phase_of(&self, action_type: &str) -> Phase {
        if action_type.ends_with(&self.success) {
            Phase::Success
        } else if action_type.ends_with(&self.error) {
            Phase::Error
        } else if action_type.ends_with(&self.abort) {
            Phase::Abort
        } else {
            Phase::Dispatched
        }
    }

    /// Action type of a response to `action_type` in the given phase
    #[must_use]
    pub fn response_type(&self, action_type: &str, phase: Phase) -> String {
        match phase {
            Phase::Dispatched => action_type.to_string(),
            Phase::Success => format!("{action_type}{}", self.success),
            Phase::Error => format!("{action_type}{}", self.error),
            Phase::Abort => format!("{action_type}{}", self.abort),
        }
    }
}

/// Environment of the queries reducer
#[derive(Clone)]
pub struct RequestsConfig {
    /// Lifecycle suffixes
    pub suffixes: ActionTypeSuffixes,
    /// Entity extraction strategy
    pub normalization: Arc<dyn NormalizationStrategy>,
}

impl Default for RequestsConfig {
    fn default() -> Self {
        Self {
            suffixes: ActionTypeSuffixes::default(),
            normalization: Arc::new(KeyField::default()),
        }
    }
}

impl fmt::Debug for RequestsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestsConfig")
            .field("suffixes", &self.suffixes)
            .field("normalization", &"<strategy>")
            .finish()
    }
}

impl RequestsConfig {
    /// Replace the lifecycle suffixes
    #[must_use]
    pub fn with_suffixes(mut self, suffixes: ActionTypeSuffixes) -> Self {
        self.suffixes = suffixes;
        self
    }

    /// Replace the normalization strategy
    #[must_use]
    pub fn with_normalization<N>(mut self, strategy: N) -> Self
    where
        N: NormalizationStrategy + 'static,
    {
        self.normalization = Arc::new(strategy);
        self
    }

    /// Load suffixes from the environment, falling back to defaults
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the resulting suffixes are invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = ActionTypeSuffixes::default();
        let suffixes = ActionTypeSuffixes {
            success: std::env::var(SUCCESS_SUFFIX_VAR).unwrap_or(defaults.success),
            error: std::env::var(ERROR_SUFFIX_VAR).unwrap_or(defaults.error),
            abort: std::env::var(ABORT_SUFFIX_VAR).unwrap_or(defaults.abort),
        };
        suffixes.validate()?;
        Ok(Self::default().with_suffixes(suffixes))
    }
}

/// Server-side-rendering role of the current process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SsrMode {
    /// Rendering on the server: record resolved requests
    Server,
    /// Hydrating on the client: reconcile recorded requests
    Client,
}

impl SsrMode {
    /// Load the mode from `REQUESTS_SSR_MODE`; unset or empty disables SSR
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSsrMode`] for any other value.
    pub fn from_env() -> Result<Option<Self>, ConfigError> {
        match std::env::var(SSR_MODE_VAR) {
            Ok(value) if !value.trim().is_empty() => value.parse().map(Some),
            _ => Ok(None),
        }
    }
}

impl FromStr for SsrMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "server" => Ok(Self::Server),
            "client" => Ok(Self::Client),
            _ => Err(ConfigError::InvalidSsrMode(s.to_string())),
        }
    }
}

impl fmt::Display for SsrMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Server => write!(f, "server"),
            Self::Client => write!(f, "client"),
        }
    }
}
