//! Both request reducers mounted over one [`RequestsState`].

use crate::actions::Action;
use crate::config::{RequestsConfig, SsrMode};
use crate::error::ConfigError;
use crate::queries::QueriesReducer;
use crate::ssr::SsrReducer;
use crate::state::RequestsState;
use request_state_core::composition::{CombinedReducer, combine_reducers, scope_reducer};
use request_state_core::reducer::{Reducer, Transition};

/// Environment of [`RequestsReducer`]
#[derive(Clone, Debug, Default)]
pub struct RequestsEnvironment {
    /// Queries configuration
    pub config: RequestsConfig,
    /// Server-side-rendering role, `None` when not rendering
    pub ssr_mode: Option<SsrMode>,
}

impl RequestsEnvironment {
    /// Environment with the given configuration and SSR mode
    #[must_use]
    pub const fn new(config: RequestsConfig, ssr_mode: Option<SsrMode>) -> Self {
        Self { config, ssr_mode }
    }

    /// Load configuration and SSR mode from environment variables
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable holds an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::new(RequestsConfig::from_env()?, SsrMode::from_env()?))
    }
}

/// [`QueriesReducer`] on `state.queries` and [`SsrReducer`] on `state.ssr`
pub struct RequestsReducer {
    inner: CombinedReducer<RequestsState, Action, RequestsEnvironment>,
}

impl RequestsReducer {
    /// Creates a new `RequestsReducer`
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: combine_reducers(vec![
                Box::new(scope_reducer(
                    QueriesReducer::new(),
                    |state: &mut RequestsState| &mut state.queries,
                    |env: &RequestsEnvironment| &env.config,
                )),
                Box::new(scope_reducer(
                    SsrReducer::new(),
                    |state: &mut RequestsState| &mut state.ssr,
                    |env: &RequestsEnvironment| &env.ssr_mode,
                )),
            ]),
        }
    }
}

impl Default for RequestsReducer {
    fn default() -> Self {
        Self::new()
    }
}

impl Reducer for RequestsReducer {
    type State = RequestsState;
    type Action = Action;
    type Environment = RequestsEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> Transition {
        self.inner.reduce(state, action, env)
    }
}
