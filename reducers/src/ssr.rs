//! Server-side-rendering bookkeeping reducer.
//!
//! On the server every successful request is recorded; the list is shipped
//! with the rendered page. On the client each request action that comes with
//! an `ssr_response` consumes one matching entry, so the client knows which
//! requests it can skip.

use crate::actions::Action;
use crate::config::SsrMode;
use crate::state::SsrState;
use request_state_core::reducer::{Reducer, Transition};

/// Reducer for [`SsrState`]
#[derive(Clone, Debug, Default)]
pub struct SsrReducer;

impl SsrReducer {
    /// Creates a new `SsrReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for SsrReducer {
    type State = SsrState;
    type Action = Action;
    type Environment = Option<SsrMode>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        mode: &Self::Environment,
    ) -> Transition {
        match (mode, action) {
            (Some(SsrMode::Server), Action::Success { request_action, .. }) => {
                tracing::debug!(request = %request_action.action_type, "recorded server response");
                state.request_types.push(request_action.action_type);
                Transition::Changed
            },
            (Some(SsrMode::Client), Action::Dispatched(request_action))
                if request_action.meta.ssr_response.is_some() =>
            {
                let Some(index) = state
                    .request_types
                    .iter()
                    .position(|request_type| *request_type == request_action.action_type)
                else {
                    return Transition::Unchanged;
                };
                state.request_types.remove(index);
                tracing::debug!(request = %request_action.action_type, "reconciled server response");
                Transition::Changed
            },
            _ => Transition::Unchanged,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{Request, RequestAction};
    use request_state_testing::{ReducerTest, assertions};
    use serde_json::json;

    fn request() -> RequestAction {
        RequestAction::new("REQUEST").with_request(Request::get("/"))
    }

    #[test]
    fn test_default_state_is_empty() {
        assert!(SsrState::default().request_types.is_empty());
    }

    #[test]
    fn test_does_nothing_without_mode() {
        ReducerTest::new(SsrReducer::new())
            .with_env(None)
            .given_state(SsrState::default())
            .when_action(Action::success(request(), json!("data")))
            .then_state(|state| assert!(state.request_types.is_empty()))
            .then_transition(assertions::assert_unchanged)
            .run();
    }

    #[test]
    fn test_server_appends_success_types() {
        ReducerTest::new(SsrReducer::new())
            .with_env(Some(SsrMode::Server))
            .given_state(SsrState::from_types(["REQUEST"]))
            .when_action(Action::success(request(), json!("data")))
            .then_state(|state| assert_eq!(state, &SsrState::from_types(["REQUEST", "REQUEST"])))
            .then_transition(assertions::assert_changed)
            .run();
    }

    #[test]
    fn test_server_ignores_errors_and_starts() {
        ReducerTest::new(SsrReducer::new())
            .with_env(Some(SsrMode::Server))
            .given_state(SsrState::default())
            .when_action(Action::Dispatched(request()))
            .when_action(Action::error(request(), json!("error")))
            .then_state(|state| assert!(state.request_types.is_empty()))
            .then_transition(assertions::assert_unchanged)
            .run();
    }

    #[test]
    fn test_client_removes_one_matching_type() {
        ReducerTest::new(SsrReducer::new())
            .with_env(Some(SsrMode::Client))
            .given_state(SsrState::from_types(["REQUEST", "REQUEST"]))
            .when_action(Action::Dispatched(
                request().with_ssr_response(json!({"data": "data"})),
            ))
            .then_state(|state| assert_eq!(state, &SsrState::from_types(["REQUEST"])))
            .then_transition(assertions::assert_changed)
            .run();
    }

    #[test]
    fn test_client_ignores_non_matching_type() {
        let other = RequestAction::new("REQUEST2")
            .with_request(Request::get("/"))
            .with_ssr_response(json!({"data": "data"}));

        ReducerTest::new(SsrReducer::new())
            .with_env(Some(SsrMode::Client))
            .given_state(SsrState::from_types(["REQUEST", "REQUEST"]))
            .when_action(Action::Dispatched(other))
            .then_state(|state| {
                assert_eq!(state, &SsrState::from_types(["REQUEST", "REQUEST"]));
            })
            .then_transition(assertions::assert_unchanged)
            .run();
    }

    #[test]
    fn test_client_ignores_actions_without_ssr_response() {
        ReducerTest::new(SsrReducer::new())
            .with_env(Some(SsrMode::Client))
            .given_state(SsrState::from_types(["REQUEST"]))
            .when_action(Action::Dispatched(request()))
            .then_transition(assertions::assert_unchanged)
            .run();
    }
}
