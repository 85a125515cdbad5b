//! Property tests for the request reducers

use proptest::prelude::*;
use request_state_core::reducer::{Reducer, next_state};
use request_state_reducers::{
    Action, QueriesReducer, QueriesState, QueryRecord, Request, RequestAction, RequestsConfig,
    SsrMode, SsrReducer, SsrState,
};
use request_state_testing::properties::{arb_action_type, arb_json};
use serde_json::Value;

fn query(action_type: &str) -> RequestAction {
    RequestAction::new(action_type).with_request(Request::get("/"))
}

fn seeded(action_type: &str, pending: i64, data: Value) -> QueriesState {
    QueriesState::new().with_query(
        action_type,
        QueryRecord {
            data,
            pending,
            ..QueryRecord::default()
        },
    )
}

proptest! {
    #[test]
    fn test_plain_actions_leave_state_unchanged(
        action_type in arb_action_type(),
        payload in arb_json(),
        pending in -3i64..3,
    ) {
        let state = seeded("FETCH_BOOK", pending, Value::Null);
        let action = Action::Dispatched(RequestAction::new(action_type).with_payload(payload));
        prop_assert!(next_state(&QueriesReducer, &state, action, &RequestsConfig::default()).is_none());
    }

    #[test]
    fn test_start_increments_pending_by_one(action_type in arb_action_type(), pending in -5i64..5) {
        let mut state = seeded(&action_type, pending, Value::Null);
        let _ = QueriesReducer.reduce(&mut state, Action::Dispatched(query(&action_type)), &RequestsConfig::default());
        prop_assert_eq!(state.queries[&action_type].pending, pending + 1);
    }

    #[test]
    fn test_terminal_actions_decrement_pending_by_one(
        action_type in arb_action_type(),
        pending in -5i64..5,
        outcome in 0u8..3,
        value in arb_json(),
    ) {
        let mut state = seeded(&action_type, pending, Value::Null);
        let action = match outcome {
            0 => Action::success(query(&action_type), value),
            1 => Action::error(query(&action_type), value),
            _ => Action::abort(query(&action_type)),
        };
        let _ = QueriesReducer.reduce(&mut state, action, &RequestsConfig::default());
        prop_assert_eq!(state.queries[&action_type].pending, pending - 1);
    }

    #[test]
    fn test_unnormalized_success_stores_data_verbatim(data in arb_json()) {
        let mut state = QueriesState::new();
        let _ = QueriesReducer.reduce(&mut state, Action::success(query("FETCH"), data.clone()), &RequestsConfig::default());
        prop_assert_eq!(&state.queries["FETCH"].data, &data);
        prop_assert!(state.normalized_data.is_empty());
    }

    #[test]
    fn test_renormalizing_same_data_keeps_entity_table(data in arb_json()) {
        let config = RequestsConfig::default();
        let action = Action::success(query("FETCH").normalized(), data);
        let mut state = QueriesState::new();
        let _ = QueriesReducer.reduce(&mut state, action.clone(), &config);
        let before = std::sync::Arc::clone(&state.normalized_data);
        let _ = QueriesReducer.reduce(&mut state, action, &config);
        prop_assert!(std::sync::Arc::ptr_eq(&before, &state.normalized_data));
    }

    #[test]
    fn test_ssr_server_appends_one_entry_per_success(types in prop::collection::vec(arb_action_type(), 0..8)) {
        let mut state = SsrState::default();
        for action_type in &types {
            let _ = SsrReducer.reduce(&mut state, Action::success(query(action_type), Value::Null), &Some(SsrMode::Server));
        }
        prop_assert_eq!(state.request_types, types);
    }

    #[test]
    fn test_ssr_disabled_never_changes(action_type in arb_action_type()) {
        let state = SsrState::from_types([action_type.clone()]);
        let action = Action::success(query(&action_type), Value::Null);
        prop_assert!(next_state(&SsrReducer, &state, action, &None).is_none());
    }
}
