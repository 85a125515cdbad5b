//! # Request State Testing
//!
//! Testing utilities and helpers for request-state reducers.
//!
//! This crate provides:
//! - [`ReducerTest`]: a Given-When-Then builder for reducers
//! - Assertion helpers for transitions
//! - Property-based testing strategies for opaque JSON payloads
//! - A tracing subscriber for test output
//!
//! ## Example
//!
//! ```ignore
//! use request_state_testing::{assertions, ReducerTest};
//!
//! ReducerTest::new(QueriesReducer::new())
//!     .with_env(RequestsConfig::default())
//!     .given_state(QueriesState::default())
//!     .when_action(Action::Dispatched(fetch_book))
//!     .then_state(|state| assert_eq!(state.queries["FETCH_BOOK"].pending, 1))
//!     .then_transition(assertions::assert_changed)
//!     .run();
//! ```


pub use reducer_test::{ReducerTest, assertions};

/// Property-based testing utilities
///
/// Strategies for the opaque payloads that flow through reducers as
/// `serde_json::Value`.
pub mod properties {
    use proptest::prelude::*;
    use serde_json::Value;

    /// Arbitrary scalar JSON values (null, bool, integer, short string)
    pub fn arb_scalar() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(Value::from),
            "[a-z]{0,8}".prop_map(Value::String),
        ]
    }

    /// Arbitrary JSON values nested up to a small depth
    pub fn arb_json() -> impl Strategy<Value = Value> {
        arb_scalar().prop_recursive(3, 24, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                prop::collection::btree_map("[a-z]{1,6}", inner, 0..4)
                    .prop_map(|map| Value::Object(map.into_iter().collect())),
            ]
        })
    }

    /// Arbitrary action type identifiers in the usual `SCREAMING_CASE`
    pub fn arb_action_type() -> impl Strategy<Value = String> {
        "[A-Z]{1,8}(_[A-Z]{1,8})?"
    }
}

/// Install a test-friendly tracing subscriber.
///
/// Honors `RUST_LOG`; safe to call from every test since only the first
/// installation wins.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "request_state=debug".into()),
        )
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::properties::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_action_types_are_screaming_case(action_type in arb_action_type()) {
            prop_assert!(action_type.chars().all(|c| c.is_ascii_uppercase() || c == '_'));
        }

        #[test]
        fn test_scalars_are_not_containers(value in arb_scalar()) {
            prop_assert!(!value.is_array() && !value.is_object());
        }
    }
}
