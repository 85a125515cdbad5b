//! Queries reducer.
//!
//! Tracks one [`QueryRecord`](crate::QueryRecord) per query action type and the
//! shared entity table. Every action goes through two independent passes:
//!
//! 1. the query transition, when the action belongs to a query request
//!    (start, success, error or abort);
//! 2. the [mutation pass](crate::mutations), when the action carries mutations
//!    targeting existing queries.
//!
//! An action that neither pass acts on leaves the state untouched and reports
//! [`Transition::Unchanged`].

use crate::actions::Action;
use crate::config::RequestsConfig;
use crate::mutations::apply_mutations;
use crate::normalize::normalize_into;
use crate::state::QueriesState;
use request_state_core::reducer::{Reducer, Transition};
use serde_json::Value;

/// Reducer for query records, mutations and normalized entities
#[derive(Clone, Debug, Default)]
pub struct QueriesReducer;

impl QueriesReducer {
    /// Creates a new `QueriesReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Primary transition of the query an action belongs to
    fn reduce_query(state: &mut QueriesState, action: &Action, config: &RequestsConfig) -> Transition {
        let request_action = action.request_action();
        if !request_action.is_query() {
            return Transition::Unchanged;
        }

        let normalize_data = request_action.meta.normalize;
        let data = match action {
            Action::Success { data, .. } if normalize_data => Some(normalize_into(
                &mut state.normalized_data,
                data,
                config.normalization.as_ref(),
            )),
            Action::Success { data, .. } => Some(data.clone()),
            _ => None,
        };

        let record = state
            .queries
            .entry(request_action.action_type.clone())
            .or_default();

        match action {
            Action::Dispatched(_) => {
                record.pending = record.pending.saturating_add(1);
                record.error = Value::Null;
                record.normalized = normalize_data;
            },
            Action::Success { .. } => {
                record.pending = record.pending.saturating_sub(1);
                record.normalized = normalize_data;
                if let Some(data) = data {
                    record.data = data;
                }
            },
            Action::Error { error, .. } => {
                record.pending = record.pending.saturating_sub(1);
                record.error = error.clone();
            },
            Action::Abort { .. } => {
                record.pending = record.pending.saturating_sub(1);
            },
        }

        tracing::debug!(
            query = %request_action.action_type,
            phase = ?action.phase(),
            pending = record.pending,
            "query transition"
        );

        Transition::Changed
    }
}

impl Reducer for QueriesReducer {
    type State = QueriesState;
    type Action = Action;
    type Environment = RequestsConfig;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        config: &Self::Environment,
    ) -> Transition {
        let transition =
            Self::reduce_query(state, &action, config) | apply_mutations(state, &action, config);

        if !transition.is_changed() {
            tracing::trace!(
                action = %action.request_action().action_type,
                phase = ?action.phase(),
                "action ignored by queries reducer"
            );
        }

        transition
    }
}
