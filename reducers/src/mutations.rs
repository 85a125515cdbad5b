//! Mutation pass of the queries reducer.
//!
//! Runs after the primary query transition, over the same action. For each
//! mutation whose target query exists:
//!
//! | Phase       | Local descriptor          | Otherwise                       |
//! |-------------|---------------------------|---------------------------------|
//! | Dispatched  | `update_data(data, payload)` | `update_data_optimistic(data)` |
//! | Success     | nothing                   | `update_data(data, success)`    |
//! | Error/Abort | `revert_data(data)`       | `revert_data(data)`             |
//!
//! A missing function makes that phase a no-op, so an optimistic write
//! survives an error unless a reverter undoes it.
//!
//! Updaters of a normalized query see the denormalized data. Their result is
//! normalized again and its entities merged into the shared table, so every
//! query referencing an updated entity sees the change.

use crate::actions::{Action, Mutation, RequestAction};
use crate::config::RequestsConfig;
use crate::normalize::{denormalize, normalize_into};
use crate::state::QueriesState;
use request_state_core::reducer::Transition;
use serde_json::Value;
use std::borrow::Cow;

static NULL: Value = Value::Null;

/// Apply the mutations carried by `action` to the queries they target
pub(crate) fn apply_mutations(
    state: &mut QueriesState,
    action: &Action,
    config: &RequestsConfig,
) -> Transition {
    let request_action = action.request_action();
    let mut transition = Transition::Unchanged;

    for (target, mutation) in &request_action.meta.mutations {
        let Some(record) = state.queries.get(target) else {
            tracing::trace!(target = %target, "mutation target is not a known query");
            continue;
        };

        let normalized = record.normalized;
        let next = {
            let current = if normalized {
                Cow::Owned(denormalize(&record.data, &state.normalized_data))
            } else {
                Cow::Borrowed(&record.data)
            };

            let next = match action {
                Action::Dispatched(dispatched) => on_dispatch(mutation, &current, dispatched),
                Action::Success { data, .. } => on_success(mutation, &current, data),
                Action::Error { .. } | Action::Abort { .. } => {
                    mutation.reverter().map(|revert| revert(&*current))
                },
            };
            next.filter(|next| *next != *current)
        };
        let Some(next) = next else {
            continue;
        };

        let next = if normalized {
            normalize_into(&mut state.normalized_data, &next, config.normalization.as_ref())
        } else {
            next
        };
        if let Some(record) = state.queries.get_mut(target) {
            record.data = next;
        }

        tracing::debug!(
            mutation = %request_action.action_type,
            target = %target,
            phase = ?action.phase(),
            normalized,
            "mutation applied"
        );
        transition = Transition::Changed;
    }

    transition
}

fn on_dispatch(mutation: &Mutation, data: &Value, dispatched: &RequestAction) -> Option<Value> {
    if mutation.is_local() {
        let payload = dispatched.payload.as_ref().unwrap_or(&NULL);
        return mutation.updater().map(|update| update(data, payload));
    }
    mutation.optimistic().map(|optimistic| optimistic(data))
}

fn on_success(mutation: &Mutation, data: &Value, success: &Value) -> Option<Value> {
    if mutation.is_local() {
        return None;
    }
    mutation.updater().map(|update| update(data, success))
}
