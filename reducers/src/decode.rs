//! Resolving raw JSON actions into [`Action`].
//!
//! The dispatch layer emits actions in two shapes:
//!
//! ```text
//! plain: { "type": "FETCH_BOOK", "request": {..}, "meta": {..} }
//!        { "type": "FETCH_BOOK_SUCCESS", "data": .., "meta": { "requestAction": {..} } }
//! FSA:   { "type": "FETCH_BOOK", "payload": { "request": {..} }, "meta": {..} }
//!        { "type": "FETCH_BOOK_SUCCESS", "payload": { "data": .. }, "meta": { "requestAction": {..} } }
//!        { "type": "FETCH_BOOK_ERROR", "payload": .., "error": true, "meta": { "requestAction": {..} } }
//! ```
//!
//! Functions cannot travel as JSON, so mutation descriptors name their
//! functions and [`UpdaterRegistry`] resolves the names.

use crate::actions::{
    Action, ActionMeta, Mutation, MutationDescriptor, Mutations, Phase, Request, RequestAction,
    Transform, Updater,
};
use crate::config::ActionTypeSuffixes;
use crate::error::DecodeError;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Named mutation functions available to decoded actions
#[derive(Clone, Default)]
pub struct UpdaterRegistry {
    updaters: HashMap<String, Updater>,
    transforms: HashMap<String, Transform>,
}

impl UpdaterRegistry {
    /// Empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a `(data, payload) -> data` updater
    #[must_use]
    pub fn with_updater<F>(mut self, name: impl Into<String>, updater: F) -> Self
    where
        F: Fn(&Value, &Value) -> Value + Send + Sync + 'static,
    {
        self.updaters.insert(name.into(), Arc::new(updater));
        self
    }

    /// Register a `data -> data` transform (optimistic or revert)
    #[must_use]
    pub fn with_transform<F>(mut self, name: impl Into<String>, transform: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        self.transforms.insert(name.into(), Arc::new(transform));
        self
    }

    fn updater(&self, target: &str, kind: &'static str, name: &str) -> Result<Updater, DecodeError> {
        self.updaters
            .get(name)
            .cloned()
            .ok_or_else(|| DecodeError::UnknownUpdater {
                target: target.to_string(),
                kind,
                name: name.to_string(),
            })
    }

    fn transform(&self, target: &str, kind: &'static str, name: &str) -> Result<Transform, DecodeError> {
        self.transforms
            .get(name)
            .cloned()
            .ok_or_else(|| DecodeError::UnknownUpdater {
                target: target.to_string(),
                kind,
                name: name.to_string(),
            })
    }
}

impl fmt::Debug for UpdaterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut updaters: Vec<_> = self.updaters.keys().collect();
        let mut transforms: Vec<_> = self.transforms.keys().collect();
        updaters.sort();
        transforms.sort();
        f.debug_struct("UpdaterRegistry")
            .field("updaters", &updaters)
            .field("transforms", &transforms)
            .finish()
    }
}

/// Decodes plain and FSA JSON actions
#[derive(Clone, Debug, Default)]
pub struct ActionDecoder {
    suffixes: ActionTypeSuffixes,
    registry: UpdaterRegistry,
}

impl ActionDecoder {
    /// Decoder using the given suffixes and mutation functions
    #[must_use]
    pub const fn new(suffixes: ActionTypeSuffixes, registry: UpdaterRegistry) -> Self {
        Self { suffixes, registry }
    }

    /// Resolve a raw action.
    ///
    /// An action whose type carries a lifecycle suffix but no
    /// `meta.requestAction` is an ordinary dispatched action.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] if the action (or its originating request
    /// action) is not an object with a string `type`, if a request descriptor
    /// is malformed, or if a mutation is malformed or names an unknown function.
    pub fn decode(&self, raw: &Value) -> Result<Action, DecodeError> {
        let object = raw.as_object().ok_or(DecodeError::NotAnObject)?;
        let action_type = action_type(object)?;
        let origin = object
            .get("meta")
            .and_then(|meta| meta.get("requestAction"));

        let (respond, origin): (Respond, &Value) =
            match (self.suffixes.phase_of(action_type), origin) {
                (Phase::Success, Some(origin)) => (
                    |request, object| Action::success(request, success_data(object)),
                    origin,
                ),
                (Phase::Error, Some(origin)) => (
                    |request, object| Action::error(request, error_value(object)),
                    origin,
                ),
                (Phase::Abort, Some(origin)) => (|request, _| Action::abort(request), origin),
                (Phase::Dispatched, _) | (_, None) => {
                    return self.decode_request_action(object).map(Action::Dispatched);
                },
            };

        let request_action =
            self.decode_request_action(origin.as_object().ok_or(DecodeError::NotAnObject)?)?;
        let action = respond(request_action, object);

        tracing::trace!(
            action = %action_type,
            request = %action.request_action().action_type,
            phase = ?action.phase(),
            "decoded response action"
        );

        Ok(action)
    }

    fn decode_request_action(&self, object: &Map<String, Value>) -> Result<RequestAction, DecodeError> {
        let action_type = action_type(object)?.to_string();
        let payload = object.get("payload");

        let (request, payload) = match (object.get("request"), payload) {
            (Some(request), payload) => (Some(request), payload),
            (None, Some(payload)) if payload.get("request").is_some() => {
                (payload.get("request"), None)
            },
            (None, payload) => (None, payload),
        };

        let request = request
            .map(|request| serde_json::from_value::<Request>(request.clone()))
            .transpose()
            .map_err(DecodeError::InvalidRequest)?;

        let meta = match object.get("meta").and_then(Value::as_object) {
            Some(meta) => self.decode_meta(meta)?,
            None => ActionMeta::default(),
        };

        Ok(RequestAction {
            action_type,
            request,
            payload: payload.cloned(),
            meta,
        })
    }

    fn decode_meta(&self, meta: &Map<String, Value>) -> Result<ActionMeta, DecodeError> {
        let mutations = match meta.get("mutations").and_then(Value::as_object) {
            Some(mutations) => mutations
                .iter()
                .map(|(target, raw)| -> Result<_, DecodeError> {
                    Ok((target.clone(), self.decode_mutation(target, raw)?))
                })
                .collect::<Result<Mutations, _>>()?,
            None => Mutations::new(),
        };

        Ok(ActionMeta {
            mutations,
            normalize: meta.get("normalize").and_then(Value::as_bool).unwrap_or(false),
            ssr_response: meta.get("ssrResponse").filter(|value| !value.is_null()).cloned(),
            as_query: meta.get("asQuery").and_then(Value::as_bool),
            as_mutation: meta.get("asMutation").and_then(Value::as_bool),
        })
    }

    fn decode_mutation(&self, target: &str, raw: &Value) -> Result<Mutation, DecodeError> {
        let fields = match raw {
            Value::String(name) => {
                return Ok(Mutation::Update(self.registry.updater(target, "updater", name)?));
            },
            Value::Object(fields) => fields,
            _ => {
                return Err(DecodeError::InvalidMutation {
                    target: target.to_string(),
                    reason: "expected an updater name or a descriptor object",
                });
            },
        };

        let name_of = |field: &'static str| -> Result<Option<&str>, DecodeError> {
            match fields.get(field) {
                None | Some(Value::Null) => Ok(None),
                Some(Value::String(name)) => Ok(Some(name.as_str())),
                Some(_) => Err(DecodeError::InvalidMutation {
                    target: target.to_string(),
                    reason: "descriptor functions must be referenced by name",
                }),
            }
        };

        Ok(Mutation::Descriptor(MutationDescriptor {
            local: fields.get("local").and_then(Value::as_bool).unwrap_or(false),
            update_data: name_of("updateData")?
                .map(|name| self.registry.updater(target, "updateData", name))
                .transpose()?,
            update_data_optimistic: name_of("updateDataOptimistic")?
                .map(|name| self.registry.transform(target, "updateDataOptimistic", name))
                .transpose()?,
            revert_data: name_of("revertData")?
                .map(|name| self.registry.transform(target, "revertData", name))
                .transpose()?,
        }))
    }
}

/// Builds a response action from its origin and the raw response object
type Respond = fn(RequestAction, &Map<String, Value>) -> Action;

fn action_type(object: &Map<String, Value>) -> Result<&str, DecodeError> {
    object
        .get("type")
        .and_then(Value::as_str)
        .ok_or(DecodeError::MissingType)
}

/// Success data: plain `data`, plain `response.data`, or FSA `payload.data`
fn success_data(object: &Map<String, Value>) -> Value {
    object
        .get("data")
        .or_else(|| object.get("response").and_then(|response| response.get("data")))
        .or_else(|| object.get("payload").and_then(|payload| payload.get("data")))
        .cloned()
        .unwrap_or_default()
}

/// Error value: FSA `payload` when `error: true`, plain `error` otherwise
fn error_value(object: &Map<String, Value>) -> Value {
    match object.get("error") {
        Some(Value::Bool(true)) => object.get("payload").cloned().unwrap_or_default(),
        Some(error) => error.clone(),
        None => Value::Null,
    }
}
