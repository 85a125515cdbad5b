//! Actions consumed by the request reducers.
//!
//! A dispatch layer emits four kinds of actions for every request: the request
//! action itself, then exactly one of success, error or abort. Raw actions
//! (plain or FSA-wrapped JSON) are resolved into [`Action`] once, by
//! [`ActionDecoder`](crate::ActionDecoder); reducers only ever pattern match.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Computes new query data from `(current data, mutation payload)`
pub type Updater = Arc<dyn Fn(&Value, &Value) -> Value + Send + Sync>;

/// Computes new query data from the current data alone
pub type Transform = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

/// Mutations carried by an action, keyed by the query they target
pub type Mutations = BTreeMap<String, Mutation>;

/// Network request descriptor
///
/// Only the method matters to the reducers; everything else is carried along
/// for the dispatch layer.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Request {
    /// Target URL
    #[serde(default)]
    pub url: String,
    /// HTTP method, `GET` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// Transport-specific fields (headers, body, params, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Request {
    /// A `GET` request for `url`
    #[must_use]
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Set the HTTP method
    #[must_use]
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Whether this is a read (`GET`) request
    #[must_use]
    pub fn is_read(&self) -> bool {
        self.method
            .as_deref()
            .is_none_or(|method| method.eq_ignore_ascii_case("get"))
    }
}

/// Object form of a mutation descriptor
#[derive(Clone, Default)]
pub struct MutationDescriptor {
    /// Apply `update_data` immediately, with no network phase
    pub local: bool,
    /// Commits `(data, payload) -> data` on success (or immediately when local)
    pub update_data: Option<Updater>,
    /// Applied as soon as the mutation is dispatched
    pub update_data_optimistic: Option<Transform>,
    /// Applied on error or abort to undo an optimistic write
    pub revert_data: Option<Transform>,
}

impl MutationDescriptor {
    /// An empty descriptor (every phase is a no-op)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the mutation as local
    #[must_use]
    pub const fn local(mut self) -> Self {
        self.local = true;
        self
    }

    /// Set the committing updater
    #[must_use]
    pub fn update_data<F>(mut self, updater: F) -> Self
    where
        F: Fn(&Value, &Value) -> Value + Send + Sync + 'static,
    {
        self.update_data = Some(Arc::new(updater));
        self
    }

    /// Set the optimistic transform
    #[must_use]
    pub fn update_data_optimistic<F>(mut self, transform: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        self.update_data_optimistic = Some(Arc::new(transform));
        self
    }

    /// Set the reverting transform
    #[must_use]
    pub fn revert_data<F>(mut self, transform: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        self.revert_data = Some(Arc::new(transform));
        self
    }
}

impl fmt::Debug for MutationDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MutationDescriptor")
            .field("local", &self.local)
            .field("update_data", &self.update_data.is_some())
            .field("update_data_optimistic", &self.update_data_optimistic.is_some())
            .field("revert_data", &self.revert_data.is_some())
            .finish()
    }
}

/// How an action alters the data of one targeted query
#[derive(Clone)]
pub enum Mutation {
    /// Bare updater, applied on success
    Update(Updater),
    /// Full descriptor
    Descriptor(MutationDescriptor),
}

impl Mutation {
    /// Bare updater form
    #[must_use]
    pub fn update<F>(updater: F) -> Self
    where
        F: Fn(&Value, &Value) -> Value + Send + Sync + 'static,
    {
        Self::Update(Arc::new(updater))
    }

    /// Whether the mutation is applied without a network phase
    #[must_use]
    pub const fn is_local(&self) -> bool {
        matches!(self, Self::Descriptor(MutationDescriptor { local: true, .. }))
    }

    /// The committing updater, in either form
    #[must_use]
    pub const fn updater(&self) -> Option<&Updater> {
        match self {
            Self::Update(updater) => Some(updater),
            Self::Descriptor(descriptor) => descriptor.update_data.as_ref(),
        }
    }

    /// The optimistic transform, if any
    #[must_use]
    pub const fn optimistic(&self) -> Option<&Transform> {
        match self {
            Self::Update(_) => None,
            Self::Descriptor(descriptor) => descriptor.update_data_optimistic.as_ref(),
        }
    }

    /// The reverting transform, if any
    #[must_use]
    pub const fn reverter(&self) -> Option<&Transform> {
        match self {
            Self::Update(_) => None,
            Self::Descriptor(descriptor) => descriptor.revert_data.as_ref(),
        }
    }
}

impl From<MutationDescriptor> for Mutation {
    fn from(descriptor: MutationDescriptor) -> Self {
        Self::Descriptor(descriptor)
    }
}

impl fmt::Debug for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Update(_) => write!(f, "Mutation::Update(<fn>)"),
            Self::Descriptor(descriptor) => {
                f.debug_tuple("Mutation::Descriptor").field(descriptor).finish()
            },
        }
    }
}

/// Metadata attached to a dispatched action
#[derive(Clone, Debug, Default)]
pub struct ActionMeta {
    /// Mutations to apply to existing queries
    pub mutations: Mutations,
    /// Normalize the success data of this query
    pub normalize: bool,
    /// Response already resolved during server rendering
    pub ssr_response: Option<Value>,
    /// Force the request to be treated as a query
    pub as_query: Option<bool>,
    /// Force the request to be treated as a mutation
    pub as_mutation: Option<bool>,
}

/// An action as dispatched by application code.
///
/// It starts a request when it carries a [`Request`]; without one it is a
/// plain action that may still carry local mutations.
#[derive(Clone, Debug, Default)]
pub struct RequestAction {
    /// Action type, also the identifier of the query it tracks
    pub action_type: String,
    /// Request descriptor (plain `request` or FSA `payload.request`)
    pub request: Option<Request>,
    /// Payload handed to local mutation updaters
    pub payload: Option<Value>,
    /// Metadata
    pub meta: ActionMeta,
}

impl RequestAction {
    /// A plain action of the given type
    #[must_use]
    pub fn new(action_type: impl Into<String>) -> Self {
        Self {
            action_type: action_type.into(),
            ..Self::default()
        }
    }

    /// Attach a request descriptor
    #[must_use]
    pub fn with_request(mut self, request: Request) -> Self {
        self.request = Some(request);
        self
    }

    /// Attach a payload
    #[must_use]
    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Add a mutation targeting `query_type`
    #[must_use]
    pub fn with_mutation(mut self, query_type: impl Into<String>, mutation: impl Into<Mutation>) -> Self {
        self.meta.mutations.insert(query_type.into(), mutation.into());
        self
    }

    /// Request normalization of the success data
    #[must_use]
    pub const fn normalized(mut self) -> Self {
        self.meta.normalize = true;
        self
    }

    /// Attach a response resolved during server rendering
    #[must_use]
    pub fn with_ssr_response(mut self, response: Value) -> Self {
        self.meta.ssr_response = Some(response);
        self
    }

    /// Whether this action starts a network request
    #[must_use]
    pub const fn is_request(&self) -> bool {
        self.request.is_some()
    }

    /// Whether this request is tracked as a query.
    ///
    /// `meta.as_mutation` wins over `meta.as_query`, which wins over the
    /// request method.
    #[must_use]
    pub fn is_query(&self) -> bool {
        let Some(request) = &self.request else {
            return false;
        };
        if self.meta.as_mutation == Some(true) {
            return false;
        }
        self.meta.as_query == Some(true) || request.is_read()
    }
}

/// Lifecycle phase of an action
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Dispatched by application code
    Dispatched,
    /// Request succeeded
    Success,
    /// Request failed
    Error,
    /// Request was aborted
    Abort,
}

/// An action, resolved once from its raw shape
#[derive(Clone, Debug)]
pub enum Action {
    /// Dispatched by application code (request start, local mutation, or anything else)
    Dispatched(RequestAction),
    /// The request of `request_action` succeeded with `data`
    Success {
        /// The originating request action
        request_action: RequestAction,
        /// Response data
        data: Value,
    },
    /// The request of `request_action` failed with `error`
    Error {
        /// The originating request action
        request_action: RequestAction,
        /// Error value
        error: Value,
    },
    /// The request of `request_action` was aborted
    Abort {
        /// The originating request action
        request_action: RequestAction,
    },
}

impl Action {
    /// Success response for `request_action`
    #[must_use]
    pub const fn success(request_action: RequestAction, data: Value) -> Self {
        Self::Success {
            request_action,
            data,
        }
    }

    /// Error response for `request_action`
    #[must_use]
    pub const fn error(request_action: RequestAction, error: Value) -> Self {
        Self::Error {
            request_action,
            error,
        }
    }

    /// Abort of `request_action`
    #[must_use]
    pub const fn abort(request_action: RequestAction) -> Self {
        Self::Abort { request_action }
    }

    /// The dispatched action this action belongs to
    #[must_use]
    pub const fn request_action(&self) -> &RequestAction {
        match self {
            Self::Dispatched(request_action)
            | Self::Success { request_action, .. }
            | Self::Error { request_action, .. }
            | Self::Abort { request_action } => request_action,
        }
    }

    /// Lifecycle phase
    #[must_use]
    pub const fn phase(&self) -> Phase {
        match self {
            Self::Dispatched(_) => Phase::Dispatched,
            Self::Success { .. } => Phase::Success,
            Self::Error { .. } => Phase::Error,
            Self::Abort { .. } => Phase::Abort,
        }
    }
}

impl From<RequestAction> for Action {
    fn from(request_action: RequestAction) -> Self {
        Self::Dispatched(request_action)
    }
}
