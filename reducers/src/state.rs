//! State slices owned by the request reducers.

use crate::normalize::NormalizedData;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Status and cached outcome of one query
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryRecord {
    /// Last successful data (or its normalized placeholder structure)
    pub data: Value,
    /// Last error, reset when a new request starts
    pub error: Value,
    /// Started minus finished requests sharing this identifier
    pub pending: i64,
    /// Whether `data` holds placeholders into the entity table
    pub normalized: bool,
}

/// State of the queries reducer
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QueriesState {
    /// Query records keyed by request action type
    pub queries: BTreeMap<String, QueryRecord>,
    /// Entity table shared by every normalized query.
    ///
    /// Replaced only when an entity actually changes, so `Arc::ptr_eq` tells
    /// consumers whether anything moved.
    pub normalized_data: Arc<NormalizedData>,
}

impl QueriesState {
    /// Empty state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a query record, e.g. from a server-rendered snapshot
    #[must_use]
    pub fn with_query(mut self, query_type: impl Into<String>, record: QueryRecord) -> Self {
        self.queries.insert(query_type.into(), record);
        self
    }

    /// Record of a query, if it was ever referenced
    #[must_use]
    pub fn query(&self, query_type: &str) -> Option<&QueryRecord> {
        self.queries.get(query_type)
    }
}

/// State of the SSR reducer: request types resolved during server rendering,
/// in resolution order
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SsrState {
    /// Resolved request action types (duplicates allowed)
    pub request_types: Vec<String>,
}

impl SsrState {
    /// State holding the given request types
    #[must_use]
    pub fn from_types<I, T>(types: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            request_types: types.into_iter().map(Into::into).collect(),
        }
    }
}

/// Combined state of [`RequestsReducer`](crate::RequestsReducer)
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestsState {
    /// Queries slice
    pub queries: QueriesState,
    /// SSR bookkeeping slice
    pub ssr: SsrState,
}
