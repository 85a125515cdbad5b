//! Read side of the queries state.

use crate::normalize::denormalize;
use crate::state::QueriesState;
use serde::Serialize;
use serde_json::Value;

/// What a consumer sees of one query
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct QueryView {
    /// Data, with entities expanded when the query is normalized
    pub data: Value,
    /// Last error
    pub error: Value,
    /// Whether at least one request is in flight
    pub loading: bool,
    /// Raw pending counter
    pub pending: i64,
}

/// View of the query tracked under `query_type`.
///
/// Queries never referenced yield the default view.
#[must_use]
pub fn get_query(state: &QueriesState, query_type: &str) -> QueryView {
    let Some(record) = state.query(query_type) else {
        return QueryView::default();
    };

    let data = if record.normalized {
        denormalize(&record.data, &state.normalized_data)
    } else {
        record.data.clone()
    };

    QueryView {
        data,
        error: record.error.clone(),
        loading: record.pending > 0,
        pending: record.pending,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::NormalizedData;
    use crate::state::QueryRecord;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_unknown_query_is_default() {
        assert_eq!(get_query(&QueriesState::new(), "FETCH_BOOK"), QueryView::default());
    }

    #[test]
    fn test_normalized_query_is_expanded() {
        let mut state = QueriesState::new().with_query(
            "FETCH_BOOK",
            QueryRecord {
                data: json!({"book": "@@1"}),
                pending: 1,
                normalized: true,
                ..QueryRecord::default()
            },
        );
        state.normalized_data = Arc::new(NormalizedData::from([(
            "@@1".to_string(),
            json!({"id": "1", "title": "Dune"}),
        )]));

        let view = get_query(&state, "FETCH_BOOK");
        assert_eq!(view.data, json!({"book": {"id": "1", "title": "Dune"}}));
        assert!(view.loading);
    }

    #[test]
    fn test_plain_query_keeps_placeholder_like_strings() {
        let state = QueriesState::new().with_query(
            "FETCH_HANDLE",
            QueryRecord {
                data: json!("@@handle"),
                ..QueryRecord::default()
            },
        );
        let view = get_query(&state, "FETCH_HANDLE");
        assert_eq!(view.data, json!("@@handle"));
        assert!(!view.loading);
    }
}
