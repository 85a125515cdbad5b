//! # Request State Reducers
//!
//! Reducers tracking the lifecycle of network requests.
//!
//! A dispatch layer (middleware, sagas, an HTTP client) emits a request action
//! and later exactly one success, error or abort action for it. These reducers
//! turn that stream into state:
//!
//! - [`QueriesReducer`]: one [`QueryRecord`] per query, optimistic and
//!   committed mutations of cached data, and a normalized entity table
//! - [`SsrReducer`]: which requests were resolved during server rendering
//! - [`RequestsReducer`]: both, mounted over [`RequestsState`]
//!
//! Raw JSON actions (plain or FSA-wrapped) are resolved once by
//! [`ActionDecoder`]; the reducers only pattern match on [`Action`].
//!
//! ## Example
//!
//! ```
//! use request_state_core::reducer::Reducer;
//! use request_state_reducers::{
//!     Action, MutationDescriptor, QueriesReducer, QueriesState, QueryRecord, Request,
//!     RequestAction, RequestsConfig,
//! };
//! use serde_json::{Value, json};
//!
//! let config = RequestsConfig::default();
//! let mut state = QueriesState::new().with_query(
//!     "FETCH_BOOK",
//!     QueryRecord { data: json!("data"), ..QueryRecord::default() },
//! );
//!
//! let suffix = |data: &Value| json!(format!("{} suffix", data.as_str().unwrap_or_default()));
//! let reverted = |data: &Value| json!(format!("{} reverted", data.as_str().unwrap_or_default()));
//! let update_book = RequestAction::new("UPDATE_BOOK")
//!     .with_request(Request::get("/books/1").with_method("put"))
//!     .with_mutation(
//!         "FETCH_BOOK",
//!         MutationDescriptor::new().update_data_optimistic(suffix).revert_data(reverted),
//!     );
//!
//! let _ = QueriesReducer.reduce(&mut state, Action::Dispatched(update_book.clone()), &config);
//! assert_eq!(state.queries["FETCH_BOOK"].data, json!("data suffix"));
//!
//! let _ = QueriesReducer.reduce(&mut state, Action::error(update_book, json!("error")), &config);
//! assert_eq!(state.queries["FETCH_BOOK"].data, json!("data suffix reverted"));
//! ```

pub mod actions;
pub mod config;
pub mod decode;
pub mod error;
mod mutations;
pub mod normalize;
pub mod queries;
pub mod requests;
pub mod selectors;
pub mod ssr;
pub mod state;

pub use actions::{
    Action, ActionMeta, Mutation, MutationDescriptor, Mutations, Phase, Request, RequestAction,
    Transform, Updater,
};
pub use config::{ActionTypeSuffixes, KeyField, NormalizationStrategy, RequestsConfig, SsrMode};
pub use decode::{ActionDecoder, UpdaterRegistry};
pub use error::{ConfigError, DecodeError};
pub use normalize::{NormalizedData, denormalize, normalize};
pub use queries::QueriesReducer;
pub use requests::{RequestsEnvironment, RequestsReducer};
pub use selectors::{QueryView, get_query};
pub use ssr::SsrReducer;
pub use state::{QueriesState, QueryRecord, RequestsState, SsrState};
