//! Replay binary
//!
//! Reads newline-delimited JSON actions from a file (or stdin), folds them
//! through the request reducers and prints the final state.
//!
//! ```text
//! REQUESTS_SSR_MODE=server cargo run -p replay -- demos/replay/actions.ndjson
//! ```
//!
//! Mutation descriptors may reference the functions registered in
//! [`registry`]: `replace`, `append` (updaters) and `clear` (transform).

use anyhow::Context;
use clap::Parser;
use request_state_core::reducer::Reducer;
use request_state_reducers::{
    ActionDecoder, RequestsEnvironment, RequestsReducer, RequestsState, UpdaterRegistry, get_query,
};
use serde_json::Value;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "replay")]
#[command(about = "Replay newline-delimited JSON actions through the request reducers")]
#[command(version)]
struct Args {
    /// Actions file, one JSON action per line (stdin when omitted)
    input: Option<PathBuf>,
}

/// Mutation functions available to replayed actions
fn registry() -> UpdaterRegistry {
    UpdaterRegistry::new()
        .with_updater("replace", |_, payload| payload.clone())
        .with_updater("append", |data, payload| match data {
            Value::Array(items) => {
                let mut items = items.clone();
                items.push(payload.clone());
                Value::Array(items)
            },
            Value::Null => Value::Array(vec![payload.clone()]),
            other => other.clone(),
        })
        .with_transform("clear", |_| Value::Null)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "replay=info,request_state_reducers=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let env = RequestsEnvironment::from_env().context("loading request configuration")?;
    let decoder = ActionDecoder::new(env.config.suffixes.clone(), registry());
    let reducer = RequestsReducer::new();
    let mut state = RequestsState::default();

    let input: Box<dyn BufRead> = match &args.input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("opening {}", path.display()))?,
        )),
        None => Box::new(io::stdin().lock()),
    };

    tracing::info!(ssr_mode = ?env.ssr_mode, "replaying actions");

    let mut changed = 0usize;
    for (index, line) in input.lines().enumerate() {
        let line_number = index + 1;
        let line = line.with_context(|| format!("reading line {line_number}"))?;
        if line.trim().is_empty() {
            continue;
        }

        let raw: Value = serde_json::from_str(&line)
            .with_context(|| format!("parsing JSON on line {line_number}"))?;
        let action = decoder
            .decode(&raw)
            .with_context(|| format!("decoding action on line {line_number}"))?;

        let action_type = action.request_action().action_type.clone();
        let transition = reducer.reduce(&mut state, action, &env);
        if transition.is_changed() {
            changed += 1;
        }
        tracing::info!(
            line = line_number,
            action = %action_type,
            changed = transition.is_changed(),
            "reduced action"
        );
    }

    for query_type in state.queries.queries.keys() {
        let view = get_query(&state.queries, query_type);
        tracing::info!(query = %query_type, loading = view.loading, data = %view.data, "query view");
    }
    tracing::info!(changed, "replay complete");

    println!("{}", serde_json::to_string_pretty(&state)?);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use clap::error::ErrorKind;
    use request_state_reducers::ActionTypeSuffixes;

    #[test]
    fn test_command_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_input_path_is_optional() {
        let args = Args::try_parse_from(["replay"]).unwrap();
        assert!(args.input.is_none());

        let args = Args::try_parse_from(["replay", "actions.ndjson"]).unwrap();
        assert_eq!(args.input, Some(PathBuf::from("actions.ndjson")));
    }

    #[test]
    fn test_help_is_not_read_as_a_path() {
        let err = Args::try_parse_from(["replay", "--help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_registry_resolves_descriptor_names() {
        let decoder = ActionDecoder::new(ActionTypeSuffixes::default(), registry());
        let action = decoder
            .decode(&serde_json::json!({
                "type": "ADD",
                "payload": "x",
                "meta": {"mutations": {"LIST": {"local": true, "updateData": "append"}}}
            }))
            .unwrap();
        assert_eq!(action.request_action().meta.mutations.len(), 1);
    }
}
