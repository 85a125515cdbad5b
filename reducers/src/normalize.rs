//! Entity normalization.
//!
//! Response data is walked depth-first; every object accepted by the
//! [`NormalizationStrategy`] is moved into a flat entity table and replaced in
//! place by a placeholder string (`"@@" + key`). Nested entities are replaced
//! inside their parent before the parent itself is stored.

use crate::config::NormalizationStrategy;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::sync::Arc;

/// Prefix marking a string as an entity placeholder
pub const PLACEHOLDER_PREFIX: &str = "@@";

/// Entity table: placeholder -> entity object
pub type NormalizedData = BTreeMap<String, Value>;

/// Result of normalizing one value
#[derive(Clone, Debug, PartialEq)]
pub struct Normalized {
    /// The input with entities replaced by placeholders
    pub result: Value,
    /// Entities found in the input, keyed by placeholder
    pub entities: NormalizedData,
}

/// Placeholder for an entity key
#[must_use]
pub fn placeholder(key: &str) -> String {
    format!("{PLACEHOLDER_PREFIX}{key}")
}

/// Split `data` into a placeholder structure and an entity table
#[must_use]
pub fn normalize(data: &Value, strategy: &dyn NormalizationStrategy) -> Normalized {
    let mut entities = NormalizedData::new();
    let result = extract(data, strategy, &mut entities);
    Normalized { result, entities }
}

fn extract(value: &Value, strategy: &dyn NormalizationStrategy, entities: &mut NormalizedData) -> Value {
    match value {
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| extract(item, strategy, entities))
                .collect(),
        ),
        Value::Object(object) => {
            let transformed: Map<String, Value> = object
                .iter()
                .map(|(field, nested)| (field.clone(), extract(nested, strategy, entities)))
                .collect();

            if !strategy.should_normalize(object) {
                return Value::Object(transformed);
            }
            let Some(key) = strategy.object_key(object) else {
                return Value::Object(transformed);
            };

            let key = placeholder(&key);
            merge_entity(entities, key.clone(), transformed);
            Value::String(key)
        },
        scalar => scalar.clone(),
    }
}

/// Shallow-merge `fields` into the entity stored under `key`
fn merge_entity(entities: &mut NormalizedData, key: String, fields: Map<String, Value>) {
    match entities.entry(key) {
        Entry::Occupied(mut entry) => match entry.get_mut() {
            Value::Object(existing) => existing.extend(fields),
            other => *other = Value::Object(fields),
        },
        Entry::Vacant(entry) => {
            entry.insert(Value::Object(fields));
        },
    }
}

/// Merge freshly extracted entities into the stored table.
///
/// Each entity is shallow-merged over the stored one. Returns `None` when every
/// merged entity is deep-equal to what is already stored, so the caller keeps
/// the existing `Arc`.
#[must_use]
pub fn merge_normalized_data(
    current: &Arc<NormalizedData>,
    entities: NormalizedData,
) -> Option<Arc<NormalizedData>> {
    let updates: Vec<(String, Value)> = entities
        .into_iter()
        .filter_map(|(key, entity)| {
            let stored = current.get(&key);
            let merged = match (stored, entity) {
                (Some(Value::Object(existing)), Value::Object(fields)) => {
                    let mut merged = existing.clone();
                    merged.extend(fields);
                    Value::Object(merged)
                },
                (_, entity) => entity,
            };
            (stored != Some(&merged)).then_some((key, merged))
        })
        .collect();

    if updates.is_empty() {
        return None;
    }

    let mut next = NormalizedData::clone(current);
    next.extend(updates);
    Some(Arc::new(next))
}

/// Normalize `data` and fold its entities into `normalized_data`.
///
/// The table is only replaced when an entity actually changed. Returns the
/// placeholder structure to store on the query.
pub(crate) fn normalize_into(
    normalized_data: &mut Arc<NormalizedData>,
    data: &Value,
    strategy: &dyn NormalizationStrategy,
) -> Value {
    let Normalized { result, entities } = normalize(data, strategy);
    let touched = entities.len();

    match merge_normalized_data(normalized_data, entities) {
        Some(next) => {
            tracing::debug!(entities = touched, "normalized data updated");
            *normalized_data = next;
        },
        None => {
            tracing::trace!(entities = touched, "normalized data unchanged");
        },
    }

    result
}

/// Replace placeholders in `value` by the entities they point to, recursively.
///
/// Placeholders without a stored entity are left as they are, as are
/// placeholders that would recurse into an entity already being expanded.
#[must_use]
pub fn denormalize(value: &Value, normalized_data: &NormalizedData) -> Value {
    expand(value, normalized_data, &mut Vec::new())
}

fn expand(value: &Value, normalized_data: &NormalizedData, path: &mut Vec<String>) -> Value {
    match value {
        Value::String(key) if key.starts_with(PLACEHOLDER_PREFIX) && !path.contains(key) => {
            let Some(entity) = normalized_data.get(key) else {
                return value.clone();
            };
            path.push(key.clone());
            let expanded = expand(entity, normalized_data, path);
            path.pop();
            expanded
        },
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| expand(item, normalized_data, path))
                .collect(),
        ),
        Value::Object(object) => Value::Object(
            object
                .iter()
                .map(|(field, nested)| (field.clone(), expand(nested, normalized_data, path)))
                .collect(),
        ),
        scalar => scalar.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KeyField;
    use serde_json::json;

    #[test]
    fn test_normalize_top_level_entity() {
        let normalized = normalize(&json!({"id": "1", "name": "name"}), &KeyField::default());
        assert_eq!(normalized.result, json!("@@1"));
        assert_eq!(
            normalized.entities,
            NormalizedData::from([("@@1".to_string(), json!({"id": "1", "name": "name"}))])
        );
    }

    #[test]
    fn test_normalize_nested_entities() {
        let data = json!({
            "page": 1,
            "books": [
                {"id": "1", "title": "Dune", "author": {"id": "a1", "name": "Herbert"}},
                {"id": "2", "title": "Emma", "author": {"id": "a2", "name": "Austen"}},
            ],
        });

        let normalized = normalize(&data, &KeyField::default());

        assert_eq!(normalized.result, json!({"page": 1, "books": ["@@1", "@@2"]}));
        assert_eq!(normalized.entities["@@1"], json!({"id": "1", "title": "Dune", "author": "@@a1"}));
        assert_eq!(normalized.entities["@@a2"], json!({"id": "a2", "name": "Austen"}));
        assert_eq!(normalized.entities.len(), 4);
    }

    #[test]
    fn test_normalize_merges_repeated_entities() {
        let data = json!([{"id": "1", "name": "a"}, {"id": "1", "rating": 5}]);
        let normalized = normalize(&data, &KeyField::default());
        assert_eq!(normalized.result, json!(["@@1", "@@1"]));
        assert_eq!(normalized.entities["@@1"], json!({"id": "1", "name": "a", "rating": 5}));
    }

    #[test]
    fn test_normalize_scalar_has_no_entities() {
        let normalized = normalize(&json!("data"), &KeyField::default());
        assert_eq!(normalized.result, json!("data"));
        assert!(normalized.entities.is_empty());
    }

    #[test]
    fn test_merge_keeps_arc_for_identical_entities() {
        let current = Arc::new(NormalizedData::from([(
            "@@1".to_string(),
            json!({"id": "1", "name": "name"}),
        )]));

        let same = NormalizedData::from([("@@1".to_string(), json!({"id": "1", "name": "name"}))]);
        assert!(merge_normalized_data(&current, same).is_none());

        let partial = NormalizedData::from([("@@1".to_string(), json!({"id": "1"}))]);
        assert!(merge_normalized_data(&current, partial).is_none());

        assert!(merge_normalized_data(&current, NormalizedData::new()).is_none());
    }

    #[test]
    fn test_merge_updates_changed_entities() {
        let current = Arc::new(NormalizedData::from([(
            "@@1".to_string(),
            json!({"id": "1", "name": "old", "year": 1965}),
        )]));

        let changed = NormalizedData::from([("@@1".to_string(), json!({"id": "1", "name": "new"}))]);
        let next = merge_normalized_data(&current, changed);

        assert_eq!(
            next.as_deref().map(|data| data["@@1"].clone()),
            Some(json!({"id": "1", "name": "new", "year": 1965}))
        );
    }

    #[test]
    fn test_denormalize_round_trip() {
        let data = json!({"books": [{"id": "1", "author": {"id": "a1", "name": "Herbert"}}]});
        let normalized = normalize(&data, &KeyField::default());
        assert_eq!(denormalize(&normalized.result, &normalized.entities), data);
    }

    #[test]
    fn test_denormalize_cuts_cycles() {
        let entities = NormalizedData::from([
            ("@@1".to_string(), json!({"id": "1", "friend": "@@2"})),
            ("@@2".to_string(), json!({"id": "2", "friend": "@@1"})),
        ]);
        assert_eq!(
            denormalize(&json!("@@1"), &entities),
            json!({"id": "1", "friend": {"id": "2", "friend": "@@1"}})
        );
    }

    #[test]
    fn test_denormalize_leaves_unknown_placeholders() {
        assert_eq!(denormalize(&json!("@@missing"), &NormalizedData::new()), json!("@@missing"));
    }
}
