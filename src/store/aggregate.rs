// src/store/aggregate.rs

use serde_json::Map;
use tracing::warn;

use crate::store::results::ResultStore;
use crate::task::ResultPath;
use crate::types::Value;

/// Build the nested aggregate from every recorded success that carries a
/// result path.
///
/// Results are applied in recording order, so when two tasks share a full
/// path the one recorded last wins.
pub fn aggregate(store: &ResultStore) -> Value {
    let mut root = Map::new();

    for (spec, value) in store.successes() {
        if let Some(path) = spec.result_path() {
            insert_at(&mut root, path, value.clone());
        }
    }

    Value::Object(root)
}

fn insert_at(root: &mut Map<String, Value>, path: &ResultPath, value: Value) {
    let mut current = root;

    for segment in path.parents() {
        let slot = current
            .entry(segment.clone())
            .or_insert_with(|| Value::Object(Map::new()));

        if !slot.is_object() {
            warn!(
                path = %path,
                segment = %segment,
                "replacing non-object value on result path with a nested object"
            );
            *slot = Value::Object(Map::new());
        }

        current = match slot {
            Value::Object(map) => map,
            _ => return,
        };
    }

    current.insert(path.leaf().to_string(), value);
}
