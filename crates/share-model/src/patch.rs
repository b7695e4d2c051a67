//! Dotted-path helpers for partial document changes
//!
//! Document updates are depth-partial JSON objects. Keys may be dotted
//! (`"system.attributes.hp.value"`) and are expanded before merging. A key of
//! the form `"-=name"` deletes `name` from the target object.

use serde_json::{Map, Value};

const DELETION_PREFIX: &str = "-=";

/// Key that deletes `name` when the change is merged
pub fn deletion_key(name: &str) -> String {
    format!("{DELETION_PREFIX}{name}")
}

/// Read the value at a dotted path
pub fn get_property<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(value, |current, segment| current.as_object()?.get(segment))
}

/// Whether a change sets or deletes the value at `path`
///
/// A deletion of any ancestor also counts.
pub fn touches(changed: &Value, path: &str) -> bool {
    let mut current = changed;
    for segment in path.split('.') {
        let Some(object) = current.as_object() else {
            return false;
        };
        if object.contains_key(&deletion_key(segment)) {
            return true;
        }
        match object.get(segment) {
            Some(next) => current = next,
            None => return false,
        }
    }
    true
}

/// Build `{a: {b: {c: value}}}` from `"a.b.c"`
pub fn nested(path: &str, value: Value) -> Value {
    path.rsplit('.').fold(value, |inner, segment| {
        let mut object = Map::new();
        object.insert(segment.to_string(), inner);
        Value::Object(object)
    })
}

/// Expand dotted keys into nested objects, recursively
///
/// Deletion keys are kept as they are so the expanded change can still be
/// merged with [`merge_object`].
pub fn expand_object(value: Value) -> Value {
    let Value::Object(object) = value else {
        return value;
    };

    let mut expanded = Map::new();
    for (key, inner) in object {
        let segments: Vec<&str> = key.split('.').collect();
        insert_path(&mut expanded, &segments, expand_object(inner));
    }
    Value::Object(expanded)
}

fn insert_path(target: &mut Map<String, Value>, segments: &[&str], value: Value) {
    match segments {
        [] => {}
        [leaf] => {
            let key = leaf.to_string();
            match value {
                Value::Object(incoming) if target.get(&key).is_some_and(Value::is_object) => {
                    if let Some(Value::Object(existing)) = target.get_mut(&key) {
                        for (inner_key, inner) in incoming {
                            insert_path(existing, &[inner_key.as_str()], inner);
                        }
                    }
                }
                value => {
                    target.insert(key, value);
                }
            }
        }
        [head, rest @ ..] => {
            let entry = target
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            if let Value::Object(inner) = entry {
                insert_path(inner, rest, value);
            }
        }
    }
}

/// Deep-merge `source` into `target`
///
/// Objects merge key by key, every other value replaces the target value.
pub fn merge_object(target: &mut Value, source: &Value) {
    let Value::Object(source) = source else {
        *target = source.clone();
        return;
    };
    if !target.is_object() {
        *target = Value::Object(Map::new());
    }
    let Some(target) = target.as_object_mut() else {
        return;
    };

    for (key, value) in source {
        if let Some(deleted) = key.strip_prefix(DELETION_PREFIX) {
            target.remove(deleted);
            continue;
        }
        let nested_merge = value.is_object() && target.get(key).is_some_and(Value::is_object);
        if nested_merge {
            if let Some(existing) = target.get_mut(key) {
                merge_object(existing, value);
            }
        } else {
            target.insert(key.clone(), value.clone());
        }
    }
}

/// Whether a change is an empty object
pub fn is_empty_change(changed: &Value) -> bool {
    changed.as_object().is_none_or(Map::is_empty)
}
