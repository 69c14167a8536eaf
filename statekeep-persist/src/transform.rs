//! Property transform pipeline.
//!
//! Pure functions converting tracked values between their in-memory and
//! storable shapes. Associative-map containers travel as `[key, value]`
//! entry lists; converter descriptors apply their own transforms on top.
//! None of these functions mutate their inputs.

use crate::property::PropertyDescriptor;
use serde_json::Value;
use statekeep_types::{FieldKind, Snapshot};

/// Converts an in-memory value to its storable shape.
///
/// A map-kind object becomes an entry list first; a converter's `serialize`
/// then runs on the result.
#[must_use]
pub fn to_storable(value: Value, kind: FieldKind, descriptor: &PropertyDescriptor) -> Value {
    let value = match value {
        Value::Object(map) if kind == FieldKind::Map => map_to_entries(&map),
        other => other,
    };

    match descriptor {
        PropertyDescriptor::Converter { serialize, .. } => serialize(value),
        PropertyDescriptor::Key(_) => value,
    }
}

/// Converts a stored value back to its in-memory shape.
///
/// An entry list targeting a map-kind field rebuilds the container;
/// otherwise a converter's `deserialize` applies; otherwise the stored
/// value passes through unchanged.
#[must_use]
pub fn from_storable(stored: Value, kind: FieldKind, descriptor: &PropertyDescriptor) -> Value {
    if kind == FieldKind::Map && is_entry_list(&stored) {
        if let Value::Array(entries) = &stored {
            return Value::Object(entries_to_map(entries));
        }
    }

    match descriptor {
        PropertyDescriptor::Converter { deserialize, .. } => deserialize(stored),
        PropertyDescriptor::Key(_) => stored,
    }
}

/// Whether `value` is an entry list: an array whose elements are all
/// `[string, value]` pairs.
#[must_use]
pub fn is_entry_list(value: &Value) -> bool {
    match value {
        Value::Array(items) => items.iter().all(|item| match item {
            Value::Array(pair) => pair.len() == 2 && pair[0].is_string(),
            _ => false,
        }),
        _ => false,
    }
}

/// Converts a map container to an ordered `[key, value]` entry list.
#[must_use]
pub fn map_to_entries(map: &Snapshot) -> Value {
    Value::Array(
        map.iter()
            .map(|(key, value)| Value::Array(vec![Value::String(key.clone()), value.clone()]))
            .collect(),
    )
}

/// Rebuilds a map container from a `[key, value]` entry list.
#[must_use]
pub fn entries_to_map(entries: &[Value]) -> Snapshot {
    let mut map = Snapshot::new();
    for entry in entries {
        if let Value::Array(pair) = entry {
            if let [Value::String(key), value] = pair.as_slice() {
                map.insert(key.clone(), value.clone());
            }
        }
    }
    map
}
