//! Value shapes exchanged between the engine, the reactive runtime and
//! storage backends.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A flat key/value snapshot of the tracked fields of one store.
pub type Snapshot = serde_json::Map<String, Value>;

/// The kind of a store member, declared by the reactive runtime at
/// configuration time.
///
/// Container detection is tag-driven: the runtime reports `Map` for fields
/// backed by an associative-map container, so the engine never inspects
/// values at runtime to guess their shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// A plain observable value.
    Value,
    /// An associative-map container, persisted as a `[key, value]` entry list.
    Map,
    /// A derived (computed) member. Never persisted.
    Computed,
    /// A behavior (method) member. Never persisted.
    Action,
}

impl FieldKind {
    /// Whether a member of this kind may appear in a persisted snapshot.
    #[must_use]
    pub fn is_persistable(self) -> bool {
        !matches!(self, FieldKind::Computed | FieldKind::Action)
    }
}

/// A payload as handed to (or returned by) a storage backend.
///
/// Backends may hold text or structured records; the adapter's `stringify`
/// option decides which shape is written.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredValue {
    /// A serialized text payload.
    Text(String),
    /// A structured record payload.
    Record(Value),
}

impl StoredValue {
    /// Returns the text payload, if this is a text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            StoredValue::Text(text) => Some(text),
            StoredValue::Record(_) => None,
        }
    }

    /// Returns the record payload, if this is a record value.
    #[must_use]
    pub fn as_record(&self) -> Option<&Value> {
        match self {
            StoredValue::Record(value) => Some(value),
            StoredValue::Text(_) => None,
        }
    }
}
