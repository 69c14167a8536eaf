//! Tracked-property descriptors.

use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// A value transform applied when moving between the in-memory and the
/// storable representation of a field.
pub type ConvertFn = Arc<dyn Fn(Value) -> Value + Send + Sync>;

/// Describes one tracked field of a persisted store.
#[derive(Clone)]
pub enum PropertyDescriptor {
    /// Track the field by name, persisting its value as-is.
    Key(String),
    /// Track the field by name with explicit forward/backward transforms
    /// between its in-memory and storable representations.
    Converter {
        /// The field name.
        key: String,
        /// In-memory value to storable value.
        serialize: ConvertFn,
        /// Storable value back to in-memory value.
        deserialize: ConvertFn,
    },
}

impl PropertyDescriptor {
    /// Creates a converter descriptor for `key`.
    pub fn converter<S, D>(key: impl Into<String>, serialize: S, deserialize: D) -> Self
    where
        S: Fn(Value) -> Value + Send + Sync + 'static,
        D: Fn(Value) -> Value + Send + Sync + 'static,
    {
        PropertyDescriptor::Converter {
            key: key.into(),
            serialize: Arc::new(serialize),
            deserialize: Arc::new(deserialize),
        }
    }

    /// Resolves the descriptor to the field name it tracks.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            PropertyDescriptor::Key(key) => key,
            PropertyDescriptor::Converter { key, .. } => key,
        }
    }
}

impl From<&str> for PropertyDescriptor {
    fn from(key: &str) -> Self {
        PropertyDescriptor::Key(key.to_string())
    }
}

impl From<String> for PropertyDescriptor {
    fn from(key: String) -> Self {
        PropertyDescriptor::Key(key)
    }
}

impl fmt::Debug for PropertyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyDescriptor::Key(key) => f.debug_tuple("Key").field(key).finish(),
            PropertyDescriptor::Converter { key, .. } => f
                .debug_struct("Converter")
                .field("key", key)
                .finish_non_exhaustive(),
        }
    }
}
