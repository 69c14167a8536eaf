//! Engine configuration: per-engine options, process-wide defaults and the
//! precedence rules that resolve them.
//!
//! Precedence, lowest to highest: built-in default, process-wide default,
//! per-engine option. Process-wide defaults are an explicit [`GlobalConfig`]
//! value built once at startup and threaded into engine construction; there
//! is no ambient global state.

use crate::adapter::AdapterOptions;
use crate::backend::StorageBackend;
use crate::property::PropertyDescriptor;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Options for one persisted store.
#[derive(Clone)]
pub struct PersistOptions {
    /// Unique name identifying the persisted record.
    pub name: String,
    /// The tracked fields.
    pub properties: Vec<PropertyDescriptor>,
    /// Log adapter activity when set.
    pub debug_mode: Option<bool>,
    /// Milliseconds after which the stored record expires.
    pub expire_in_ms: Option<u64>,
    /// Remove an expired record when it is read.
    pub remove_on_expiration: Option<bool>,
    /// The storage backend to persist against.
    pub storage: Option<Arc<dyn StorageBackend>>,
    /// Serialize payloads to text before handing them to the backend.
    pub stringify: Option<bool>,
}

impl PersistOptions {
    /// Creates options tracking `properties` under `name`. Everything else
    /// falls through the configured defaults.
    pub fn new(name: impl Into<String>, properties: Vec<PropertyDescriptor>) -> Self {
        Self {
            name: name.into(),
            properties,
            debug_mode: None,
            expire_in_ms: None,
            remove_on_expiration: None,
            storage: None,
            stringify: None,
        }
    }

    /// Sets the storage backend.
    #[must_use]
    pub fn with_storage(mut self, storage: Arc<dyn StorageBackend>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Sets the expiration interval in milliseconds.
    #[must_use]
    pub fn with_expire_in_ms(mut self, expire_in_ms: u64) -> Self {
        self.expire_in_ms = Some(expire_in_ms);
        self
    }

    /// Sets whether an expired record is removed when read.
    #[must_use]
    pub fn with_remove_on_expiration(mut self, remove: bool) -> Self {
        self.remove_on_expiration = Some(remove);
        self
    }

    /// Sets whether payloads are serialized to text.
    #[must_use]
    pub fn with_stringify(mut self, stringify: bool) -> Self {
        self.stringify = Some(stringify);
        self
    }

    /// Sets debug-mode tracing.
    #[must_use]
    pub fn with_debug_mode(mut self, debug_mode: bool) -> Self {
        self.debug_mode = Some(debug_mode);
        self
    }
}

impl fmt::Debug for PersistOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistOptions")
            .field("name", &self.name)
            .field("properties", &self.properties)
            .field("debug_mode", &self.debug_mode)
            .field("expire_in_ms", &self.expire_in_ms)
            .field("remove_on_expiration", &self.remove_on_expiration)
            .field("storage", &self.storage.as_ref().map(|_| "<backend>"))
            .field("stringify", &self.stringify)
            .finish()
    }
}

/// Watch scheduling options as supplied by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionOptions {
    /// Debounce interval in milliseconds before a write fires.
    pub delay_ms: Option<u64>,
    /// Fire one write with the current snapshot upon watch registration.
    pub fire_immediately: Option<bool>,
}

/// Resolved watch scheduling configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionConfig {
    /// Debounce interval in milliseconds, if any.
    pub delay_ms: Option<u64>,
    /// Whether the watch fires once immediately on registration.
    pub fire_immediately: bool,
}

impl Default for ReactionConfig {
    fn default() -> Self {
        Self {
            delay_ms: None,
            fire_immediately: true,
        }
    }
}

/// Process-wide default configuration, applied beneath per-engine options.
///
/// Build one at process start and pass it to every engine that should
/// inherit it. Engines constructed without an explicit tier use
/// `GlobalConfig::default()`, which leaves everything to the built-ins.
#[derive(Clone, Default)]
pub struct GlobalConfig {
    /// Default debug-mode flag.
    pub debug_mode: Option<bool>,
    /// Default expiration interval in milliseconds.
    pub expire_in_ms: Option<u64>,
    /// Default removal-on-expiration flag.
    pub remove_on_expiration: Option<bool>,
    /// Default storage backend.
    pub storage: Option<Arc<dyn StorageBackend>>,
    /// Default stringify flag.
    pub stringify: Option<bool>,
    /// Default watch scheduling options.
    pub reaction: ReactionOptions,
}

impl fmt::Debug for GlobalConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlobalConfig")
            .field("debug_mode", &self.debug_mode)
            .field("expire_in_ms", &self.expire_in_ms)
            .field("remove_on_expiration", &self.remove_on_expiration)
            .field("storage", &self.storage.as_ref().map(|_| "<backend>"))
            .field("stringify", &self.stringify)
            .field("reaction", &self.reaction)
            .finish()
    }
}

/// Resolves the reaction configuration: built-in `fire_immediately: true`
/// overridden by process defaults overridden by the explicit options.
pub(crate) fn resolve_reaction(explicit: ReactionOptions, defaults: &GlobalConfig) -> ReactionConfig {
    ReactionConfig {
        delay_ms: explicit.delay_ms.or(defaults.reaction.delay_ms),
        fire_immediately: explicit
            .fire_immediately
            .or(defaults.reaction.fire_immediately)
            .unwrap_or(true),
    }
}

/// Resolves the effective storage configuration for one engine.
pub(crate) fn resolve_storage(options: &PersistOptions, defaults: &GlobalConfig) -> AdapterOptions {
    AdapterOptions {
        expire_in_ms: options.expire_in_ms.or(defaults.expire_in_ms),
        remove_on_expiration: options
            .remove_on_expiration
            .or(defaults.remove_on_expiration)
            .unwrap_or(true),
        stringify: options.stringify.or(defaults.stringify).unwrap_or(true),
        debug_mode: options.debug_mode.or(defaults.debug_mode).unwrap_or(false),
        storage: options.storage.clone().or_else(|| defaults.storage.clone()),
    }
}
