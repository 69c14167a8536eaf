//! Reactive runtime contract.
//!
//! The engine never depends on a concrete reactive framework. It consumes
//! three primitives from the store runtime it is handed:
//! - field reads and atomic batch writes (wrap-and-notify),
//! - a watch scheduler that recomputes a derived snapshot and invokes a
//!   callback when it changes, honoring debounce and immediate-fire options,
//! - field-kind introspection, so derived and behavior members are never
//!   persisted.
//!
//! Any reactive or manual-diffing implementation of [`StateStore`] is
//! substitutable.

use crate::config::ReactionConfig;
use serde_json::Value;
use statekeep_types::{FieldKind, Snapshot};
use std::fmt;

/// Recomputes the derived snapshot a watch observes.
pub type SnapshotFn = Box<dyn Fn() -> Snapshot + Send + Sync>;

/// Receives each changed snapshot a watch produces.
pub type SnapshotSink = Box<dyn Fn(Snapshot) + Send + Sync>;

/// The store runtime the engine synchronizes against.
pub trait StateStore: Send + Sync {
    /// Returns the declared kind of `key`, or `None` if the store has no own
    /// field of that name.
    fn field_kind(&self, key: &str) -> Option<FieldKind>;

    /// Reads the current value of `key` as plain, deep-unwrapped data.
    fn read(&self, key: &str) -> Option<Value>;

    /// Applies a batch of field assignments atomically: no external read
    /// observes a partially applied batch.
    fn apply(&self, changes: Vec<(String, Value)>);

    /// Observes the derived snapshot produced by `compute`, invoking
    /// `on_change` whenever it changes.
    ///
    /// `config.delay_ms` is the debounce interval before `on_change` fires;
    /// `config.fire_immediately` invokes `on_change` once with the current
    /// snapshot upon registration. Callbacks must run within a Tokio runtime
    /// context: the engine schedules its storage writes from them.
    fn watch(
        &self,
        compute: SnapshotFn,
        on_change: SnapshotSink,
        config: &ReactionConfig,
    ) -> WatchHandle;
}

/// Ownership of an active watch subscription.
///
/// Dropping the handle does not cancel the watch; call
/// [`WatchHandle::cancel`].
pub struct WatchHandle {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl WatchHandle {
    /// Wraps the cancellation action provided by the runtime.
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Cancels the watch subscription.
    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for WatchHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchHandle").finish_non_exhaustive()
    }
}
