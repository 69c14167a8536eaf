//! Hydrate-then-watch persistence for reactive stores.
//!
//! StateKeep keeps a designated subset of a reactive store's fields
//! synchronized with a pluggable storage backend: at startup the engine
//! restores ("hydrates") saved values into the store, and thereafter it
//! watches the tracked fields and writes a debounced snapshot back to
//! storage on every change.
//!
//! # Components
//!
//! - **Engine**: owns the hydrate/watch lifecycle and the lifecycle API
//!   (`init`, `hydrate_store`, `start_persisting`, `pause_persisting`,
//!   `stop_persisting`).
//! - **Transform pipeline**: pure conversions between in-memory and
//!   storable value shapes (entry lists for map containers, converter
//!   descriptors for everything custom).
//! - **Adapter facade**: effective configuration, expiration bookkeeping
//!   and payload (de)serialization around the three-method backend
//!   contract.
//! - **Registry**: process-wide store-to-engine bookkeeping for teardown.
//!
//! # Lifecycle
//!
//! 1. **Construct**: resolve configuration (built-in < process default <
//!    per-engine) and validate the backend.
//! 2. **Hydrate**: read the stored snapshot and apply it to the store as
//!    one atomic batch.
//! 3. **Watch**: observe a derived snapshot of the tracked fields and
//!    write it through the adapter on every change, debounced.
//! 4. **Teardown**: `stop_persisting` cancels the watch, deregisters the
//!    engine and releases the store. Terminal.

mod adapter;
mod backend;
mod config;
mod diagnostics;
mod engine;
mod error;
mod property;
pub mod registry;
mod runtime;
pub mod transform;

pub use adapter::{AdapterOptions, StorageAdapter};
pub use backend::StorageBackend;
pub use config::{GlobalConfig, PersistOptions, ReactionConfig, ReactionOptions};
pub use engine::{make_persistable, make_persistable_with, PersistEngine};
pub use error::{PersistError, PersistResult};
pub use property::{ConvertFn, PropertyDescriptor};
pub use runtime::{SnapshotFn, SnapshotSink, StateStore, WatchHandle};
