//! Core type definitions for StateKeep.
//!
//! This crate defines the fundamental, backend-agnostic types shared by the
//! persistence engine and its collaborators:
//! - Store identifiers (UUID v7)
//! - Field kind tags declared by the reactive runtime
//! - Payload shapes exchanged with storage backends
//!
//! Engine, adapter and transform logic live in `statekeep-persist`, not here.

mod ids;
mod value;

pub use ids::StoreId;
pub use value::{FieldKind, Snapshot, StoredValue};
