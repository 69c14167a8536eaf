//! Storage backend capability contract.
//!
//! The engine never talks to a concrete backend directly; it consumes this
//! three-method contract through the adapter facade. Anything that can get,
//! set and remove a keyed payload qualifies: browser-style local storage, a
//! file, a database row, an in-memory map.

use crate::error::PersistResult;
use async_trait::async_trait;
use statekeep_types::StoredValue;

/// Abstract storage backend interface.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Retrieves the payload stored under `key`, or `None` if absent.
    async fn get_item(&self, key: &str) -> PersistResult<Option<StoredValue>>;

    /// Saves `value` under `key`, replacing any previous payload.
    async fn set_item(&self, key: &str, value: StoredValue) -> PersistResult<()>;

    /// Removes the payload stored under `key`.
    async fn remove_item(&self, key: &str) -> PersistResult<()>;
}
