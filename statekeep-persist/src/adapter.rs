//! Storage adapter facade.
//!
//! Wraps the resolved storage configuration around the pluggable backend:
//! payload (de)serialization to text, expiration stamping and bookkeeping,
//! and debug traces of backend activity. The engine reads and writes
//! snapshots only through this facade.

use crate::backend::StorageBackend;
use crate::diagnostics::debug_if;
use crate::error::PersistResult;
use serde_json::Value;
use statekeep_types::{Snapshot, StoredValue};
use std::fmt;
use std::sync::Arc;

/// Key under which the expiration stamp travels inside a stored record.
const EXPIRES_AT_KEY: &str = "__statekeep_expires_at";

/// The effective storage configuration of one engine.
#[derive(Clone)]
pub struct AdapterOptions {
    /// Milliseconds after which a stored record expires.
    pub expire_in_ms: Option<u64>,
    /// Remove an expired record when it is read.
    pub remove_on_expiration: bool,
    /// Serialize payloads to text before handing them to the backend.
    pub stringify: bool,
    /// Log adapter activity.
    pub debug_mode: bool,
    /// The storage backend, if a usable one was configured.
    pub storage: Option<Arc<dyn StorageBackend>>,
}

impl fmt::Debug for AdapterOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterOptions")
            .field("expire_in_ms", &self.expire_in_ms)
            .field("remove_on_expiration", &self.remove_on_expiration)
            .field("stringify", &self.stringify)
            .field("debug_mode", &self.debug_mode)
            .field("storage", &self.storage.as_ref().map(|_| "<backend>"))
            .finish()
    }
}

/// Facade over the configured backend.
#[derive(Debug, Clone)]
pub struct StorageAdapter {
    options: AdapterOptions,
}

impl StorageAdapter {
    /// Creates an adapter from resolved options.
    #[must_use]
    pub fn new(options: AdapterOptions) -> Self {
        Self { options }
    }

    /// The resolved options this adapter runs with.
    #[must_use]
    pub fn options(&self) -> &AdapterOptions {
        &self.options
    }

    /// Whether a backend was configured.
    #[must_use]
    pub fn has_backend(&self) -> bool {
        self.options.storage.is_some()
    }

    /// Reads the record stored under `key`.
    ///
    /// Text payloads are parsed back to records. An expired record reads as
    /// absent and is removed from the backend when `remove_on_expiration` is
    /// set. Returns `None` without a backend or for non-record payloads.
    pub async fn get_item(&self, key: &str) -> PersistResult<Option<Snapshot>> {
        let Some(backend) = &self.options.storage else {
            return Ok(None);
        };

        debug_if(self.options.debug_mode, &format!("{key} - (get_item)"));

        let Some(payload) = backend.get_item(key).await? else {
            return Ok(None);
        };

        let value = match payload {
            StoredValue::Text(text) => serde_json::from_str::<Value>(&text)?,
            StoredValue::Record(value) => value,
        };
        let Value::Object(mut record) = value else {
            return Ok(None);
        };

        if let Some(expires_at) = record.get(EXPIRES_AT_KEY).and_then(Value::as_i64) {
            if chrono::Utc::now().timestamp_millis() > expires_at {
                if self.options.remove_on_expiration {
                    self.remove_item(key).await?;
                }
                return Ok(None);
            }
        }

        record.remove(EXPIRES_AT_KEY);
        Ok(Some(record))
    }

    /// Writes `snapshot` under `key`, stamping the expiration time when
    /// configured. No-op without a backend.
    pub async fn set_item(&self, key: &str, snapshot: Snapshot) -> PersistResult<()> {
        let Some(backend) = &self.options.storage else {
            return Ok(());
        };

        debug_if(self.options.debug_mode, &format!("{key} - (set_item)"));

        let mut record = snapshot;
        if let Some(expire_in_ms) = self.options.expire_in_ms {
            let expires_at = chrono::Utc::now().timestamp_millis() + expire_in_ms as i64;
            record.insert(EXPIRES_AT_KEY.to_string(), Value::from(expires_at));
        }

        let payload = if self.options.stringify {
            StoredValue::Text(serde_json::to_string(&Value::Object(record))?)
        } else {
            StoredValue::Record(Value::Object(record))
        };

        backend.set_item(key, payload).await
    }

    /// Removes the record stored under `key`. No-op without a backend.
    pub async fn remove_item(&self, key: &str) -> PersistResult<()> {
        let Some(backend) = &self.options.storage else {
            return Ok(());
        };

        debug_if(self.options.debug_mode, &format!("{key} - (remove_item)"));

        backend.remove_item(key).await
    }
}
