//! Shared test helpers: an in-memory storage backend and a manual-diffing
//! reactive store implementing the runtime contract.

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::Value;
use statekeep_persist::{
    PersistError, PersistResult, ReactionConfig, SnapshotFn, SnapshotSink, StateStore,
    StorageBackend, WatchHandle,
};
use statekeep_types::{FieldKind, Snapshot, StoredValue};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Installs a tracing subscriber honoring `RUST_LOG`, once per process.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// Yields long enough for spawned write tasks to complete.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(25)).await;
}

/// Decodes a stored payload into a snapshot record.
pub fn decode(value: &StoredValue) -> Snapshot {
    match value {
        StoredValue::Text(text) => match serde_json::from_str::<Value>(text).unwrap() {
            Value::Object(map) => map,
            other => panic!("expected object payload, got {other:?}"),
        },
        StoredValue::Record(Value::Object(map)) => map.clone(),
        StoredValue::Record(other) => panic!("expected object payload, got {other:?}"),
    }
}

/// In-memory storage backend counting its calls.
#[derive(Default)]
pub struct MemoryBackend {
    items: Mutex<HashMap<String, StoredValue>>,
    set_calls: AtomicUsize,
    remove_calls: AtomicUsize,
}

impl MemoryBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn put(&self, key: &str, value: StoredValue) {
        self.items.lock().unwrap().insert(key.to_string(), value);
    }

    pub fn get(&self, key: &str) -> Option<StoredValue> {
        self.items.lock().unwrap().get(key).cloned()
    }

    pub fn set_calls(&self) -> usize {
        self.set_calls.load(Ordering::SeqCst)
    }

    pub fn remove_calls(&self) -> usize {
        self.remove_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StorageBackend for MemoryBackend {
    async fn get_item(&self, key: &str) -> PersistResult<Option<StoredValue>> {
        Ok(self.items.lock().unwrap().get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: StoredValue) -> PersistResult<()> {
        self.items.lock().unwrap().insert(key.to_string(), value);
        self.set_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> PersistResult<()> {
        self.items.lock().unwrap().remove(key);
        self.remove_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Backend whose every operation fails.
pub struct FailingBackend;

#[async_trait]
impl StorageBackend for FailingBackend {
    async fn get_item(&self, _key: &str) -> PersistResult<Option<StoredValue>> {
        Err(PersistError::Backend("backend offline".to_string()))
    }

    async fn set_item(&self, _key: &str, _value: StoredValue) -> PersistResult<()> {
        Err(PersistError::Backend("backend offline".to_string()))
    }

    async fn remove_item(&self, _key: &str) -> PersistResult<()> {
        Err(PersistError::Backend("backend offline".to_string()))
    }
}

struct Watcher {
    id: u64,
    compute: SnapshotFn,
    on_change: SnapshotSink,
    last: Snapshot,
}

/// Manual-diffing reactive store: every mutation recomputes the watched
/// snapshots and fires the callbacks whose snapshot changed. Debounce is
/// not modeled; callbacks fire synchronously on change.
pub struct TestStore {
    fields: Mutex<HashMap<String, (FieldKind, Value)>>,
    watchers: Arc<Mutex<Vec<Watcher>>>,
    next_watcher: AtomicU64,
    last_watch_config: Mutex<Option<ReactionConfig>>,
}

impl TestStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            fields: Mutex::new(HashMap::new()),
            watchers: Arc::new(Mutex::new(Vec::new())),
            next_watcher: AtomicU64::new(0),
            last_watch_config: Mutex::new(None),
        })
    }

    /// Declares a field without notifying watchers.
    pub fn define(&self, key: &str, kind: FieldKind, value: Value) {
        self.fields
            .lock()
            .unwrap()
            .insert(key.to_string(), (kind, value));
    }

    /// Writes a field and notifies watchers (wrap-and-notify).
    pub fn set(&self, key: &str, value: Value) {
        {
            let mut fields = self.fields.lock().unwrap();
            if let Some(slot) = fields.get_mut(key) {
                slot.1 = value;
            }
        }
        self.notify();
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.fields
            .lock()
            .unwrap()
            .get(key)
            .map(|(_, value)| value.clone())
    }

    pub fn watcher_count(&self) -> usize {
        self.watchers.lock().unwrap().len()
    }

    pub fn last_watch_config(&self) -> Option<ReactionConfig> {
        *self.last_watch_config.lock().unwrap()
    }

    fn notify(&self) {
        let mut watchers = self.watchers.lock().unwrap();
        for watcher in watchers.iter_mut() {
            let snapshot = (watcher.compute)();
            if snapshot != watcher.last {
                watcher.last = snapshot.clone();
                (watcher.on_change)(snapshot);
            }
        }
    }
}

impl StateStore for TestStore {
    fn field_kind(&self, key: &str) -> Option<FieldKind> {
        self.fields.lock().unwrap().get(key).map(|(kind, _)| *kind)
    }

    fn read(&self, key: &str) -> Option<Value> {
        self.fields
            .lock()
            .unwrap()
            .get(key)
            .map(|(_, value)| value.clone())
    }

    fn apply(&self, changes: Vec<(String, Value)>) {
        {
            let mut fields = self.fields.lock().unwrap();
            for (key, value) in changes {
                if let Some(slot) = fields.get_mut(&key) {
                    slot.1 = value;
                }
            }
        }
        self.notify();
    }

    fn watch(
        &self,
        compute: SnapshotFn,
        on_change: SnapshotSink,
        config: &ReactionConfig,
    ) -> WatchHandle {
        *self.last_watch_config.lock().unwrap() = Some(*config);

        let snapshot = compute();
        if config.fire_immediately {
            on_change(snapshot.clone());
        }

        let id = self.next_watcher.fetch_add(1, Ordering::SeqCst);
        self.watchers.lock().unwrap().push(Watcher {
            id,
            compute,
            on_change,
            last: snapshot,
        });

        let watchers = Arc::clone(&self.watchers);
        WatchHandle::new(move || {
            watchers.lock().unwrap().retain(|watcher| watcher.id != id);
        })
    }
}
