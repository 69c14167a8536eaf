//! Process-wide instance registry.
//!
//! Maps each engine's opaque [`StoreId`] to a weak engine reference so
//! teardown can deregister it. The registry never keeps an engine (or the
//! store behind it) alive.

use crate::engine::PersistEngine;
use statekeep_types::StoreId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock, Weak};

static REGISTRY: OnceLock<Mutex<HashMap<StoreId, Weak<PersistEngine>>>> = OnceLock::new();

fn registry() -> &'static Mutex<HashMap<StoreId, Weak<PersistEngine>>> {
    REGISTRY.get_or_init(|| Mutex::new(HashMap::new()))
}

pub(crate) fn register(id: StoreId, engine: &Arc<PersistEngine>) {
    let mut entries = registry().lock().unwrap();
    entries.retain(|_, entry| entry.strong_count() > 0);
    entries.insert(id, Arc::downgrade(engine));
}

pub(crate) fn deregister(id: StoreId) {
    registry().lock().unwrap().remove(&id);
}

/// Looks up the engine registered for `id`, if it is still alive.
#[must_use]
pub fn lookup(id: StoreId) -> Option<Arc<PersistEngine>> {
    registry().lock().unwrap().get(&id).and_then(Weak::upgrade)
}
