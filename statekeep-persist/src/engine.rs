//! Persistence engine — the hydrate-then-watch lifecycle.
//!
//! One engine per persisted store. The engine resolves its configuration at
//! construction, hydrates saved values into the store on `init`, then
//! watches a derived snapshot of the tracked fields and writes it through
//! the adapter on every change. Execution is cooperative: the only
//! suspension points are the awaits around adapter calls.

use crate::adapter::{AdapterOptions, StorageAdapter};
use crate::config::{
    resolve_reaction, resolve_storage, GlobalConfig, PersistOptions, ReactionConfig,
    ReactionOptions,
};
use crate::diagnostics::{
    debug_if, warn_action_persist_if, warn_computed_persist_if, warn_invalid_storage_adaptor_if,
};
use crate::error::PersistResult;
use crate::property::PropertyDescriptor;
use crate::registry;
use crate::runtime::{SnapshotFn, SnapshotSink, StateStore, WatchHandle};
use crate::transform;
use statekeep_types::{FieldKind, Snapshot, StoreId};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use tracing::warn;

/// Keeps a designated subset of a reactive store's fields synchronized with
/// a storage backend.
pub struct PersistEngine {
    store_id: StoreId,
    storage_name: String,
    debug_mode: bool,
    properties: RwLock<Vec<PropertyDescriptor>>,
    reaction_config: RwLock<ReactionConfig>,
    adapter: RwLock<Option<StorageAdapter>>,
    target: RwLock<Option<Arc<dyn StateStore>>>,
    watch: Mutex<Option<WatchHandle>>,
    is_hydrated: AtomicBool,
    is_persisting: AtomicBool,
}

impl PersistEngine {
    /// Creates an engine bound to `target`, resolving configuration against
    /// the built-in defaults only.
    pub fn new(
        target: Arc<dyn StateStore>,
        options: PersistOptions,
        reaction: ReactionOptions,
    ) -> Arc<Self> {
        Self::with_defaults(target, options, reaction, &GlobalConfig::default())
    }

    /// Creates an engine bound to `target` with an explicit process-wide
    /// default tier.
    ///
    /// Precedence, lowest to highest: built-in default, `defaults`,
    /// per-engine option. A missing storage backend is reported with a
    /// diagnostic warning; construction still succeeds and later storage
    /// operations become no-ops against the unusable backend.
    pub fn with_defaults(
        target: Arc<dyn StateStore>,
        options: PersistOptions,
        reaction: ReactionOptions,
        defaults: &GlobalConfig,
    ) -> Arc<Self> {
        let reaction_config = resolve_reaction(reaction, defaults);
        let adapter_options = resolve_storage(&options, defaults);
        let debug_mode = adapter_options.debug_mode;

        warn_invalid_storage_adaptor_if(adapter_options.storage.is_none(), &options.name);

        let adapter = StorageAdapter::new(adapter_options);
        debug_if(
            debug_mode,
            &format!(
                "{} - (new) properties: {:?}, adapter: {:?}, reaction: {:?}",
                options.name,
                options.properties,
                adapter.options(),
                reaction_config
            ),
        );

        let engine = Arc::new(Self {
            store_id: StoreId::new(),
            storage_name: options.name,
            debug_mode,
            properties: RwLock::new(options.properties),
            reaction_config: RwLock::new(reaction_config),
            adapter: RwLock::new(Some(adapter)),
            target: RwLock::new(Some(target)),
            watch: Mutex::new(None),
            is_hydrated: AtomicBool::new(false),
            is_persisting: AtomicBool::new(false),
        });

        registry::register(engine.store_id, &engine);

        engine
    }

    /// The opaque identifier assigned to this engine at construction.
    #[must_use]
    pub fn store_id(&self) -> StoreId {
        self.store_id
    }

    /// The unique name the persisted record is stored under.
    #[must_use]
    pub fn storage_name(&self) -> &str {
        &self.storage_name
    }

    /// False during an in-progress hydration, true once the last hydration
    /// cycle completed.
    #[must_use]
    pub fn is_hydrated(&self) -> bool {
        self.is_hydrated.load(Ordering::SeqCst)
    }

    /// True iff an active watch handle exists.
    #[must_use]
    pub fn is_persisting(&self) -> bool {
        self.is_persisting.load(Ordering::SeqCst)
    }

    /// The effective storage configuration, or `None` after teardown.
    #[must_use]
    pub fn effective_storage_config(&self) -> Option<AdapterOptions> {
        self.adapter
            .read()
            .unwrap()
            .as_ref()
            .map(|adapter| adapter.options().clone())
    }

    /// The resolved watch scheduling configuration.
    #[must_use]
    pub fn reaction_config(&self) -> ReactionConfig {
        *self.reaction_config.read().unwrap()
    }

    /// Hydrates the store, then starts persisting. Returns the engine.
    ///
    /// Meant to be called once per cold start; calling it again is safe and
    /// re-hydrates, then restarts the watch.
    pub async fn init(self: Arc<Self>) -> PersistResult<Arc<Self>> {
        self.hydrate_store().await?;

        self.start_persisting();

        Ok(self)
    }

    /// Loads the stored snapshot into the target store.
    ///
    /// An active watch is paused for the duration of the read-then-apply
    /// sequence and restored afterwards, so no write can observe the store
    /// mid-hydration. A watch paused by the caller beforehand stays paused.
    /// Overlapping calls to this method produce independent read-then-apply
    /// sequences whose relative completion order is undefined; serializing
    /// them is the caller's responsibility.
    pub async fn hydrate_store(&self) -> PersistResult<()> {
        // If the caller stopped persisting and then re-hydrates, the watch
        // must not come back on its own.
        let was_watching = self.watch.lock().unwrap().is_some();

        if self.is_persisting() {
            self.pause_persisting();
        }

        self.is_hydrated.store(false, Ordering::SeqCst);
        debug_if(
            self.debug_mode,
            &format!("{} - (hydrate_store) is_hydrated: false", self.storage_name),
        );

        let adapter = self.adapter.read().unwrap().clone();
        let target = self.target.read().unwrap().clone();

        if let (Some(adapter), Some(target)) = (adapter, target) {
            if let Some(data) = adapter.get_item(&self.storage_name).await? {
                let properties = self.properties.read().unwrap().clone();
                let mut changes = Vec::new();

                for property in &properties {
                    let key = property.key();

                    // Hydrate only fields the target owns and the snapshot
                    // defines; anything else is skipped without a warning.
                    let Some(kind) = target.field_kind(key) else {
                        continue;
                    };
                    let Some(stored) = data.get(key) else {
                        continue;
                    };

                    changes.push((
                        key.to_string(),
                        transform::from_storable(stored.clone(), kind, property),
                    ));
                }

                target.apply(changes);
            }
        }

        self.is_hydrated.store(true, Ordering::SeqCst);
        debug_if(
            self.debug_mode,
            &format!("{} - is_hydrated: true", self.storage_name),
        );

        if was_watching {
            self.start_persisting();
        }

        Ok(())
    }

    /// Establishes the persistence watch over all tracked properties.
    ///
    /// No-op if the engine was torn down or a watch is already active.
    /// Derived and behavior members are excluded from the snapshot with a
    /// diagnostic warning naming the property.
    pub fn start_persisting(&self) {
        let adapter = self.adapter.read().unwrap().clone();
        let target = self.target.read().unwrap().clone();
        let (Some(adapter), Some(target)) = (adapter, target) else {
            return;
        };

        let mut watch = self.watch.lock().unwrap();
        if watch.is_some() {
            return;
        }

        let properties = self.properties.read().unwrap().clone();
        let reaction_config = *self.reaction_config.read().unwrap();

        let compute_target = Arc::clone(&target);
        let compute: SnapshotFn = Box::new(move || compute_snapshot(&compute_target, &properties));

        let storage_name = self.storage_name.clone();
        let on_change: SnapshotSink = Box::new(move |snapshot| {
            let adapter = adapter.clone();
            let name = storage_name.clone();
            tokio::spawn(async move {
                if let Err(e) = adapter.set_item(&name, snapshot).await {
                    warn!("{name} - failed to write snapshot: {e}");
                }
            });
        });

        *watch = Some(target.watch(compute, on_change, &reaction_config));
        drop(watch);

        self.is_persisting.store(true, Ordering::SeqCst);
        debug_if(
            self.debug_mode,
            &format!("{} - (start_persisting) is_persisting: true", self.storage_name),
        );
    }

    /// Cancels the active watch, if any. Non-destructive: configuration and
    /// properties remain, and `start_persisting` resumes. A write already in
    /// flight is not aborted; no new writes are scheduled afterwards.
    pub fn pause_persisting(&self) {
        self.is_persisting.store(false, Ordering::SeqCst);
        debug_if(
            self.debug_mode,
            &format!("{} - (pause_persisting) is_persisting: false", self.storage_name),
        );

        if let Some(handle) = self.watch.lock().unwrap().take() {
            handle.cancel();
        }
    }

    /// Pauses, deregisters the engine and releases all engine state.
    /// Terminal: the engine cannot be restarted afterwards.
    pub fn stop_persisting(&self) {
        self.pause_persisting();

        debug_if(
            self.debug_mode,
            &format!("{} - (stop_persisting)", self.storage_name),
        );

        registry::deregister(self.store_id);

        self.properties.write().unwrap().clear();
        *self.reaction_config.write().unwrap() = ReactionConfig::default();
        *self.adapter.write().unwrap() = None;
        *self.target.write().unwrap() = None;
    }

    /// Removes the stored record. No-op without an adapter.
    pub async fn clear_persisted_store(&self) -> PersistResult<()> {
        let adapter = self.adapter.read().unwrap().clone();

        if let Some(adapter) = adapter {
            debug_if(
                self.debug_mode,
                &format!("{} - (clear_persisted_store)", self.storage_name),
            );

            adapter.remove_item(&self.storage_name).await?;
        }

        Ok(())
    }

    /// Returns the raw stored snapshot without mutating engine or target
    /// state. `None` without an adapter or stored record.
    pub async fn get_persisted_store(&self) -> PersistResult<Option<Snapshot>> {
        let adapter = self.adapter.read().unwrap().clone();

        match adapter {
            Some(adapter) => {
                debug_if(
                    self.debug_mode,
                    &format!("{} - (get_persisted_store)", self.storage_name),
                );

                adapter.get_item(&self.storage_name).await
            }
            None => Ok(None),
        }
    }
}

/// Assembles the storable snapshot of all tracked, persistable properties.
fn compute_snapshot(target: &Arc<dyn StateStore>, properties: &[PropertyDescriptor]) -> Snapshot {
    let mut snapshot = Snapshot::new();

    for property in properties {
        let key = property.key();
        let kind = target.field_kind(key).unwrap_or(FieldKind::Value);

        warn_computed_persist_if(kind == FieldKind::Computed, key);
        warn_action_persist_if(kind == FieldKind::Action, key);
        if !kind.is_persistable() {
            continue;
        }

        let Some(value) = target.read(key) else {
            continue;
        };

        snapshot.insert(key.to_string(), transform::to_storable(value, kind, property));
    }

    snapshot
}

/// Constructs an engine and runs its full `init` cycle.
pub async fn make_persistable(
    target: Arc<dyn StateStore>,
    options: PersistOptions,
    reaction: ReactionOptions,
) -> PersistResult<Arc<PersistEngine>> {
    PersistEngine::new(target, options, reaction).init().await
}

/// Same as [`make_persistable`] with an explicit process-wide default tier.
pub async fn make_persistable_with(
    target: Arc<dyn StateStore>,
    options: PersistOptions,
    reaction: ReactionOptions,
    defaults: &GlobalConfig,
) -> PersistResult<Arc<PersistEngine>> {
    PersistEngine::with_defaults(target, options, reaction, defaults)
        .init()
        .await
}
