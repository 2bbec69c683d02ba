//! Drone registry: id → handle, written only by the Operator, observed
//! read-only by the Commander for targeting: the Operator holds the only
//! mutable handle, the Commander only ever sees a read-only observer view.
//!
//! Backed by a `DashMap`: entries are inserted when a drone is spawned and
//! removed on `Dead`, and the Commander's `RegistryView` can only read it.

use std::sync::Arc;

use crossbeam::channel::Sender;
use dashmap::DashMap;

use crate::message::DroneId;

/// What the Operator needs to reach a live drone directly: the sender half
/// of its dedicated kamikaze channel.
#[derive(Clone)]
pub struct DroneHandle {
    pub attack_tx: Sender<()>,
}

#[derive(Clone, Default)]
pub struct Registry {
    inner: Arc<DashMap<DroneId, DroneHandle>>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
        }
    }

    pub fn insert(&self, id: DroneId, handle: DroneHandle) {
        self.inner.insert(id, handle);
    }

    pub fn remove(&self, id: DroneId) {
        self.inner.remove(&id);
    }

    pub fn contains(&self, id: DroneId) -> bool {
        self.inner.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Read-only observer handle for the Commander: same underlying map,
    /// but only the lookup needed to forward an Attack directive is
    /// exposed.
    pub fn view(&self) -> RegistryView {
        RegistryView {
            inner: self.inner.clone(),
        }
    }
}

#[derive(Clone)]
pub struct RegistryView {
    inner: Arc<DashMap<DroneId, DroneHandle>>,
}

impl RegistryView {
    /// Forward a kamikaze directive to drone `id`. Returns `false` (and
    /// logs `OrphanedDirective`) if the drone no longer exists
    /// — a stale read must never panic.
    pub fn attack(&self, id: DroneId) -> bool {
        match self.inner.get(&id) {
            Some(handle) => handle.attack_tx.send(()).is_ok(),
            None => false,
        }
    }

    pub fn contains(&self, id: DroneId) -> bool {
        self.inner.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }
}
