//! The Commander's public surface: rescaling directives and targeted
//! kamikaze attacks. Holds only a directive sender and a read-only
//! `RegistryView`, never the mutable `Registry` the Operator owns.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossbeam::channel::Sender;
use log::{info, warn};

use crate::message::{DroneId, OperatorDirective};
use crate::registry::RegistryView;

pub struct Commander {
    directive_tx: Sender<OperatorDirective>,
    registry: RegistryView,
    running: Arc<AtomicBool>,
}

impl Commander {
    pub fn new(
        directive_tx: Sender<OperatorDirective>,
        registry: RegistryView,
        running: Arc<AtomicBool>,
    ) -> Self {
        Self {
            directive_tx,
            registry,
            running,
        }
    }

    /// One-shot: doubles the target fleet size and the hangar capacity
    /// that backs it. A second call is a no-op at the Operator (the
    /// Grow latch only fires once).
    pub fn grow(&self) {
        info!("Commander issuing Grow");
        let _ = self.directive_tx.send(OperatorDirective::Grow);
    }

    /// Halves the target fleet size (floored at 1); the hangar shrinks
    /// immediately where it can, deferring the rest until occupants
    /// depart.
    pub fn shrink(&self) {
        info!("Commander issuing Shrink");
        let _ = self.directive_tx.send(OperatorDirective::Shrink);
    }

    /// Targets drone `id` directly, bypassing the Operator entirely. Logs
    /// `OrphanedDirective` rather than panicking if the drone has already
    /// died.
    pub fn attack(&self, id: DroneId) {
        if !self.registry.attack(id) {
            warn!("OrphanedDirective: attack targeted drone {id} which no longer exists");
        }
    }

    /// Flips the shared shutdown flag every thread observes at its
    /// suspension points.
    pub fn shutdown(&self) {
        info!("Commander issuing shutdown");
        self.running.store(false, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{DroneHandle, Registry};
    use crossbeam::channel::unbounded;

    #[test]
    fn attack_on_missing_drone_logs_and_does_not_panic() {
        let (tx, _rx) = unbounded();
        let registry = Registry::new();
        let commander = Commander::new(tx, registry.view(), Arc::new(AtomicBool::new(true)));
        commander.attack(99);
    }

    #[test]
    fn attack_forwards_to_registered_drone() {
        let (tx, _rx) = unbounded();
        let registry = Registry::new();
        let (attack_tx, attack_rx) = unbounded();
        registry.insert(1, DroneHandle { attack_tx });
        let commander = Commander::new(tx, registry.view(), Arc::new(AtomicBool::new(true)));
        commander.attack(1);
        assert!(attack_rx.try_recv().is_ok());
    }

    #[test]
    fn grow_and_shrink_forward_directives() {
        let (tx, rx) = unbounded();
        let registry = Registry::new();
        let commander = Commander::new(tx, registry.view(), Arc::new(AtomicBool::new(true)));
        commander.grow();
        commander.shrink();
        assert_eq!(rx.try_recv().unwrap(), OperatorDirective::Grow);
        assert_eq!(rx.try_recv().unwrap(), OperatorDirective::Shrink);
    }

    #[test]
    fn shutdown_flips_running_flag() {
        let (tx, _rx) = unbounded();
        let registry = Registry::new();
        let running = Arc::new(AtomicBool::new(true));
        let commander = Commander::new(tx, registry.view(), running.clone());
        commander.shutdown();
        assert!(!running.load(Ordering::Relaxed));
    }
}
