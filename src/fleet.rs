//! Wires the Operator and the initial fleet of airborne drones together
//! before handing control to the Commander.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::thread;

use crossbeam::channel::unbounded;
use log::info;

use crate::config::SimConfig;
use crate::drone::{Drone, DroneParams, StartMode};
use crate::error::SimError;
use crate::message::OperatorDirective;
use crate::operator::Operator;
use crate::registry::Registry;

/// Handles returned once the simulation is wired up and running: everything
/// the Commander needs to drive the fleet, plus the join handles so `main`
/// can wait for a clean shutdown.
pub struct Fleet {
    pub directive_tx: crossbeam::channel::Sender<OperatorDirective>,
    pub registry_view: crate::registry::RegistryView,
    pub running: Arc<AtomicBool>,
    pub operator_handle: thread::JoinHandle<()>,
    pub drone_handles: Vec<thread::JoinHandle<()>>,
}

/// Validate `config`, spawn the initial `target_population` Air-mode
/// drones, spawn the Operator thread, and return handles for driving and
/// joining the simulation.
pub fn launch(config: SimConfig) -> Result<Fleet, SimError> {
    config.validate()?;

    let (request_tx, request_rx) = unbounded();
    let (directive_tx, directive_rx) = unbounded();
    let registry = Registry::new();
    let running = Arc::new(AtomicBool::new(true));

    let mut operator = Operator::new(
        config.clone(),
        request_tx.clone(),
        request_rx,
        directive_rx,
        registry.clone(),
        running.clone(),
    );

    let mut drone_handles = Vec::with_capacity(config.target_population as usize);
    for id in 1..=config.target_population {
        let (grant_tx, grant_rx) = unbounded();
        let (attack_tx, attack_rx) = unbounded();

        let params = DroneParams {
            id,
            start_mode: StartMode::Air,
            config: config.clone(),
            request_tx: request_tx.clone(),
            grant_rx,
            attack_rx,
            running: running.clone(),
        };

        let handle = thread::Builder::new()
            .name(format!("drone{id}"))
            .spawn(move || Drone::new(params).run())
            .map_err(|e| SimError::ResourceUnavailable(format!("spawning drone {id}: {e}")))?;

        operator.register_drone(id, grant_tx, attack_tx);
        drone_handles.push(handle);
    }

    info!(
        "fleet launched: {} drones, hangar capacity {}",
        config.target_population, config.hangar_capacity
    );

    let registry_view = registry.view();
    let operator_handle = thread::Builder::new()
        .name("operator".into())
        .spawn(move || operator.run())
        .map_err(|e| SimError::ResourceUnavailable(format!("spawning operator: {e}")))?;

    Ok(Fleet {
        directive_tx,
        registry_view,
        running,
        operator_handle,
        drone_handles,
    })
}
