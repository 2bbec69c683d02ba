//! The scheduler and resource owner: channel arbiter, hangar
//! accounting, wait queues, population controller and drone registry are
//! all mutated only from this single event loop.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam::channel::{select_biased, tick, Receiver, Sender};
use log::{info, warn};

use crate::channel_arbiter::{ChannelArbiter, Direction};
use crate::config::SimConfig;
use crate::drone::{Drone, DroneParams, StartMode};
use crate::hangar::Hangar;
use crate::message::{ChannelId, DroneId, Grant, OperatorDirective, Request, RequestKind};
use crate::population::{allocate_lowest_free_id, Population};
use crate::registry::{DroneHandle, Registry};
use crate::wait_queue::{WaitKind, WaitQueues};

pub struct Operator {
    config: SimConfig,
    hangar: Hangar,
    arbiter: ChannelArbiter,
    queues: WaitQueues,
    population: Population,
    registry: Registry,
    grant_txs: HashMap<DroneId, Sender<Grant>>,
    request_tx: Sender<Request>,
    request_rx: Receiver<Request>,
    directive_rx: Receiver<OperatorDirective>,
    running: Arc<AtomicBool>,
    spawned_handles: Vec<thread::JoinHandle<()>>,
}

impl Operator {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: SimConfig,
        request_tx: Sender<Request>,
        request_rx: Receiver<Request>,
        directive_rx: Receiver<OperatorDirective>,
        registry: Registry,
        running: Arc<AtomicBool>,
    ) -> Self {
        let population = Population::new(config.target_population);
        let hangar = Hangar::new(config.hangar_capacity);
        let queues = WaitQueues::new(config.wait_queue_capacity);
        Self {
            config,
            hangar,
            arbiter: ChannelArbiter::new(),
            queues,
            population,
            registry,
            grant_txs: HashMap::new(),
            request_tx,
            request_rx,
            directive_rx,
            running,
            spawned_handles: Vec::new(),
        }
    }

    /// Register a drone's addressed grant sender and attack handle. Used
    /// both by the fleet launcher for the initial Air-mode fleet and
    /// internally by `replenish`. `current_active` is seeded from
    /// `target_population` at construction, so this does not touch it —
    /// `replenish` bumps it separately via `Population::on_spawn`.
    pub fn register_drone(&mut self, id: DroneId, grant_tx: Sender<Grant>, attack_tx: Sender<()>) {
        self.grant_txs.insert(id, grant_tx);
        self.registry.insert(id, DroneHandle { attack_tx });
    }

    pub fn run(mut self) {
        let ticker = tick(self.config.check_interval());
        loop {
            if !self.running.load(Ordering::Relaxed) {
                break;
            }
            select_biased! {
                recv(self.directive_rx) -> directive => {
                    if let Ok(directive) = directive {
                        self.apply_directive(directive);
                    }
                }
                recv(self.request_rx) -> msg => {
                    match msg {
                        Ok(req) => self.dispatch(req),
                        Err(_) => break,
                    }
                }
                recv(ticker) -> _ => {
                    self.watchdog();
                    self.replenish();
                }
                default(Duration::from_millis(50)) => {}
            }
        }
        info!("operator shutting down, joining {} replenished drones", self.spawned_handles.len());
        for handle in self.spawned_handles.drain(..) {
            let _ = handle.join();
        }
    }

    pub(crate) fn dispatch(&mut self, req: Request) {
        match req.kind {
            RequestKind::ReqLand => self.handle_req_land(req.drone_id),
            RequestKind::ReqTakeoff => self.handle_req_takeoff(req.drone_id),
            RequestKind::Landed => self.handle_landed(req.drone_id),
            RequestKind::Departed => self.handle_departed(req.drone_id),
            RequestKind::Dead => self.handle_dead(req.drone_id),
        }
    }

    pub(crate) fn handle_req_land(&mut self, id: DroneId) {
        if self.population.is_overshooting() {
            self.queues.enqueue(WaitKind::Landing, id);
            info!("BLOCKED landing for drone {id}: shrink overshoot, accelerating attrition");
            return;
        }
        if self.hangar.free_slots() > 0 {
            if let Some(ch) = self.arbiter.pick(Direction::In) {
                if self.hangar.try_reserve() {
                    self.arbiter.begin(ch, Direction::In);
                    if self.send_grant(id, ch) {
                        info!("GRANT LAND drone {id} via channel {ch}");
                        return;
                    }
                    // grant-send + reservation is a transaction; roll both
                    // back rather than leaving the channel booked with no
                    // consumer.
                    self.arbiter.end(ch);
                    self.hangar.release_bypass();
                }
            }
        }
        self.queues.enqueue(WaitKind::Landing, id);
        info!("BLOCKED landing request for drone {id}, queued");
    }

    pub(crate) fn handle_req_takeoff(&mut self, id: DroneId) {
        if let Some(ch) = self.arbiter.pick(Direction::Out) {
            self.arbiter.begin(ch, Direction::Out);
            if self.send_grant(id, ch) {
                info!("GRANT TAKEOFF drone {id} via channel {ch}");
                return;
            }
            self.arbiter.end(ch);
        }
        self.queues.enqueue(WaitKind::Takeoff, id);
    }

    pub(crate) fn handle_landed(&mut self, id: DroneId) {
        match self.arbiter.find_active(Direction::In) {
            Some(ch) => {
                self.arbiter.end(ch);
                info!("drone {id} entered base, channel {ch} released");
            }
            None => warn!(
                "LogicInvariantViolation: Landed from drone {id} but no channel has direction In"
            ),
        }
        self.process_queues();
    }

    pub(crate) fn handle_departed(&mut self, id: DroneId) {
        match self.arbiter.find_active(Direction::Out) {
            Some(ch) => {
                self.arbiter.end(ch);
                info!("drone {id} left the base, channel {ch} released");
            }
            None => warn!(
                "LogicInvariantViolation: Departed from drone {id} but no channel has direction Out"
            ),
        }
        self.hangar.release();
        self.process_queues();
    }

    pub(crate) fn handle_dead(&mut self, id: DroneId) {
        info!("RIP drone {id}");
        self.queues.invalidate(id);
        self.population.on_dead();
        self.registry.remove(id);
        self.grant_txs.remove(&id);
        info!(
            "active drones: {}/{}",
            self.population.current_active(),
            self.population.target_n()
        );
    }

    /// Run after any channel or hangar slot may have freed up: takeoffs
    /// are always served before landings because they are the ones that
    /// free hangar slots, which is what keeps the system live.
    pub(crate) fn process_queues(&mut self) {
        if let Some(ch) = self.arbiter.pick(Direction::Out) {
            if let Some(id) = self.queues.dequeue(WaitKind::Takeoff) {
                self.arbiter.begin(ch, Direction::Out);
                if self.send_grant(id, ch) {
                    info!("GRANT TAKEOFF drone {id} via channel {ch} (queued)");
                } else {
                    self.arbiter.end(ch);
                }
            }
        }
        if self.population.current_active() <= self.population.target_n() && self.hangar.free_slots() > 0 {
            if let Some(ch) = self.arbiter.pick(Direction::In) {
                if let Some(id) = self.queues.dequeue(WaitKind::Landing) {
                    if self.hangar.try_reserve() {
                        self.arbiter.begin(ch, Direction::In);
                        if self.send_grant(id, ch) {
                            info!("GRANT LAND drone {id} via channel {ch} (queued)");
                        } else {
                            self.arbiter.end(ch);
                            self.hangar.release_bypass();
                        }
                    } else {
                        self.queues.enqueue(WaitKind::Landing, id);
                    }
                }
            }
        }
    }

    pub(crate) fn apply_directive(&mut self, directive: OperatorDirective) {
        match directive {
            OperatorDirective::Grow => match self.population.apply_grow(self.hangar.capacity()) {
                Some(added) => {
                    self.hangar.grow(added);
                    info!(
                        "Grow applied: target_n={}, hangar capacity={}",
                        self.population.target_n(),
                        self.hangar.capacity()
                    );
                }
                None => info!("Grow rejected: latch already used, or would exceed MAX_ID"),
            },
            OperatorDirective::Shrink => {
                let capacity = self.hangar.capacity();
                if capacity > 1 {
                    let remove_cnt = capacity / 2;
                    self.hangar.request_shrink(remove_cnt);
                    self.population.apply_shrink();
                    info!(
                        "Shrink applied: capacity {} -> {}, target_n={}",
                        capacity,
                        self.hangar.capacity(),
                        self.population.target_n()
                    );
                } else {
                    info!("Shrink rejected: capacity already at floor");
                }
            }
        }
    }

    pub(crate) fn watchdog(&mut self) {
        if self.population.current_active() == 0
            && self.hangar.free_slots() < self.hangar.capacity()
            && self.hangar.pending_removal() == 0
        {
            warn!("watchdog: zero active drones but hangar not fully free, resetting");
            self.hangar.reset_free(self.hangar.capacity());
        }
    }

    pub(crate) fn replenish(&mut self) {
        if !self.population.needs_replenish() {
            return;
        }
        let free = self.hangar.free_slots();
        if free == 0 {
            info!(
                "REPLENISH deferred: population {}/{}, hangar full",
                self.population.current_active(),
                self.population.target_n()
            );
            return;
        }
        let to_spawn = self.population.shortfall().min(free);
        for _ in 0..to_spawn {
            self.spawn_replenished_drone();
        }
    }

    fn spawn_replenished_drone(&mut self) {
        let id = match allocate_lowest_free_id(|id| self.registry.contains(id)) {
            Some(id) => id,
            None => {
                warn!("ResourceUnavailable: no free drone id to replenish");
                return;
            }
        };
        if !self.hangar.try_reserve() {
            return;
        }

        let (grant_tx, grant_rx) = crossbeam::channel::unbounded();
        let (attack_tx, attack_rx) = crossbeam::channel::unbounded();

        let params = DroneParams {
            id,
            start_mode: StartMode::Base,
            config: self.config.clone(),
            request_tx: self.request_tx.clone(),
            grant_rx,
            attack_rx,
            running: self.running.clone(),
        };

        match thread::Builder::new()
            .name(format!("drone{id}"))
            .spawn(move || Drone::new(params).run())
        {
            Ok(handle) => {
                self.register_drone(id, grant_tx, attack_tx);
                self.population.on_spawn();
                self.spawned_handles.push(handle);
                info!("REPLENISH spawned drone {id}");
            }
            Err(e) => {
                self.hangar.release_bypass();
                warn!("ResourceUnavailable: failed to spawn replenished drone {id}: {e}");
            }
        }
    }

    fn send_grant(&self, id: DroneId, channel_id: ChannelId) -> bool {
        match self.grant_txs.get(&id) {
            Some(tx) => tx.send(Grant { channel_id }).is_ok(),
            None => false,
        }
    }

    #[cfg(test)]
    pub(crate) fn test_state(&self) -> OperatorTestState<'_> {
        OperatorTestState { op: self }
    }
}

#[cfg(test)]
pub(crate) struct OperatorTestState<'a> {
    op: &'a Operator,
}

#[cfg(test)]
impl<'a> OperatorTestState<'a> {
    pub fn free_slots(&self) -> u32 {
        self.op.hangar.free_slots()
    }
    pub fn capacity(&self) -> u32 {
        self.op.hangar.capacity()
    }
    pub fn pending_removal(&self) -> u32 {
        self.op.hangar.pending_removal()
    }
    pub fn current_active(&self) -> u32 {
        self.op.population.current_active()
    }
    pub fn target_n(&self) -> u32 {
        self.op.population.target_n()
    }
}
