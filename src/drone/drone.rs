use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam::channel::{select_biased, Receiver, Sender, TryRecvError};
use log::info;
use rand::Rng;

use crate::config::SimConfig;
use crate::message::{ChannelId, DroneId, Grant, Request, RequestKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Outside,
    Inside,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartMode {
    // born in open air with a randomized battery level
    Air,
    // replenished straight into the hangar at full charge
    Base,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Flying,
    RequestingLand,
    CrossingIn,
    Charging,
    RequestingTakeoff,
    CrossingOut,
    Dying,
}

pub struct DroneParams {
    pub id: DroneId,
    pub start_mode: StartMode,
    pub config: SimConfig,
    pub request_tx: Sender<Request>,
    pub grant_rx: Receiver<Grant>,
    pub attack_rx: Receiver<()>,
    pub running: Arc<AtomicBool>,
}

pub struct Drone {
    id: DroneId,
    battery: f64,
    t1: Duration,
    drain_rate_per_sec: f64,
    battery_critical: f64,
    crossing_time: Duration,
    max_cycles: u32,
    battery_tick: Duration,
    cycles_flown: u32,
    location: Location,
    kamikaze_pending: bool,
    state: State,
    pending_channel: Option<ChannelId>,
    request_tx: Sender<Request>,
    grant_rx: Receiver<Grant>,
    attack_rx: Receiver<()>,
    running: Arc<AtomicBool>,
}

impl Drone {
    pub fn new(params: DroneParams) -> Self {
        let cfg = &params.config;
        let (battery, location, state) = match params.start_mode {
            StartMode::Air => {
                let battery = rand::thread_rng().gen_range(50.0..=100.0);
                (battery, Location::Outside, State::Flying)
            }
            StartMode::Base => (100.0, Location::Inside, State::RequestingTakeoff),
        };

        Self {
            id: params.id,
            battery,
            t1: cfg.charge_time(),
            drain_rate_per_sec: cfg.drain_rate_per_sec(),
            battery_critical: cfg.battery_critical,
            crossing_time: cfg.crossing_time(),
            max_cycles: cfg.max_cycles,
            battery_tick: cfg.battery_tick(),
            cycles_flown: 0,
            location,
            kamikaze_pending: false,
            state,
            pending_channel: None,
            request_tx: params.request_tx,
            grant_rx: params.grant_rx,
            attack_rx: params.attack_rx,
            running: params.running,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> State {
        self.state
    }

    #[cfg(test)]
    pub fn battery(&self) -> f64 {
        self.battery
    }

    pub fn run(mut self) {
        info!(
            "drone {} starting in state {:?} (battery {:.1}%)",
            self.id, self.state, self.battery
        );
        loop {
            if matches!(self.state, State::Dying) {
                self.die();
                return;
            }
            if !self.running.load(Ordering::Relaxed) {
                info!("drone {} observed shutdown, exiting without RIP", self.id);
                return;
            }
            self.state = self.step();
        }
    }

    fn step(&mut self) -> State {
        match self.state {
            State::Flying => self.do_flying(),
            State::RequestingLand => self.do_requesting_land(),
            State::CrossingIn => self.do_crossing_in(),
            State::Charging => self.do_charging(),
            State::RequestingTakeoff => self.do_requesting_takeoff(),
            State::CrossingOut => self.do_crossing_out(),
            State::Dying => State::Dying,
        }
    }

    fn do_flying(&mut self) -> State {
        loop {
            if !self.running.load(Ordering::Relaxed) {
                return State::Dying;
            }
            if self.poll_attack() {
                if let Some(next) = self.apply_attack() {
                    return next;
                }
            }
            std::thread::sleep(self.battery_tick);
            self.drain_battery();
            if self.battery <= 0.0 {
                return State::Dying;
            }
            if self.battery <= self.battery_critical {
                return State::RequestingLand;
            }
        }
    }

    fn do_requesting_land(&mut self) -> State {
        info!(
            "drone {} requesting LAND (battery {:.1}%)",
            self.id, self.battery
        );
        if self
            .request_tx
            .send(Request::new(RequestKind::ReqLand, self.id))
            .is_err()
        {
            return State::Dying;
        }
        loop {
            if !self.running.load(Ordering::Relaxed) {
                return State::Dying;
            }
            if self.poll_attack() {
                if let Some(next) = self.apply_attack() {
                    return next;
                }
            }
            match self.grant_rx.try_recv() {
                Ok(grant) => {
                    self.pending_channel = Some(grant.channel_id);
                    return State::CrossingIn;
                }
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => return State::Dying,
            }
            std::thread::sleep(self.battery_tick);
            self.drain_battery();
            if self.battery <= 0.0 {
                info!("drone {} died waiting for landing", self.id);
                return State::Dying;
            }
        }
    }

    fn do_crossing_in(&mut self) -> State {
        let channel = self
            .pending_channel
            .take()
            .expect("channel granted for landing");
        info!("drone {} crossing channel {} IN", self.id, channel);
        self.sleep_interruptible(self.crossing_time);
        self.location = Location::Inside;
        let _ = self
            .request_tx
            .send(Request::new(RequestKind::Landed, self.id));
        State::Charging
    }

    fn do_charging(&mut self) -> State {
        info!("drone {} charging", self.id);
        let start = Instant::now();
        let start_battery = self.battery;
        loop {
            if !self.running.load(Ordering::Relaxed) {
                return State::Dying;
            }
            if self.kamikaze_pending {
                info!("drone {} aborting charge, kamikaze pending", self.id);
                break;
            }
            let elapsed = start.elapsed();
            if elapsed >= self.t1 {
                self.battery = 100.0;
                break;
            }
            select_biased! {
                recv(self.attack_rx) -> msg => {
                    if msg.is_ok() {
                        if let Some(next) = self.apply_attack() {
                            return next;
                        }
                    }
                }
                default(self.battery_tick) => {
                    let frac = elapsed.as_secs_f64() / self.t1.as_secs_f64();
                    self.battery = start_battery + (100.0 - start_battery) * frac;
                }
            }
        }
        State::RequestingTakeoff
    }

    fn do_requesting_takeoff(&mut self) -> State {
        info!("drone {} charged, requesting TAKEOFF", self.id);
        if self
            .request_tx
            .send(Request::new(RequestKind::ReqTakeoff, self.id))
            .is_err()
        {
            return State::Dying;
        }
        loop {
            if !self.running.load(Ordering::Relaxed) {
                return State::Dying;
            }
            select_biased! {
                recv(self.attack_rx) -> msg => {
                    if msg.is_ok() {
                        if let Some(next) = self.apply_attack() {
                            return next;
                        }
                    }
                }
                recv(self.grant_rx) -> grant => {
                    match grant {
                        Ok(g) => {
                            self.pending_channel = Some(g.channel_id);
                            return State::CrossingOut;
                        }
                        Err(_) => return State::Dying,
                    }
                }
            }
        }
    }

    fn do_crossing_out(&mut self) -> State {
        let channel = self
            .pending_channel
            .take()
            .expect("channel granted for takeoff");
        info!("drone {} crossing channel {} OUT", self.id, channel);
        self.sleep_interruptible(self.crossing_time);
        let _ = self
            .request_tx
            .send(Request::new(RequestKind::Departed, self.id));
        self.location = Location::Outside;

        if self.kamikaze_pending {
            State::Dying
        } else {
            self.cycles_flown += 1;
            if self.cycles_flown >= self.max_cycles {
                info!("drone {} reached wear limit", self.id);
                State::Dying
            } else {
                State::Flying
            }
        }
    }

    fn die(&mut self) {
        let _ = self
            .request_tx
            .send(Request::new(RequestKind::Dead, self.id));
        info!("drone {} RIP", self.id);
    }

    fn poll_attack(&mut self) -> bool {
        matches!(self.attack_rx.try_recv(), Ok(()))
    }

    // latched if Inside so the drone completes its exit before dying,
    // never orphaning a hangar slot or a channel
    fn apply_attack(&mut self) -> Option<State> {
        if self.battery < self.battery_critical {
            info!(
                "drone {} ignoring attack, battery below critical ({:.1}%)",
                self.id, self.battery
            );
            return None;
        }
        match self.location {
            Location::Outside => {
                info!("drone {} honoring attack immediately (outside)", self.id);
                Some(State::Dying)
            }
            Location::Inside => {
                info!("drone {} latching kamikaze, will depart first", self.id);
                self.kamikaze_pending = true;
                None
            }
        }
    }

    fn drain_battery(&mut self) {
        self.battery -= self.drain_rate_per_sec * self.battery_tick.as_secs_f64();
        if self.battery < 0.0 {
            self.battery = 0.0;
        }
    }

    fn sleep_interruptible(&self, dur: Duration) {
        let mut remaining = dur;
        while remaining > Duration::ZERO {
            if !self.running.load(Ordering::Relaxed) {
                return;
            }
            let step = remaining.min(self.battery_tick);
            std::thread::sleep(step);
            remaining -= step;
        }
    }
}
