use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam::channel::{unbounded, Receiver, Sender};

use super::super::drone::{Drone, DroneParams, StartMode};
use super::{DRONE_EXIT_POLL_INTERVAL, DRONE_EXIT_TIMEOUT};
use crate::config::SimConfig;
use crate::message::{Grant, Request};

/// A config scaled down so whole-lifecycle tests run in tens of
/// milliseconds instead of real seconds.
pub fn fast_config() -> SimConfig {
    SimConfig {
        charge_secs: 0.05,
        crossing_secs: 0.02,
        battery_critical: 20.0,
        battery_tick_millis: 2,
        ..SimConfig::default()
    }
}

pub struct DroneHarness {
    pub request_rx: Receiver<Request>,
    pub grant_tx: Sender<Grant>,
    pub attack_tx: Sender<()>,
    pub running: Arc<AtomicBool>,
    pub handle: thread::JoinHandle<()>,
}

pub fn spawn_test_drone(id: u32, start_mode: StartMode, config: SimConfig) -> DroneHarness {
    let (request_tx, request_rx) = unbounded();
    let (grant_tx, grant_rx) = unbounded();
    let (attack_tx, attack_rx) = unbounded();
    let running = Arc::new(AtomicBool::new(true));

    let params = DroneParams {
        id,
        start_mode,
        config,
        request_tx,
        grant_rx,
        attack_rx,
        running: running.clone(),
    };

    let handle = thread::Builder::new()
        .name(format!("drone{id}"))
        .spawn(move || {
            Drone::new(params).run();
        })
        .expect("failed to spawn drone thread");

    DroneHarness {
        request_rx,
        grant_tx,
        attack_tx,
        running,
        handle,
    }
}

pub fn terminate_drone(harness: DroneHarness) {
    harness.running.store(false, Ordering::Relaxed);
    assert_drone_exits(harness.handle);
}

pub fn assert_drone_exits(handle: thread::JoinHandle<()>) {
    let start = Instant::now();
    while start.elapsed() < DRONE_EXIT_TIMEOUT {
        if handle.is_finished() {
            handle.join().expect("drone thread panicked");
            return;
        }
        thread::sleep(DRONE_EXIT_POLL_INTERVAL);
    }
    panic!("drone did not exit in time");
}
