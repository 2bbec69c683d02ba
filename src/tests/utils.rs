use std::thread;
use std::time::{Duration, Instant};

use super::FLEET_JOIN_TIMEOUT;
use crate::commander::Commander;
use crate::config::SimConfig;
use crate::fleet::{self, Fleet};

/// Config scaled down so whole scenarios run in a few hundred milliseconds
/// instead of real seconds.
pub fn fast_config(hangar_capacity: u32, target_population: u32) -> SimConfig {
    SimConfig {
        hangar_capacity,
        target_population,
        charge_secs: 0.02,
        crossing_secs: 0.01,
        battery_critical: 20.0,
        battery_tick_millis: 2,
        check_interval_secs: 0,
        wait_queue_capacity: 32,
        ..SimConfig::default()
    }
}

pub fn launch_test_fleet(config: SimConfig) -> (Fleet, Commander) {
    let fleet = fleet::launch(config).expect("fleet should launch with a valid config");
    let commander = Commander::new(
        fleet.directive_tx.clone(),
        fleet.registry_view.clone(),
        fleet.running.clone(),
    );
    (fleet, commander)
}

pub fn shutdown_and_join(fleet: Fleet, commander: &Commander) {
    commander.shutdown();

    let start = Instant::now();
    let mut pending: Vec<_> = fleet.drone_handles;
    pending.push(fleet.operator_handle);

    while start.elapsed() < FLEET_JOIN_TIMEOUT {
        if pending.iter().all(|h| h.is_finished()) {
            break;
        }
        thread::sleep(Duration::from_millis(5));
    }
    for handle in pending {
        handle
            .join()
            .expect("thread should exit cleanly on shutdown");
    }
}
