mod channel_arbiter;
mod commander;
mod config;
mod drone;
mod error;
mod fleet;
mod hangar;
mod message;
mod operator;
mod population;
mod registry;
mod wait_queue;

#[cfg(test)]
mod tests;

use std::env;
use std::thread;
use std::time::Duration;

use log::{error, info};

use commander::Commander;
use config::SimConfig;

fn main() {
    env_logger::init();

    let config = match env::args().nth(1) {
        Some(path) => SimConfig::from_file(&path).unwrap_or_else(|e| {
            error!("falling back to defaults: {e}");
            SimConfig::default()
        }),
        None => SimConfig::default(),
    };

    let fleet = match fleet::launch(config) {
        Ok(fleet) => fleet,
        Err(e) => {
            error!("failed to launch fleet: {e}");
            std::process::exit(1);
        }
    };

    let commander = Commander::new(fleet.directive_tx, fleet.registry_view, fleet.running);

    // A minimal stand-in for the Commander's real driving policy: run for
    // a fixed window, then shut the simulation down cleanly.
    info!("simulation running, shutting down in 30s");
    thread::sleep(Duration::from_secs(30));
    commander.shutdown();

    for handle in fleet.drone_handles {
        let _ = handle.join();
    }
    let _ = fleet.operator_handle.join();
}
