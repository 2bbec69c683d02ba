//! Tunable simulation constants: a TOML file parsed through `serde`,
//! falling back to fixed defaults when no file is given.

use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::SimError;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Charge duration in seconds (`T1`).
    pub charge_secs: f64,
    /// Tunnel crossing duration in seconds.
    pub crossing_secs: f64,
    /// Battery percentage at/below which a Flying drone requests landing.
    pub battery_critical: f64,
    /// Starting hangar capacity (`P`).
    pub hangar_capacity: u32,
    /// Starting/target fleet population (`N`).
    pub target_population: u32,
    /// Seconds between Operator watchdog/replenish ticks.
    pub check_interval_secs: u64,
    /// Wear limit: number of full flight cycles before a drone retires.
    pub max_cycles: u32,
    /// Capacity of each wait queue (Landing, Takeoff).
    pub wait_queue_capacity: usize,
    /// Polling granularity used while draining battery during waits.
    pub battery_tick_millis: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            charge_secs: 5.0,
            crossing_secs: 1.0,
            battery_critical: 20.0,
            hangar_capacity: 2,
            target_population: 5,
            check_interval_secs: 5,
            max_cycles: 3,
            wait_queue_capacity: 1024,
            battery_tick_millis: 100,
        }
    }
}

impl SimConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let raw = fs::read_to_string(path)
            .map_err(|e| SimError::InvalidConfiguration(format!("cannot read config: {e}")))?;
        toml::from_str(&raw)
            .map_err(|e| SimError::InvalidConfiguration(format!("cannot parse config: {e}")))
    }

    pub fn charge_time(&self) -> Duration {
        Duration::from_secs_f64(self.charge_secs)
    }

    pub fn flight_time(&self) -> Duration {
        Duration::from_secs_f64(self.charge_secs * 2.5)
    }

    pub fn crossing_time(&self) -> Duration {
        Duration::from_secs_f64(self.crossing_secs)
    }

    /// Battery percent drained per second while Flying or RequestingLand.
    pub fn drain_rate_per_sec(&self) -> f64 {
        80.0 / self.flight_time().as_secs_f64()
    }

    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_secs)
    }

    pub fn battery_tick(&self) -> Duration {
        Duration::from_millis(self.battery_tick_millis)
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if self.hangar_capacity == 0 {
            return Err(SimError::InvalidConfiguration(
                "hangar_capacity must be positive".into(),
            ));
        }
        if 2 * self.hangar_capacity >= self.target_population {
            return Err(SimError::InvalidConfiguration(format!(
                "P < N/2 violated: P={}, N={}",
                self.hangar_capacity, self.target_population
            )));
        }
        if self.target_population as u64 > crate::message::MAX_ID as u64 {
            return Err(SimError::InvalidConfiguration(format!(
                "N={} exceeds MAX_ID={}",
                self.target_population,
                crate::message::MAX_ID
            )));
        }
        Ok(())
    }
}
