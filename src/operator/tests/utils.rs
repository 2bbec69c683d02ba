use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crossbeam::channel::{unbounded, Receiver};

use super::super::operator::Operator;
use crate::config::SimConfig;
use crate::message::{DroneId, Grant, OperatorDirective, Request};
use crate::registry::Registry;

/// A config with a small hangar/fleet so scenario tests can reason about
/// exact slot counts, plus millisecond-scale timing for the one test that
/// actually spawns a real drone thread via `replenish`.
pub fn fast_config() -> SimConfig {
    SimConfig {
        hangar_capacity: 4,
        target_population: 10,
        wait_queue_capacity: 16,
        charge_secs: 0.02,
        crossing_secs: 0.01,
        battery_tick_millis: 2,
        ..SimConfig::default()
    }
}

pub struct TestFleet {
    pub operator: Operator,
    pub grant_rxs: HashMap<DroneId, Receiver<Grant>>,
    /// A second consumer of the request channel: the Operator under test is
    /// driven by direct method calls rather than its own `run()` loop, so
    /// this lets tests observe requests that replenished drone threads send
    /// back on their own.
    pub request_rx: Receiver<Request>,
    pub registry: Registry,
    pub running: Arc<AtomicBool>,
}

pub fn build_operator(config: SimConfig, drone_ids: &[DroneId]) -> TestFleet {
    let (request_tx, request_rx) = unbounded::<Request>();
    let (_directive_tx, directive_rx) = unbounded::<OperatorDirective>();
    let registry = Registry::new();
    let running = Arc::new(AtomicBool::new(true));

    let mut operator = Operator::new(
        config,
        request_tx,
        request_rx.clone(),
        directive_rx,
        registry.clone(),
        running.clone(),
    );

    let mut grant_rxs = HashMap::new();
    for &id in drone_ids {
        let (grant_tx, grant_rx) = unbounded();
        let (attack_tx, _attack_rx) = unbounded();
        operator.register_drone(id, grant_tx, attack_tx);
        grant_rxs.insert(id, grant_rx);
    }

    TestFleet {
        operator,
        grant_rxs,
        request_rx,
        registry,
        running,
    }
}

pub fn expect_grant(rx: &Receiver<Grant>) -> Grant {
    rx.try_recv().expect("expected a grant to have been sent")
}

pub fn expect_no_grant(rx: &Receiver<Grant>) {
    assert!(rx.try_recv().is_err(), "did not expect a grant yet");
}
