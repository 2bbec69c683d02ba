use std::sync::atomic::Ordering;
use std::thread;
use std::time::{Duration, Instant};

use super::utils::{fast_config, launch_test_fleet, shutdown_and_join};
use crate::config::SimConfig;
use crate::fleet;

const POLL_TIMEOUT: Duration = Duration::from_millis(500);

#[test]
fn fleet_launches_with_expected_registry_size_and_shuts_down_cleanly() {
    let (fleet, commander) = launch_test_fleet(fast_config(2, 5));
    assert_eq!(fleet.registry_view.len(), 5);

    thread::sleep(Duration::from_millis(100));
    assert!(fleet.registry_view.len() <= 5, "never more than target_n live");

    shutdown_and_join(fleet, &commander);
}

#[test]
fn commander_attack_eventually_removes_drone_from_registry() {
    let (fleet, commander) = launch_test_fleet(fast_config(2, 3));
    assert!(fleet.registry_view.contains(1));

    commander.attack(1);

    let start = Instant::now();
    while start.elapsed() < POLL_TIMEOUT {
        if !fleet.registry_view.contains(1) {
            break;
        }
        thread::sleep(Duration::from_millis(5));
    }
    assert!(
        !fleet.registry_view.contains(1),
        "attacked drone should eventually die and clear its registry entry"
    );

    shutdown_and_join(fleet, &commander);
}

#[test]
fn commander_grow_and_shrink_directives_do_not_disrupt_running_fleet() {
    let (fleet, commander) = launch_test_fleet(fast_config(2, 5));
    commander.grow();
    commander.shrink();
    thread::sleep(Duration::from_millis(50));

    assert!(
        !fleet.operator_handle.is_finished(),
        "operator should keep running after rescaling directives"
    );
    assert!(fleet.running.load(Ordering::Relaxed));

    shutdown_and_join(fleet, &commander);
}

#[test]
fn invalid_configuration_is_rejected_before_launch() {
    let config = SimConfig {
        hangar_capacity: 10,
        target_population: 5,
        ..SimConfig::default()
    };
    let err = fleet::launch(config).expect_err("P < N/2 must be rejected");
    assert!(matches!(err, crate::error::SimError::InvalidConfiguration(_)));
}
