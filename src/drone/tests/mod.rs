mod utils;

use std::time::Duration;

const DRONE_EXIT_TIMEOUT: Duration = Duration::from_millis(500);
const DRONE_EXIT_POLL_INTERVAL: Duration = Duration::from_millis(10);
