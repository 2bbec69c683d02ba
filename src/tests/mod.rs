mod units;
mod utils;

use std::time::Duration;

const FLEET_JOIN_TIMEOUT: Duration = Duration::from_millis(800);
