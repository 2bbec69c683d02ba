mod drone;

pub use drone::{Drone, DroneParams, Location, StartMode, State};

#[cfg(test)]
mod tests;
