//! Error kinds for the drone base simulation.
//!
//! `DroneDeath` is deliberately absent: a drone terminating is a regular
//! lifecycle path, never an error.

use crate::message::DroneId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("resource unavailable: {0}")]
    ResourceUnavailable(String),

    #[error("transient transport error: {0}")]
    TransientTransportError(String),

    #[error("logic invariant violation: {0}")]
    LogicInvariantViolation(String),

    #[error("directive targeted a drone that no longer exists: {0}")]
    OrphanedDirective(DroneId),
}
