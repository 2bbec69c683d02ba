//! Population controller: target vs. live fleet size, and the one-shot
//! Grow latch.

use crate::message::{DroneId, MAX_ID};

pub struct Population {
    target_n: u32,
    current_active: u32,
    grow_once_used: bool,
}

impl Population {
    pub fn new(target_n: u32) -> Self {
        Self {
            target_n,
            current_active: target_n,
            grow_once_used: false,
        }
    }

    pub fn target_n(&self) -> u32 {
        self.target_n
    }

    pub fn current_active(&self) -> u32 {
        self.current_active
    }

    pub fn on_spawn(&mut self) {
        self.current_active += 1;
    }

    pub fn on_dead(&mut self) {
        self.current_active = self.current_active.saturating_sub(1);
    }

    pub fn is_overshooting(&self) -> bool {
        self.current_active > self.target_n
    }

    pub fn needs_replenish(&self) -> bool {
        self.current_active < self.target_n
    }

    pub fn shortfall(&self) -> u32 {
        self.target_n.saturating_sub(self.current_active)
    }

    /// Apply a one-shot Grow directive: doubles `target_n`, returns the
    /// amount the hangar capacity should grow by (the old capacity), or
    /// `None` if the latch already fired or doubling would exceed `MAX_ID`.
    pub fn apply_grow(&mut self, current_capacity: u32) -> Option<u32> {
        if self.grow_once_used {
            return None;
        }
        if (self.target_n as u64) * 2 > MAX_ID as u64 {
            return None;
        }
        self.target_n *= 2;
        self.grow_once_used = true;
        Some(current_capacity)
    }

    /// Apply a Shrink directive: halves `target_n` via integer division,
    /// floored at 1. Asymmetric with `apply_grow`'s doubling — repeated
    /// Grow/Shrink cycles do not cancel out exactly.
    pub fn apply_shrink(&mut self) {
        self.target_n = (self.target_n / 2).max(1);
    }

    pub fn grow_once_used(&self) -> bool {
        self.grow_once_used
    }
}

/// Allocate the lowest free id in `1..MAX_ID` from a registry-like
/// predicate. `0` is reserved for "slot free".
pub fn allocate_lowest_free_id(is_taken: impl Fn(DroneId) -> bool) -> Option<DroneId> {
    (1..MAX_ID).find(|id| !is_taken(*id))
}
