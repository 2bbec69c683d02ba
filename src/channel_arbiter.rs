//! The two transit channels and the arbiter that picks between them
//! for the tunnels drones use to cross into and out of the base.

use crate::message::{ChannelId, CHANNEL_COUNT};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    None,
    In,
    Out,
}

#[derive(Debug, Clone, Copy)]
struct Channel {
    direction: Direction,
    users: u32,
}

impl Channel {
    const fn idle() -> Self {
        Self {
            direction: Direction::None,
            users: 0,
        }
    }
}

/// Owns the two channels. `users(c) = 0 ⇔ direction(c) = None` is
/// maintained as an invariant by `begin`/`end`.
#[derive(Debug, Clone, Copy)]
pub struct ChannelArbiter {
    channels: [Channel; CHANNEL_COUNT],
}

impl ChannelArbiter {
    pub fn new() -> Self {
        Self {
            channels: [Channel::idle(); CHANNEL_COUNT],
        }
    }

    /// Prefer a running convoy going the same direction; otherwise any idle
    /// channel; otherwise none.
    pub fn pick(&self, dir: Direction) -> Option<ChannelId> {
        if let Some(id) = self
            .channels
            .iter()
            .position(|c| c.direction == dir && c.users > 0)
        {
            return Some(id);
        }
        self.channels
            .iter()
            .position(|c| c.direction == Direction::None)
    }

    pub fn begin(&mut self, channel_id: ChannelId, dir: Direction) {
        let c = &mut self.channels[channel_id];
        if c.direction == Direction::None {
            c.direction = dir;
        }
        c.users += 1;
    }

    pub fn end(&mut self, channel_id: ChannelId) {
        let c = &mut self.channels[channel_id];
        c.users = c.users.saturating_sub(1);
        if c.users == 0 {
            c.direction = Direction::None;
        }
    }

    /// Find a channel currently running in the given direction with at
    /// least one user — used by dispatch to resolve which channel a
    /// `Landed`/`Departed` notification refers to.
    pub fn find_active(&self, dir: Direction) -> Option<ChannelId> {
        self.channels
            .iter()
            .position(|c| c.direction == dir && c.users > 0)
    }

    pub fn direction_of(&self, channel_id: ChannelId) -> Direction {
        self.channels[channel_id].direction
    }

    pub fn users_of(&self, channel_id: ChannelId) -> u32 {
        self.channels[channel_id].users
    }
}

impl Default for ChannelArbiter {
    fn default() -> Self {
        Self::new()
    }
}
