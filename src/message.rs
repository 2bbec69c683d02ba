// 0 is reserved for "slot free" in the registry, so real drones are
// allocated starting at id 1
pub type DroneId = u32;

pub const MAX_ID: DroneId = 1024;

pub type ChannelId = usize;

pub const CHANNEL_COUNT: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Request {
    pub kind: RequestKind,
    pub drone_id: DroneId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    ReqLand,
    ReqTakeoff,
    Landed,
    Departed,
    Dead,
}

impl Request {
    pub fn new(kind: RequestKind, drone_id: DroneId) -> Self {
        Self { kind, drone_id }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grant {
    pub channel_id: ChannelId,
}

// Attack and shutdown are not operator directives: an attack is addressed
// straight to the targeted drone, and shutdown is a shared atomic flag
// every loop observes at its suspension points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorDirective {
    Grow,
    Shrink,
}
