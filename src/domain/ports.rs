// Ports the simulation depends on; adapters and tests provide implementations.

use crate::domain::events::SimEvent;
use crate::domain::snapshot::RoomSnapshot;
use crate::domain::state::{ConnectionId, RoomId};

/// Who an outbound message is addressed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Audience {
    /// Every connection currently in the room.
    Room(RoomId),
    /// A single connection, wherever it is.
    Connection(ConnectionId),
}

#[derive(Debug, Clone)]
pub enum Outbound {
    /// Join acknowledgement for the requesting connection.
    Joined { room_id: RoomId },
    Snapshot(RoomSnapshot),
    Event {
        t: u64,
        room_id: RoomId,
        event: SimEvent,
    },
}

#[derive(Debug, Clone)]
pub struct Envelope {
    pub audience: Audience,
    pub message: Outbound,
}

/// Outbound side of the room-scoped publish/subscribe transport.
pub trait Publisher: Send {
    fn publish(&self, envelope: Envelope);
}

// Port for retrieving the current time.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> u64;
}

/// Generates projectile ids. Implementations must not repeat ids within a process.
pub trait IdSource: Send {
    fn next_projectile_id(&mut self, owner_id: &str) -> String;
}

/// Monotonic counter ids of the form `<owner>-<n>`.
#[derive(Debug, Default)]
pub struct SequentialIds {
    next: u64,
}

impl IdSource for SequentialIds {
    fn next_projectile_id(&mut self, owner_id: &str) -> String {
        self.next += 1;
        format!("{owner_id}-{}", self.next)
    }
}
