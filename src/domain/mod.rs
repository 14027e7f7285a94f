// Domain layer: core simulation types and rules.

pub mod events;
pub mod intent;
pub mod ports;
pub mod snapshot;
pub mod state;
pub mod systems;
pub mod tuning;
pub mod vector;

pub use events::{DespawnReason, SimEvent};
pub use intent::{Action, MovementIntent};
pub use snapshot::RoomSnapshot;
pub use state::{Enemy, EnemyState, Player, Projectile, Room};
pub use vector::Vec2;
