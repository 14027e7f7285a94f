// Use-case level inputs for the world task.

use crate::domain::{Action, MovementIntent};

/// Commands flowing from connections into the single world task.
#[derive(Debug, Clone)]
pub enum GameEvent {
    JoinRoom {
        connection_id: String,
        room_id: String,
        player_id: Option<String>,
        name: Option<String>,
    },
    Input {
        connection_id: String,
        room_id: String,
        intent: MovementIntent,
    },
    Action {
        connection_id: String,
        room_id: String,
        actor_id: Option<String>,
        action: Action,
    },
    Disconnect {
        connection_id: String,
    },
}

impl GameEvent {
    pub fn connection_id(&self) -> &str {
        match self {
            GameEvent::JoinRoom { connection_id, .. }
            | GameEvent::Input { connection_id, .. }
            | GameEvent::Action { connection_id, .. }
            | GameEvent::Disconnect { connection_id } => connection_id,
        }
    }
}
