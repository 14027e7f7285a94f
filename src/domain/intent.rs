// Player intents recorded from inbound messages, applied by the tick.

/// Movement input. `None` fields were absent or not numbers and leave state unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MovementIntent {
    pub vx: Option<f32>,
    pub vz: Option<f32>,
    pub rot_y: Option<f32>,
}

/// Discrete actions. Unknown kinds are kept as `Unrecognized` and ignored downstream.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Cast {
        spell_id: String,
        target_enemy_id: Option<String>,
    },
    Attack {
        target_enemy_id: Option<String>,
    },
    Unrecognized {
        kind: String,
    },
}

impl Action {
    pub fn kind(&self) -> &str {
        match self {
            Action::Cast { .. } => "cast",
            Action::Attack { .. } => "attack",
            Action::Unrecognized { kind } => kind,
        }
    }
}
