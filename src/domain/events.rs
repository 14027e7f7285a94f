// Discrete occurrences raised by ingestion and by the tick.

use crate::domain::state::{ConnectionId, EnemyId, PlayerId, ProjectileId};
use crate::domain::vector::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DespawnReason {
    Expired,
    Hit,
    /// Dropped to keep the room under its projectile capacity.
    Evicted,
}

impl DespawnReason {
    pub fn as_str(self) -> &'static str {
        match self {
            DespawnReason::Expired => "expired",
            DespawnReason::Hit => "hit",
            DespawnReason::Evicted => "evicted",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SimEvent {
    PlayerJoined {
        player_id: PlayerId,
        connection_id: ConnectionId,
        name: String,
    },
    PlayerLeft {
        player_id: PlayerId,
        connection_id: ConnectionId,
    },
    CastStart {
        player_id: PlayerId,
        spell_id: String,
        target_enemy_id: Option<EnemyId>,
        finishes_at: u64,
    },
    CastFinish {
        player_id: PlayerId,
        spell_id: String,
        target_enemy_id: Option<EnemyId>,
    },
    /// A resolved cast that had nothing to act on.
    SpellEffect {
        player_id: PlayerId,
        spell_id: String,
    },
    ProjectileSpawn {
        projectile_id: ProjectileId,
        kind: String,
        owner_id: PlayerId,
        target_enemy_id: Option<EnemyId>,
        position: Vec2,
        velocity: Vec2,
    },
    ProjectileDespawn {
        projectile_id: ProjectileId,
        reason: DespawnReason,
    },
    Hit {
        projectile_id: ProjectileId,
        owner_id: PlayerId,
        enemy_id: EnemyId,
    },
    Damage {
        enemy_id: EnemyId,
        source_player_id: PlayerId,
        amount: i32,
        hp: i32,
        max_hp: i32,
    },
    EnemyDeath {
        enemy_id: EnemyId,
        killer_id: PlayerId,
    },
}

impl SimEvent {
    /// Wire name of the event type.
    pub fn kind(&self) -> &'static str {
        match self {
            SimEvent::PlayerJoined { .. } => "player_joined",
            SimEvent::PlayerLeft { .. } => "player_left",
            SimEvent::CastStart { .. } => "cast_start",
            SimEvent::CastFinish { .. } => "cast_finish",
            SimEvent::SpellEffect { .. } => "spell_effect",
            SimEvent::ProjectileSpawn { .. } => "projectile_spawn",
            SimEvent::ProjectileDespawn { .. } => "projectile_despawn",
            SimEvent::Hit { .. } => "hit",
            SimEvent::Damage { .. } => "damage",
            SimEvent::EnemyDeath { .. } => "enemy_death",
        }
    }
}
