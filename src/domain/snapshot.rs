// Read-only projections of room state published every tick.

use crate::domain::state::{Enemy, EnemyState, Environment, Player, Projectile, Room};

#[derive(Debug, Clone)]
pub struct PlayerSnapshot {
    pub connection_id: String,
    pub player_id: String,
    pub name: String,
    pub x: f32,
    pub z: f32,
    pub rot_y: f32,
    pub hp: i32,
    pub max_hp: i32,
    pub mana: i32,
    pub max_mana: i32,
}

#[derive(Debug, Clone)]
pub struct EnemySnapshot {
    pub id: String,
    pub x: f32,
    pub z: f32,
    pub rot_y: f32,
    pub state: EnemyState,
    pub hp: i32,
    pub max_hp: i32,
}

#[derive(Debug, Clone)]
pub struct ProjectileSnapshot {
    pub id: String,
    pub kind: String,
    pub x: f32,
    pub z: f32,
    pub rot_y: f32,
    pub owner_id: String,
}

#[derive(Debug, Clone)]
pub struct RoomSnapshot {
    pub t: u64,
    pub room_id: String,
    pub players: Vec<PlayerSnapshot>,
    pub enemies: Vec<EnemySnapshot>,
    pub projectiles: Vec<ProjectileSnapshot>,
    pub env: Environment,
}

impl RoomSnapshot {
    pub fn capture(room: &Room, t: u64) -> Self {
        Self {
            t,
            room_id: room.id.clone(),
            players: room.players.values().map(PlayerSnapshot::from).collect(),
            enemies: room.enemies.values().map(EnemySnapshot::from).collect(),
            projectiles: room.projectiles.iter().map(ProjectileSnapshot::from).collect(),
            env: room.env,
        }
    }
}

impl From<&Player> for PlayerSnapshot {
    fn from(p: &Player) -> Self {
        Self {
            connection_id: p.connection_id.clone(),
            player_id: p.player_id.clone(),
            name: p.name.clone(),
            x: p.position.x,
            z: p.position.z,
            rot_y: p.rot_y,
            hp: p.hp,
            max_hp: p.max_hp,
            mana: p.mana,
            max_mana: p.max_mana,
        }
    }
}

impl From<&Enemy> for EnemySnapshot {
    fn from(e: &Enemy) -> Self {
        Self {
            id: e.id.clone(),
            x: e.position.x,
            z: e.position.z,
            rot_y: e.rot_y,
            state: e.state,
            hp: e.hp,
            max_hp: e.max_hp,
        }
    }
}

impl From<&Projectile> for ProjectileSnapshot {
    fn from(p: &Projectile) -> Self {
        Self {
            id: p.id.clone(),
            kind: p.kind.clone(),
            x: p.position.x,
            z: p.position.z,
            rot_y: p.rot_y,
            owner_id: p.owner_id.clone(),
        }
    }
}
