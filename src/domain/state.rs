// Domain-level simulation entities owned by a room.

use crate::domain::vector::Vec2;
use std::collections::{BTreeMap, HashMap, VecDeque};

/// Transport-assigned id, stable for the lifetime of one connection.
pub type ConnectionId = String;
/// Logical id chosen by the client; defaults to the connection id.
pub type PlayerId = String;
/// Enemy ids take the form `e<N>` and are assigned at room creation.
pub type EnemyId = String;
pub type ProjectileId = String;
pub type RoomId = String;

/// A spell activation waiting for its timer.
#[derive(Debug, Clone, PartialEq)]
pub struct CastEntry {
    pub spell_id: String,
    pub target_enemy_id: Option<EnemyId>,
    pub started_at: u64,
    pub finishes_at: u64,
}

impl CastEntry {
    pub fn is_due(&self, now: u64) -> bool {
        self.finishes_at <= now
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    pub connection_id: ConnectionId,
    pub player_id: PlayerId,
    pub name: String,
    pub position: Vec2,

    // Movement intent as last received; may exceed unit length.
    pub velocity_intent: Vec2,
    pub rot_y: f32,

    pub hp: i32,
    pub max_hp: i32,
    pub mana: i32,
    pub max_mana: i32,

    // In-flight casts in enqueue order (do not serialize to clients).
    pub casts: Vec<CastEntry>,
}

impl Player {
    pub fn new(
        connection_id: ConnectionId,
        player_id: PlayerId,
        name: String,
        max_hp: i32,
        max_mana: i32,
    ) -> Self {
        Self {
            connection_id,
            player_id,
            name,
            position: Vec2::ZERO,
            velocity_intent: Vec2::ZERO,
            rot_y: 0.0,
            hp: max_hp,
            max_hp,
            mana: max_mana,
            max_mana,
            casts: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyState {
    Idle,
    Wander,
    Chase,
}

impl EnemyState {
    pub fn as_str(self) -> &'static str {
        match self {
            EnemyState::Idle => "idle",
            EnemyState::Wander => "wander",
            EnemyState::Chase => "chase",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: EnemyId,
    pub position: Vec2,
    pub velocity: Vec2,
    pub rot_y: f32,
    pub state: EnemyState,
    /// Epoch ms after which the wander direction is re-rolled.
    pub next_wander_at: u64,
    pub hp: i32,
    pub max_hp: i32,
}

impl Enemy {
    pub fn new(id: EnemyId, position: Vec2, max_hp: i32) -> Self {
        Self {
            id,
            position,
            velocity: Vec2::ZERO,
            rot_y: 0.0,
            state: EnemyState::Wander,
            next_wander_at: 0,
            hp: max_hp,
            max_hp,
        }
    }

    /// Subtracts `amount` and clamps at zero. Returns the resulting hp.
    pub fn apply_damage(&mut self, amount: i32) -> i32 {
        self.hp = (self.hp - amount.max(0)).clamp(0, self.max_hp);
        self.hp
    }

    pub fn is_dead(&self) -> bool {
        self.hp <= 0
    }
}

#[derive(Debug, Clone)]
pub struct Projectile {
    pub id: ProjectileId,
    /// Spell that launched it, e.g. `fireball`.
    pub kind: String,
    pub position: Vec2,
    pub velocity: Vec2,
    pub rot_y: f32,
    pub owner_id: PlayerId,
    pub target_enemy_id: Option<EnemyId>,
    pub created_at: u64,
    pub expires_at: u64,
    pub damage: i32,
}

impl Projectile {
    pub fn is_expired(&self, now: u64) -> bool {
        now >= self.expires_at
    }
}

/// Projectiles keyed by id with explicit insertion order for FIFO eviction.
#[derive(Debug, Default)]
pub struct ProjectileStore {
    by_id: HashMap<ProjectileId, Projectile>,
    order: VecDeque<ProjectileId>,
}

impl ProjectileStore {
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Projectile> {
        self.by_id.get(id)
    }

    /// Inserts a projectile as the newest entry. A duplicate id replaces the old entry.
    pub fn insert(&mut self, projectile: Projectile) {
        let id = projectile.id.clone();
        if self.by_id.insert(id.clone(), projectile).is_some() {
            self.order.retain(|existing| *existing != id);
        }
        self.order.push_back(id);
    }

    pub fn remove(&mut self, id: &str) -> Option<Projectile> {
        let removed = self.by_id.remove(id)?;
        self.order.retain(|existing| existing != id);
        Some(removed)
    }

    /// Removes and returns the oldest-inserted projectile.
    pub fn pop_oldest(&mut self) -> Option<Projectile> {
        while let Some(id) = self.order.pop_front() {
            if let Some(projectile) = self.by_id.remove(&id) {
                return Some(projectile);
            }
        }
        None
    }

    /// Ids in insertion order.
    pub fn ids(&self) -> Vec<ProjectileId> {
        self.order.iter().cloned().collect()
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Projectile> {
        self.by_id.get_mut(id)
    }

    /// Iterates in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Projectile> {
        self.order.iter().filter_map(|id| self.by_id.get(id))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Weather {
    #[default]
    Clear,
}

impl Weather {
    pub fn as_str(self) -> &'static str {
        match self {
            Weather::Clear => "clear",
        }
    }
}

/// Slow-changing ambient state shared by everyone in a room.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Environment {
    /// Hours in `[0, 24)`.
    pub time_of_day: f32,
    pub weather: Weather,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            time_of_day: 12.0,
            weather: Weather::Clear,
        }
    }
}

/// One isolated simulation instance.
#[derive(Debug)]
pub struct Room {
    pub id: RoomId,
    pub players: BTreeMap<ConnectionId, Player>,
    pub enemies: BTreeMap<EnemyId, Enemy>,
    pub projectiles: ProjectileStore,
    pub env: Environment,
}

impl Room {
    pub fn new(id: RoomId) -> Self {
        Self {
            id,
            players: BTreeMap::new(),
            enemies: BTreeMap::new(),
            projectiles: ProjectileStore::default(),
            env: Environment::default(),
        }
    }

    /// Resolves the acting player to its connection key: the logical `actor_id` wins when
    /// some player carries it, otherwise the player bound to the sending connection.
    pub fn resolve_actor(
        &self,
        actor_id: Option<&str>,
        connection_id: &str,
    ) -> Option<ConnectionId> {
        actor_id
            .and_then(|actor| {
                self.players
                    .iter()
                    .find(|(_, p)| p.player_id == actor)
                    .map(|(conn, _)| conn.clone())
            })
            .or_else(|| {
                self.players
                    .contains_key(connection_id)
                    .then(|| connection_id.to_string())
            })
    }
}
