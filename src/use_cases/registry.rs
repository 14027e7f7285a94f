// Room registry: lazily creates rooms, tracks connection membership, tears down empty rooms.

use crate::domain::state::{ConnectionId, Enemy, Room, RoomId};
use crate::domain::tuning::EnemyTuning;
use crate::domain::vector::Vec2;
use rand::Rng;
use std::collections::{BTreeMap, HashMap};
use tracing::info;

/// Owned store of live rooms. Only the world task holds one, so no locking is needed.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    /// Map of room id to room state; ordered so ticks visit rooms deterministically.
    rooms: BTreeMap<RoomId, Room>,
    /// Which room each connection currently belongs to.
    memberships: HashMap<ConnectionId, RoomId>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the room for `room_id`, creating and seeding it on first reference.
    pub fn get_or_create<R: Rng + ?Sized>(
        &mut self,
        room_id: &str,
        enemies: &EnemyTuning,
        rng: &mut R,
    ) -> &mut Room {
        self.rooms.entry(room_id.to_string()).or_insert_with(|| {
            let mut room = Room::new(room_id.to_string());
            seed_enemies(&mut room, enemies, rng);
            info!(room_id, enemies = room.enemies.len(), "room created");
            room
        })
    }

    pub fn get(&self, room_id: &str) -> Option<&Room> {
        self.rooms.get(room_id)
    }

    pub fn get_mut(&mut self, room_id: &str) -> Option<&mut Room> {
        self.rooms.get_mut(room_id)
    }

    pub fn contains(&self, room_id: &str) -> bool {
        self.rooms.contains_key(room_id)
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub fn rooms_mut(&mut self) -> impl Iterator<Item = &mut Room> {
        self.rooms.values_mut()
    }

    pub fn room_of(&self, connection_id: &str) -> Option<&RoomId> {
        self.memberships.get(connection_id)
    }

    pub fn bind(&mut self, connection_id: &str, room_id: &str) {
        self.memberships
            .insert(connection_id.to_string(), room_id.to_string());
    }

    pub fn unbind(&mut self, connection_id: &str) -> Option<RoomId> {
        self.memberships.remove(connection_id)
    }

    /// Deletes the room once its last player is gone. Returns true if it was removed.
    pub fn remove_if_empty(&mut self, room_id: &str) -> bool {
        let empty = self
            .rooms
            .get(room_id)
            .is_some_and(|room| room.players.is_empty());
        if empty {
            self.rooms.remove(room_id);
            info!(room_id, "room removed");
        }
        empty
    }
}

fn seed_enemies<R: Rng + ?Sized>(room: &mut Room, cfg: &EnemyTuning, rng: &mut R) {
    let extent = cfg.spawn_half_extent.abs();
    for n in 1..=cfg.count {
        let id = format!("e{n}");
        let position = Vec2::new(
            rng.random_range(-extent..=extent),
            rng.random_range(-extent..=extent),
        );
        room.enemies
            .insert(id.clone(), Enemy::new(id, position, cfg.max_hp));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::state::{EnemyState, Player};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn first_reference_seeds_enemies_inside_the_spawn_square() {
        let mut registry = RoomRegistry::new();
        let cfg = EnemyTuning::default();
        let mut rng = StdRng::seed_from_u64(1);

        let room = registry.get_or_create("r1", &cfg, &mut rng);

        assert_eq!(room.enemies.len(), 6);
        for n in 1..=6 {
            assert!(room.enemies.contains_key(&format!("e{n}")), "missing e{n}");
        }
        for enemy in room.enemies.values() {
            assert!(enemy.position.x.abs() <= cfg.spawn_half_extent);
            assert!(enemy.position.z.abs() <= cfg.spawn_half_extent);
            assert_eq!(enemy.velocity, Vec2::ZERO);
            assert_eq!(enemy.state, EnemyState::Wander);
            assert_eq!(enemy.hp, enemy.max_hp);
            assert_eq!(enemy.max_hp, 50);
        }
    }

    #[test]
    fn second_reference_returns_the_same_room() {
        let mut registry = RoomRegistry::new();
        let cfg = EnemyTuning::default();
        let mut rng = StdRng::seed_from_u64(1);

        let first = registry.get_or_create("r1", &cfg, &mut rng).enemies["e1"].position;
        let second = registry.get_or_create("r1", &cfg, &mut rng).enemies["e1"].position;

        assert_eq!(first, second);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn only_empty_rooms_are_removed() {
        let mut registry = RoomRegistry::new();
        let cfg = EnemyTuning::default();
        let mut rng = StdRng::seed_from_u64(1);

        registry.get_or_create("r1", &cfg, &mut rng).players.insert(
            "c1".into(),
            Player::new("c1".into(), "c1".into(), "P".into(), 100, 100),
        );
        assert!(!registry.remove_if_empty("r1"));
        assert!(registry.contains("r1"));

        registry.get_mut("r1").unwrap().players.clear();
        assert!(registry.remove_if_empty("r1"));
        assert!(registry.is_empty());
        assert!(!registry.remove_if_empty("missing"));
    }
}
