use crate::domain::events::{DespawnReason, SimEvent};
use crate::domain::state::{Enemy, EnemyId, Projectile, ProjectileStore};
use crate::domain::systems::combat;
use crate::domain::tuning::DeadEnemyPolicy;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy)]
pub struct ProjectileConfig {
    pub hit_radius: f32,
    pub max_per_room: usize,
    pub dead_policy: DeadEnemyPolicy,
}

/// Adds a projectile, raising `projectile_spawn`, and evicts the oldest one when the
/// room goes over capacity.
pub fn spawn_projectile(
    store: &mut ProjectileStore,
    projectile: Projectile,
    max_per_room: usize,
    events: &mut Vec<SimEvent>,
) {
    events.push(SimEvent::ProjectileSpawn {
        projectile_id: projectile.id.clone(),
        kind: projectile.kind.clone(),
        owner_id: projectile.owner_id.clone(),
        target_enemy_id: projectile.target_enemy_id.clone(),
        position: projectile.position,
        velocity: projectile.velocity,
    });
    store.insert(projectile);

    if store.len() > max_per_room {
        if let Some(evicted) = store.pop_oldest() {
            events.push(SimEvent::ProjectileDespawn {
                projectile_id: evicted.id,
                reason: DespawnReason::Evicted,
            });
        }
    }
}

/// Moves every projectile, expires old ones and resolves hits against their target.
///
/// Projectiles only ever collide with the enemy they were aimed at; if that enemy is
/// gone they fly on until they expire.
pub fn tick_projectiles(
    store: &mut ProjectileStore,
    enemies: &mut BTreeMap<EnemyId, Enemy>,
    cfg: ProjectileConfig,
    now: u64,
    dt: f32,
    events: &mut Vec<SimEvent>,
) {
    let hit_radius_sq = cfg.hit_radius * cfg.hit_radius;

    for id in store.ids() {
        let Some(p) = store.get_mut(&id) else {
            continue;
        };
        p.position += p.velocity * dt;

        if p.is_expired(now) {
            store.remove(&id);
            events.push(SimEvent::ProjectileDespawn {
                projectile_id: id,
                reason: DespawnReason::Expired,
            });
            continue;
        }

        let Some(target_id) = p.target_enemy_id.clone() else {
            continue;
        };
        let Some(enemy) = enemies.get(&target_id) else {
            continue;
        };
        if enemy.position.distance_squared(p.position) > hit_radius_sq {
            continue;
        }

        let owner_id = p.owner_id.clone();
        let damage = p.damage;
        events.push(SimEvent::Hit {
            projectile_id: id.clone(),
            owner_id: owner_id.clone(),
            enemy_id: target_id.clone(),
        });

        // Damage first, then despawn, then death (if any) to keep the event order stable.
        let mut damage_events = Vec::new();
        combat::damage_enemy(
            enemies,
            &target_id,
            damage,
            &owner_id,
            cfg.dead_policy,
            &mut damage_events,
        );
        let mut damage_events = damage_events.into_iter();
        events.extend(damage_events.next());

        store.remove(&id);
        events.push(SimEvent::ProjectileDespawn {
            projectile_id: id,
            reason: DespawnReason::Hit,
        });
        events.extend(damage_events);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::vector::Vec2;

    const CFG: ProjectileConfig = ProjectileConfig {
        hit_radius: 0.6,
        max_per_room: 200,
        dead_policy: DeadEnemyPolicy::Persist,
    };

    fn projectile(id: &str, position: Vec2, velocity: Vec2, target: Option<&str>) -> Projectile {
        Projectile {
            id: id.into(),
            kind: "fireball".into(),
            position,
            velocity,
            rot_y: velocity.heading(),
            owner_id: "p1".into(),
            target_enemy_id: target.map(str::to_string),
            created_at: 0,
            expires_at: 2_000,
            damage: 12,
        }
    }

    fn enemy_at(pos: Vec2, hp: i32) -> BTreeMap<EnemyId, Enemy> {
        let mut e = Enemy::new("e1".into(), pos, 50);
        e.hp = hp;
        BTreeMap::from([("e1".to_string(), e)])
    }

    fn kinds(events: &[SimEvent]) -> Vec<&'static str> {
        events.iter().map(SimEvent::kind).collect()
    }

    #[test]
    fn projectile_hits_target_inside_radius() {
        let mut store = ProjectileStore::default();
        store.insert(projectile("a", Vec2::ZERO, Vec2::new(0.0, 10.0), Some("e1")));
        let mut enemies = enemy_at(Vec2::new(0.0, 1.0), 50);
        let mut events = Vec::new();

        tick_projectiles(&mut store, &mut enemies, CFG, 100, 0.1, &mut events);

        assert!(store.is_empty());
        assert_eq!(kinds(&events), ["hit", "damage", "projectile_despawn"]);
        assert_eq!(enemies["e1"].hp, 38);
        assert!(matches!(
            events[2],
            SimEvent::ProjectileDespawn { reason: DespawnReason::Hit, .. }
        ));
    }

    #[test]
    fn lethal_hit_reports_death_after_despawn() {
        let mut store = ProjectileStore::default();
        store.insert(projectile("a", Vec2::ZERO, Vec2::ZERO, Some("e1")));
        let mut enemies = enemy_at(Vec2::new(0.3, 0.0), 10);
        let mut events = Vec::new();

        tick_projectiles(&mut store, &mut enemies, CFG, 100, 0.1, &mut events);

        assert_eq!(
            kinds(&events),
            ["hit", "damage", "projectile_despawn", "enemy_death"]
        );
        assert_eq!(enemies["e1"].hp, 0);
    }

    #[test]
    fn projectile_without_target_expires() {
        let mut store = ProjectileStore::default();
        store.insert(projectile("a", Vec2::ZERO, Vec2::new(1.0, 0.0), Some("gone")));
        let mut enemies = enemy_at(Vec2::ZERO, 50);
        let mut events = Vec::new();

        tick_projectiles(&mut store, &mut enemies, CFG, 1_999, 0.1, &mut events);
        assert_eq!(store.len(), 1);
        assert!(events.is_empty());

        tick_projectiles(&mut store, &mut enemies, CFG, 2_000, 0.1, &mut events);
        assert!(store.is_empty());
        assert!(matches!(
            events.as_slice(),
            [SimEvent::ProjectileDespawn { reason: DespawnReason::Expired, .. }]
        ));
        assert_eq!(enemies["e1"].hp, 50);
    }

    #[test]
    fn expiry_wins_over_hit_on_the_same_tick() {
        let mut store = ProjectileStore::default();
        store.insert(projectile("a", Vec2::ZERO, Vec2::ZERO, Some("e1")));
        let mut enemies = enemy_at(Vec2::ZERO, 50);
        let mut events = Vec::new();

        tick_projectiles(&mut store, &mut enemies, CFG, 2_000, 0.1, &mut events);

        assert_eq!(kinds(&events), ["projectile_despawn"]);
        assert_eq!(enemies["e1"].hp, 50);
    }

    #[test]
    fn spawning_over_capacity_evicts_oldest() {
        let mut store = ProjectileStore::default();
        let mut events = Vec::new();
        for id in ["a", "b", "c"] {
            spawn_projectile(
                &mut store,
                projectile(id, Vec2::ZERO, Vec2::ZERO, None),
                2,
                &mut events,
            );
        }

        assert_eq!(store.len(), 2);
        assert!(store.get("a").is_none());
        assert_eq!(
            events.last(),
            Some(&SimEvent::ProjectileDespawn {
                projectile_id: "a".into(),
                reason: DespawnReason::Evicted,
            })
        );
    }
}
