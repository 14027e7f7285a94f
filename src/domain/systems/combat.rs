use crate::domain::events::SimEvent;
use crate::domain::state::{Enemy, EnemyId};
use crate::domain::tuning::DeadEnemyPolicy;
use std::collections::BTreeMap;

/// Applies damage to an enemy and raises `damage`, then `enemy_death` whenever the
/// resulting hp is at or below zero. Returns the new hp, or `None` if the enemy is gone.
pub fn damage_enemy(
    enemies: &mut BTreeMap<EnemyId, Enemy>,
    enemy_id: &str,
    amount: i32,
    source_player_id: &str,
    policy: DeadEnemyPolicy,
    events: &mut Vec<SimEvent>,
) -> Option<i32> {
    let enemy = enemies.get_mut(enemy_id)?;
    let hp = enemy.apply_damage(amount);
    events.push(SimEvent::Damage {
        enemy_id: enemy.id.clone(),
        source_player_id: source_player_id.to_string(),
        amount,
        hp,
        max_hp: enemy.max_hp,
    });

    if enemy.is_dead() {
        events.push(SimEvent::EnemyDeath {
            enemy_id: enemy.id.clone(),
            killer_id: source_player_id.to_string(),
        });
        if policy == DeadEnemyPolicy::Despawn {
            enemies.remove(enemy_id);
        }
    }
    Some(hp)
}
