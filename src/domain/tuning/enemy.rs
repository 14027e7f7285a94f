//! Gameplay tuning for AI-driven enemies.

use std::ops::RangeInclusive;

/// What happens to an enemy once its hp reaches zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeadEnemyPolicy {
    /// The enemy stays in the room; later hits keep emitting damage and death events.
    #[default]
    Persist,
    /// The enemy is removed from the room right after its death event.
    Despawn,
}

impl DeadEnemyPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "persist" => Some(Self::Persist),
            "despawn" => Some(Self::Despawn),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EnemyTuning {
    /// Enemies seeded into every new room.
    pub count: usize,

    /// Movement speed in world units per second.
    pub speed: f32,

    /// Distance at which an enemy starts chasing the nearest player.
    pub chase_range: f32,

    pub max_hp: i32,

    /// Enemies spawn uniformly inside `[-extent, extent]` on both axes.
    pub spawn_half_extent: f32,

    /// Wander direction is re-rolled after a delay drawn from this window (ms).
    pub wander_interval_ms: RangeInclusive<u64>,

    pub dead_policy: DeadEnemyPolicy,
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            count: 6,
            speed: 2.0,
            chase_range: 12.0,
            max_hp: 50,
            spawn_half_extent: 20.0,
            wander_interval_ms: 800..=2000,
            dead_policy: DeadEnemyPolicy::Persist,
        }
    }
}
