// Gameplay tuning grouped per concern; `SimTuning` bundles it for the engine.

pub mod enemy;
pub mod player;
pub mod spell;

pub use enemy::{DeadEnemyPolicy, EnemyTuning};
pub use player::PlayerTuning;
pub use spell::{FIREBALL, ProjectileTuning, SpellBook, SpellTuning};

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct SimTuning {
    /// Ticks per second for the fixed-rate loop.
    pub tick_rate_hz: u32,

    /// Upper bound for the per-tick delta, absorbing scheduler stalls.
    pub max_dt: Duration,

    /// Projectile count per room above which the oldest one is evicted.
    pub max_projectiles_per_room: usize,

    /// Distance at which a projectile connects with its target.
    pub hit_radius: f32,

    /// Real seconds for a full environment day cycle.
    pub day_length_secs: f32,

    pub player: PlayerTuning,
    pub enemy: EnemyTuning,
    pub spells: SpellBook,
}

impl SimTuning {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.tick_rate_hz.max(1)))
    }
}

impl Default for SimTuning {
    fn default() -> Self {
        Self {
            tick_rate_hz: 15,
            max_dt: Duration::from_millis(250),
            max_projectiles_per_room: 200,
            hit_radius: 0.6,
            day_length_secs: 600.0,
            player: PlayerTuning::default(),
            enemy: EnemyTuning::default(),
            spells: SpellBook::default(),
        }
    }
}
