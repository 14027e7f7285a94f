//! Gameplay tuning for castable spells and the projectiles they launch.

use std::collections::HashMap;

pub const FIREBALL: &str = "fireball";

/// Per-spell timings. Spells with `projectile: None` resolve without spawning anything.
#[derive(Debug, Clone, Copy)]
pub struct SpellTuning {
    /// Delay between `cast_start` and `cast_finish` in milliseconds.
    pub cast_time_ms: u64,

    pub projectile: Option<ProjectileTuning>,
}

#[derive(Debug, Clone, Copy)]
pub struct ProjectileTuning {
    /// Travel speed in world units per second.
    pub speed: f32,

    /// Lifetime in milliseconds before the projectile expires.
    pub lifetime_ms: u64,

    pub damage: i32,
}

#[derive(Debug, Clone)]
pub struct SpellBook {
    spells: HashMap<String, SpellTuning>,
    /// Cast time used for spell ids that are not in the book.
    pub default_cast_time_ms: u64,
}

impl SpellBook {
    pub fn get(&self, spell_id: &str) -> Option<&SpellTuning> {
        self.spells.get(spell_id)
    }

    pub fn cast_time_ms(&self, spell_id: &str) -> u64 {
        self.get(spell_id)
            .map(|spell| spell.cast_time_ms)
            .unwrap_or(self.default_cast_time_ms)
    }

    pub fn insert(&mut self, spell_id: impl Into<String>, spell: SpellTuning) {
        self.spells.insert(spell_id.into(), spell);
    }
}

impl Default for SpellBook {
    fn default() -> Self {
        let mut spells = HashMap::new();
        spells.insert(
            FIREBALL.to_string(),
            SpellTuning {
                cast_time_ms: 650,
                projectile: Some(ProjectileTuning {
                    speed: 14.0,
                    lifetime_ms: 2000,
                    damage: 12,
                }),
            },
        );
        Self {
            spells,
            default_cast_time_ms: 650,
        }
    }
}
