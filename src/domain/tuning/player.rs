/// Gameplay tuning for player avatars.
///
/// Keep this separate from runtime/server configuration (ports, channel sizes, etc.).

#[derive(Debug, Clone, Copy)]
pub struct PlayerTuning {
    /// Movement speed in world units per second at full intent.
    pub speed: f32,

    /// Health a player spawns with.
    pub max_hp: i32,

    /// Mana pool size. Tracked for clients; nothing spends it yet.
    pub max_mana: i32,

    /// Instant damage dealt by the `attack` action.
    pub attack_damage: i32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            speed: 4.0,
            max_hp: 100,
            max_mana: 100,
            attack_damage: 6,
        }
    }
}
