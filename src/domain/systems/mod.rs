// Per-tick simulation systems. Each one mutates room state and appends the events it raises.

pub mod casts;
pub mod combat;
pub mod enemy_ai;
pub mod environment;
pub mod movement;
pub mod projectiles;
