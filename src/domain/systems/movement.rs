use crate::domain::state::Player;

/// Integrates one player's position from its movement intent.
///
/// Intents longer than one unit are clamped so a client cannot outrun `speed`.
pub fn tick_player(p: &mut Player, speed: f32, dt: f32) {
    let dir = p.velocity_intent.clamp_length(1.0);
    p.position += dir * speed * dt;
}

pub fn tick_players<'a>(
    players: impl IntoIterator<Item = &'a mut Player>,
    speed: f32,
    dt: f32,
) {
    for p in players {
        tick_player(p, speed, dt);
    }
}
