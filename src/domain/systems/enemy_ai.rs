use crate::domain::state::{Enemy, EnemyState, Room};
use crate::domain::tuning::EnemyTuning;
use crate::domain::vector::Vec2;
use rand::Rng;
use std::f32::consts::TAU;
use std::ops::RangeInclusive;

/// Nearest position by squared planar distance. Ties keep the first one seen.
pub fn nearest(from: Vec2, candidates: impl IntoIterator<Item = Vec2>) -> Option<(Vec2, f32)> {
    let mut best: Option<(Vec2, f32)> = None;
    for pos in candidates {
        let d2 = from.distance_squared(pos);
        if best.is_none_or(|(_, best_d2)| d2 < best_d2) {
            best = Some((pos, d2));
        }
    }
    best
}

/// Runs the idle/wander/chase state machine for every enemy in the room, then integrates.
pub fn tick_enemies<R: Rng + ?Sized>(
    room: &mut Room,
    cfg: &EnemyTuning,
    now: u64,
    dt: f32,
    rng: &mut R,
) {
    let player_positions: Vec<Vec2> = room.players.values().map(|p| p.position).collect();
    for enemy in room.enemies.values_mut() {
        let target = nearest(enemy.position, player_positions.iter().copied());
        tick_enemy(enemy, target, cfg, now, dt, rng);
    }
}

pub fn tick_enemy<R: Rng + ?Sized>(
    enemy: &mut Enemy,
    target: Option<(Vec2, f32)>,
    cfg: &EnemyTuning,
    now: u64,
    dt: f32,
    rng: &mut R,
) {
    match target {
        None => {
            enemy.state = EnemyState::Idle;
            enemy.velocity = Vec2::ZERO;
        }
        Some((player_pos, d2)) if d2 <= cfg.chase_range * cfg.chase_range => {
            enemy.state = EnemyState::Chase;
            enemy.velocity = (player_pos - enemy.position).normalize_or_zero();
            enemy.rot_y = enemy.velocity.heading();
        }
        Some(_) => {
            enemy.state = EnemyState::Wander;
            if now >= enemy.next_wander_at {
                enemy.velocity = Vec2::from_heading(rng.random_range(0.0..TAU));
                enemy.next_wander_at = now + wander_delay(rng, &cfg.wander_interval_ms);
            }
            enemy.rot_y = enemy.velocity.heading();
        }
    }

    enemy.position += enemy.velocity * cfg.speed * dt;
}

fn wander_delay<R: Rng + ?Sized>(rng: &mut R, window: &RangeInclusive<u64>) -> u64 {
    let (lo, hi) = (*window.start(), *window.end());
    if lo >= hi { lo } else { rng.random_range(lo..=hi) }
}
