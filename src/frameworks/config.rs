use crate::domain::tuning::{DeadEnemyPolicy, SimTuning};
use std::{env, str::FromStr, time::Duration};
use tracing::warn;

// Runtime/server constants (not gameplay tuning).

pub const INPUT_CHANNEL_CAPACITY: usize = 1024;
pub const OUTBOUND_BROADCAST_CAPACITY: usize = 1024;

pub fn http_port() -> u16 {
    parse_var(&env_var, "PORT").unwrap_or(3000)
}

/// Gameplay tuning with environment overrides applied on top of the defaults.
pub fn sim_tuning() -> SimTuning {
    sim_tuning_from(env_var)
}

fn sim_tuning_from(var: impl Fn(&str) -> Option<String>) -> SimTuning {
    let mut tuning = SimTuning::default();

    if let Some(hz) = parse_var::<u32>(&var, "TICK_RATE_HZ").filter(|hz| *hz > 0) {
        tuning.tick_rate_hz = hz;
    }
    if let Some(secs) =
        parse_var::<f64>(&var, "MAX_TICK_DT_SECS").filter(|s| s.is_finite() && *s > 0.0)
    {
        tuning.max_dt = Duration::from_secs_f64(secs);
    }
    if let Some(count) = parse_var(&var, "ENEMY_COUNT") {
        tuning.enemy.count = count;
    }
    if let Some(max) = parse_var(&var, "MAX_PROJECTILES_PER_ROOM") {
        tuning.max_projectiles_per_room = max;
    }
    if let Some(raw) = var("DEAD_ENEMY_POLICY") {
        match DeadEnemyPolicy::parse(&raw) {
            Some(policy) => tuning.enemy.dead_policy = policy,
            None => warn!(value = %raw, "unknown DEAD_ENEMY_POLICY; keeping default"),
        }
    }

    tuning
}

fn env_var(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn parse_var<T: FromStr>(var: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = var(key)?;
    let parsed = raw.trim().parse().ok();
    if parsed.is_none() {
        warn!(key, value = %raw, "ignoring unparsable environment value");
    }
    parsed
}
