use crate::domain::state::Environment;

const HOURS_PER_DAY: f32 = 24.0;

/// Advances the day clock; a non-positive day length freezes it.
pub fn advance(env: &mut Environment, dt: f32, day_length_secs: f32) {
    if day_length_secs <= 0.0 {
        return;
    }
    env.time_of_day =
        (env.time_of_day + HOURS_PER_DAY * dt / day_length_secs).rem_euclid(HOURS_PER_DAY);
}
