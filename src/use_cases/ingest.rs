// Applies inbound intents to room state as soon as they arrive.
//
// Every path here is best-effort: missing rooms, players or targets make the call a no-op.

use crate::domain::events::SimEvent;
use crate::domain::intent::{Action, MovementIntent};
use crate::domain::state::Room;
use crate::domain::systems::{casts, combat};
use crate::domain::tuning::SimTuning;
use tracing::debug;

/// Overwrites the present fields of a player's movement intent.
pub fn apply_movement_intent(room: &mut Room, connection_id: &str, intent: MovementIntent) {
    let Some(player) = room.players.get_mut(connection_id) else {
        return;
    };

    if let Some(vx) = intent.vx.filter(|v| v.is_finite()) {
        player.velocity_intent.x = vx;
    }
    if let Some(vz) = intent.vz.filter(|v| v.is_finite()) {
        player.velocity_intent.z = vz;
    }
    if let Some(rot_y) = intent.rot_y.filter(|v| v.is_finite()) {
        player.rot_y = rot_y;
    }
}

/// Runs a discrete action for the resolved actor and returns the events it raised.
pub fn apply_action(
    room: &mut Room,
    actor_id: Option<&str>,
    connection_id: &str,
    action: Action,
    tuning: &SimTuning,
    now: u64,
) -> Vec<SimEvent> {
    let mut events = Vec::new();
    let Some(actor) = room.resolve_actor(actor_id, connection_id) else {
        debug!(connection_id, kind = action.kind(), "action without a resolvable actor");
        return events;
    };
    let Room {
        players, enemies, ..
    } = room;

    match action {
        Action::Cast {
            spell_id,
            target_enemy_id,
        } => {
            let started = players.get_mut(&actor).map(|p| {
                casts::start_cast(p, spell_id, target_enemy_id, &tuning.spells, now)
            });
            events.extend(started);
        }
        Action::Attack { target_enemy_id } => {
            let Some(target) = target_enemy_id else {
                return events;
            };
            let Some(source_player_id) = players.get(&actor).map(|p| p.player_id.clone()) else {
                return events;
            };
            combat::damage_enemy(
                enemies,
                &target,
                tuning.player.attack_damage,
                &source_player_id,
                tuning.enemy.dead_policy,
                &mut events,
            );
        }
        Action::Unrecognized { kind } => {
            debug!(connection_id, kind = %kind, "ignoring unrecognized action");
        }
    }
    events
}
