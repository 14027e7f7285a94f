use crate::domain::events::SimEvent;
use crate::domain::ports::IdSource;
use crate::domain::state::{CastEntry, Enemy, Player, Projectile, Room};
use crate::domain::systems::projectiles;
use crate::domain::tuning::{ProjectileTuning, SpellBook};

/// Queues a cast and returns the `cast_start` event for it.
///
/// Casts never interrupt each other and cost nothing; any number may be in flight.
pub fn start_cast(
    player: &mut Player,
    spell_id: String,
    target_enemy_id: Option<String>,
    spells: &SpellBook,
    now: u64,
) -> SimEvent {
    let finishes_at = now + spells.cast_time_ms(&spell_id);
    player.casts.push(CastEntry {
        spell_id: spell_id.clone(),
        target_enemy_id: target_enemy_id.clone(),
        started_at: now,
        finishes_at,
    });

    SimEvent::CastStart {
        player_id: player.player_id.clone(),
        spell_id,
        target_enemy_id,
        finishes_at,
    }
}

/// Resolves every cast whose timer has elapsed, in queue order.
pub fn tick_casts(
    room: &mut Room,
    spells: &SpellBook,
    ids: &mut dyn IdSource,
    max_projectiles: usize,
    now: u64,
    events: &mut Vec<SimEvent>,
) {
    let Room {
        players,
        enemies,
        projectiles: store,
        ..
    } = room;

    for player in players.values_mut() {
        if player.casts.is_empty() {
            continue;
        }
        let (due, pending): (Vec<CastEntry>, Vec<CastEntry>) =
            std::mem::take(&mut player.casts)
                .into_iter()
                .partition(|cast| cast.is_due(now));
        player.casts = pending;

        for cast in due {
            events.push(SimEvent::CastFinish {
                player_id: player.player_id.clone(),
                spell_id: cast.spell_id.clone(),
                target_enemy_id: cast.target_enemy_id.clone(),
            });

            let Some(tuning) = spells.get(&cast.spell_id).and_then(|spell| spell.projectile)
            else {
                continue;
            };

            let target = cast
                .target_enemy_id
                .as_deref()
                .and_then(|id| enemies.get(id));
            match target {
                Some(enemy) => {
                    let projectile = launch(player, enemy, &cast.spell_id, tuning, ids, now);
                    projectiles::spawn_projectile(store, projectile, max_projectiles, events);
                }
                None => events.push(SimEvent::SpellEffect {
                    player_id: player.player_id.clone(),
                    spell_id: cast.spell_id,
                }),
            }
        }
    }
}

// Aims at where the target is now, not where it was when the cast started.
fn launch(
    caster: &Player,
    target: &Enemy,
    spell_id: &str,
    tuning: ProjectileTuning,
    ids: &mut dyn IdSource,
    now: u64,
) -> Projectile {
    let dir = (target.position - caster.position).normalize_or_zero();
    Projectile {
        id: ids.next_projectile_id(&caster.player_id),
        kind: spell_id.to_string(),
        position: caster.position,
        velocity: dir * tuning.speed,
        rot_y: dir.heading(),
        owner_id: caster.player_id.clone(),
        target_enemy_id: Some(target.id.clone()),
        created_at: now,
        expires_at: now + tuning.lifetime_ms,
        damage: tuning.damage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::SequentialIds;
    use crate::domain::tuning::{FIREBALL, SpellTuning};
    use crate::domain::vector::Vec2;

    fn room() -> Room {
        let mut room = Room::new("r1".into());
        room.players.insert(
            "c1".into(),
            Player::new("c1".into(), "p1".into(), "P1".into(), 100, 100),
        );
        room.enemies.insert(
            "e1".into(),
            Enemy::new("e1".into(), Vec2::new(0.0, 10.0), 50),
        );
        room
    }

    fn kinds(events: &[SimEvent]) -> Vec<&'static str> {
        events.iter().map(SimEvent::kind).collect()
    }

    #[test]
    fn cast_resolves_only_once_its_deadline_passes() {
        let mut room = room();
        let spells = SpellBook::default();
        let mut ids = SequentialIds::default();
        let start = start_cast(
            room.players.get_mut("c1").unwrap(),
            FIREBALL.into(),
            Some("e1".into()),
            &spells,
            1_000,
        );
        assert!(matches!(start, SimEvent::CastStart { finishes_at: 1_650, .. }));

        let mut events = Vec::new();
        tick_casts(&mut room, &spells, &mut ids, 200, 1_649, &mut events);
        assert!(events.is_empty());
        assert_eq!(room.players["c1"].casts.len(), 1);

        tick_casts(&mut room, &spells, &mut ids, 200, 1_650, &mut events);
        assert_eq!(kinds(&events), ["cast_finish", "projectile_spawn"]);
        assert!(room.players["c1"].casts.is_empty());

        let projectile = room.projectiles.iter().next().unwrap();
        assert_eq!(projectile.target_enemy_id.as_deref(), Some("e1"));
        assert_eq!(projectile.owner_id, "p1");
        assert_eq!(projectile.expires_at, 1_650 + 2_000);
        assert_eq!(projectile.velocity, Vec2::new(0.0, 14.0));
    }

    #[test]
    fn projectile_aims_at_target_position_at_finish_time() {
        let mut room = room();
        let spells = SpellBook::default();
        let mut ids = SequentialIds::default();
        start_cast(
            room.players.get_mut("c1").unwrap(),
            FIREBALL.into(),
            Some("e1".into()),
            &spells,
            0,
        );
        room.enemies.get_mut("e1").unwrap().position = Vec2::new(5.0, 0.0);

        let mut events = Vec::new();
        tick_casts(&mut room, &spells, &mut ids, 200, 650, &mut events);

        let projectile = room.projectiles.iter().next().unwrap();
        assert_eq!(projectile.velocity, Vec2::new(14.0, 0.0));
    }

    #[test]
    fn fireball_without_target_is_a_spell_effect() {
        let mut room = room();
        let spells = SpellBook::default();
        let mut ids = SequentialIds::default();
        let player = room.players.get_mut("c1").unwrap();
        start_cast(player, FIREBALL.into(), None, &spells, 0);
        start_cast(player, FIREBALL.into(), Some("e404".into()), &spells, 0);

        let mut events = Vec::new();
        tick_casts(&mut room, &spells, &mut ids, 200, 650, &mut events);

        assert_eq!(
            kinds(&events),
            ["cast_finish", "spell_effect", "cast_finish", "spell_effect"]
        );
        assert!(room.projectiles.is_empty());
    }

    #[test]
    fn due_casts_resolve_in_queue_order_and_pending_ones_stay() {
        let mut room = room();
        let mut spells = SpellBook::default();
        spells.insert(
            "blink",
            SpellTuning {
                cast_time_ms: 100,
                projectile: None,
            },
        );
        let mut ids = SequentialIds::default();
        let player = room.players.get_mut("c1").unwrap();
        start_cast(player, FIREBALL.into(), Some("e1".into()), &spells, 0);
        start_cast(player, "blink".into(), None, &spells, 0);
        start_cast(player, "blink".into(), None, &spells, 500);

        let mut events = Vec::new();
        tick_casts(&mut room, &spells, &mut ids, 200, 650, &mut events);

        assert_eq!(
            kinds(&events),
            ["cast_finish", "projectile_spawn", "cast_finish", "cast_finish"]
        );
        assert!(room.players["c1"].casts.is_empty());

        let mut events = Vec::new();
        start_cast(
            room.players.get_mut("c1").unwrap(),
            "blink".into(),
            None,
            &spells,
            700,
        );
        tick_casts(&mut room, &spells, &mut ids, 200, 750, &mut events);
        assert!(events.is_empty());
        assert_eq!(room.players["c1"].casts.len(), 1);
    }

    #[test]
    fn unknown_spell_uses_default_cast_time() {
        let mut room = room();
        let spells = SpellBook::default();
        let event = start_cast(
            room.players.get_mut("c1").unwrap(),
            "mystery".into(),
            None,
            &spells,
            10,
        );
        assert!(matches!(event, SimEvent::CastStart { finishes_at: 660, .. }));
    }
}
