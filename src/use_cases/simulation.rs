// The simulation engine: the single owner of every room and the entry point for all mutations.

use crate::domain::events::SimEvent;
use crate::domain::intent::{Action, MovementIntent};
use crate::domain::ports::{Audience, Envelope, IdSource, Outbound, Publisher, SequentialIds};
use crate::domain::snapshot::RoomSnapshot;
use crate::domain::state::Player;
use crate::domain::systems::projectiles::ProjectileConfig;
use crate::domain::systems::{casts, enemy_ai, environment, movement, projectiles};
use crate::domain::tuning::SimTuning;
use crate::use_cases::ingest;
use crate::use_cases::registry::RoomRegistry;
use crate::use_cases::types::GameEvent;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

const DEFAULT_PLAYER_NAME: &str = "Player";
const MAX_NAME_CHARS: usize = 32;

pub struct Simulation<P> {
    tuning: SimTuning,
    registry: RoomRegistry,
    publisher: P,
    rng: StdRng,
    ids: Box<dyn IdSource>,
}

impl<P: Publisher> Simulation<P> {
    pub fn new(tuning: SimTuning, publisher: P) -> Self {
        Self {
            tuning,
            registry: RoomRegistry::new(),
            publisher,
            rng: StdRng::from_os_rng(),
            ids: Box::new(SequentialIds::default()),
        }
    }

    /// Replaces the OS-seeded rng so enemy placement and wandering are reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn with_ids(mut self, ids: impl IdSource + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    pub fn tuning(&self) -> &SimTuning {
        &self.tuning
    }

    pub fn registry(&self) -> &RoomRegistry {
        &self.registry
    }

    /// Dispatches one inbound command. Runs to completion before anything else touches state.
    pub fn handle(&mut self, event: GameEvent, now: u64) {
        match event {
            GameEvent::JoinRoom {
                connection_id,
                room_id,
                player_id,
                name,
            } => self.join_room(&connection_id, &room_id, player_id, name, now),
            GameEvent::Input {
                connection_id,
                room_id,
                intent,
            } => self.apply_input(&connection_id, &room_id, intent),
            GameEvent::Action {
                connection_id,
                room_id,
                actor_id,
                action,
            } => self.apply_action(&connection_id, &room_id, actor_id.as_deref(), action, now),
            GameEvent::Disconnect { connection_id } => self.leave(&connection_id, now),
        }
    }

    /// Registers a player in `room_id`, creating the room on first reference.
    ///
    /// A connection that is still bound to another room leaves it first. Joining the same
    /// room again replaces the player entry with a fresh one.
    pub fn join_room(
        &mut self,
        connection_id: &str,
        room_id: &str,
        player_id: Option<String>,
        name: Option<String>,
        now: u64,
    ) {
        if self
            .registry
            .room_of(connection_id)
            .is_some_and(|current| current != room_id)
        {
            self.leave(connection_id, now);
        }

        let player_id = player_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| connection_id.to_string());
        let name = display_name(name.as_deref());

        let Self {
            tuning,
            registry,
            publisher,
            rng,
            ..
        } = self;
        let publisher = &*publisher;
        let room = registry.get_or_create(room_id, &tuning.enemy, rng);
        room.players.insert(
            connection_id.to_string(),
            Player::new(
                connection_id.to_string(),
                player_id.clone(),
                name.clone(),
                tuning.player.max_hp,
                tuning.player.max_mana,
            ),
        );
        registry.bind(connection_id, room_id);
        info!(connection_id, room_id, player_id = %player_id, "player joined");

        publisher.publish(Envelope {
            audience: Audience::Connection(connection_id.to_string()),
            message: Outbound::Joined {
                room_id: room_id.to_string(),
            },
        });
        emit(
            publisher,
            room_id,
            now,
            SimEvent::PlayerJoined {
                player_id,
                connection_id: connection_id.to_string(),
                name,
            },
        );
    }

    /// Removes the connection's player from whichever room holds it; drops the room once empty.
    pub fn leave(&mut self, connection_id: &str, now: u64) {
        let Some(room_id) = self.registry.unbind(connection_id) else {
            return;
        };
        let removed = self
            .registry
            .get_mut(&room_id)
            .and_then(|room| room.players.remove(connection_id));

        if let Some(player) = removed {
            info!(connection_id, room_id = %room_id, player_id = %player.player_id, "player left");
            emit(
                &self.publisher,
                &room_id,
                now,
                SimEvent::PlayerLeft {
                    player_id: player.player_id,
                    connection_id: connection_id.to_string(),
                },
            );
        }
        self.registry.remove_if_empty(&room_id);
    }

    pub fn apply_input(&mut self, connection_id: &str, room_id: &str, intent: MovementIntent) {
        if let Some(room) = self.registry.get_mut(room_id) {
            ingest::apply_movement_intent(room, connection_id, intent);
        }
    }

    pub fn apply_action(
        &mut self,
        connection_id: &str,
        room_id: &str,
        actor_id: Option<&str>,
        action: Action,
        now: u64,
    ) {
        let Some(room) = self.registry.get_mut(room_id) else {
            debug!(connection_id, room_id, "action for unknown room");
            return;
        };
        let events = ingest::apply_action(room, actor_id, connection_id, action, &self.tuning, now);
        for event in events {
            emit(&self.publisher, room_id, now, event);
        }
    }

    /// Advances every room by `dt` seconds (clamped to the configured maximum) and
    /// publishes one snapshot per room.
    ///
    /// Per room: players move, enemies think and move, due casts resolve, projectiles
    /// fly and hit, the environment drifts. Events go out as soon as the step that raised
    /// them finishes, always ahead of the snapshot.
    pub fn tick(&mut self, now: u64, dt: f32) {
        let dt = if dt.is_finite() {
            dt.clamp(0.0, self.tuning.max_dt.as_secs_f32())
        } else {
            0.0
        };
        let Self {
            tuning,
            registry,
            publisher,
            rng,
            ids,
        } = self;
        let publisher = &*publisher;
        let projectile_cfg = ProjectileConfig {
            hit_radius: tuning.hit_radius,
            max_per_room: tuning.max_projectiles_per_room,
            dead_policy: tuning.enemy.dead_policy,
        };

        let mut events = Vec::new();
        for room in registry.rooms_mut() {
            movement::tick_players(room.players.values_mut(), tuning.player.speed, dt);
            enemy_ai::tick_enemies(room, &tuning.enemy, now, dt, rng);

            casts::tick_casts(
                room,
                &tuning.spells,
                &mut **ids,
                tuning.max_projectiles_per_room,
                now,
                &mut events,
            );
            flush(publisher, &room.id, now, &mut events);

            projectiles::tick_projectiles(
                &mut room.projectiles,
                &mut room.enemies,
                projectile_cfg,
                now,
                dt,
                &mut events,
            );
            flush(publisher, &room.id, now, &mut events);

            environment::advance(&mut room.env, dt, tuning.day_length_secs);

            publisher.publish(Envelope {
                audience: Audience::Room(room.id.clone()),
                message: Outbound::Snapshot(RoomSnapshot::capture(room, now)),
            });
        }
    }
}

fn display_name(raw: Option<&str>) -> String {
    let trimmed = raw.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return DEFAULT_PLAYER_NAME.to_string();
    }
    trimmed.chars().take(MAX_NAME_CHARS).collect()
}

fn emit<P: Publisher + ?Sized>(publisher: &P, room_id: &str, now: u64, event: SimEvent) {
    publisher.publish(Envelope {
        audience: Audience::Room(room_id.to_string()),
        message: Outbound::Event {
            t: now,
            room_id: room_id.to_string(),
            event,
        },
    });
}

fn flush<P: Publisher + ?Sized>(
    publisher: &P,
    room_id: &str,
    now: u64,
    events: &mut Vec<SimEvent>,
) {
    for event in events.drain(..) {
        emit(publisher, room_id, now, event);
    }
}
