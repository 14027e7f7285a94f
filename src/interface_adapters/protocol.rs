// Wire protocol DTOs and conversions for the public websocket.
// Frames are JSON text shaped as `{"type": <kind>, "data": {...}}` with camelCase fields.

use crate::domain::events::SimEvent;
use crate::domain::intent::{Action, MovementIntent};
use crate::domain::ports::Outbound;
use crate::domain::snapshot::{EnemySnapshot, PlayerSnapshot, ProjectileSnapshot, RoomSnapshot};
use crate::domain::state::Environment;
use crate::domain::tuning::FIREBALL;
use crate::domain::vector::Vec2;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Messages the client sends to the server over the WebSocket.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum ClientMessage {
    JoinRoom(JoinRoomPayload),
    Input(InputPayload),
    Action(ActionPayload),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRoomPayload {
    pub room_id: String,
    #[serde(default)]
    pub player_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Movement input. Numeric fields stay raw so a bad value only drops that field.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputPayload {
    pub room_id: String,
    #[serde(default)]
    pub vx: Option<Value>,
    #[serde(default)]
    pub vz: Option<Value>,
    #[serde(default)]
    pub rot_y: Option<Value>,
}

impl InputPayload {
    pub fn intent(&self) -> MovementIntent {
        MovementIntent {
            vx: number_field(self.vx.as_ref()),
            vz: number_field(self.vz.as_ref()),
            rot_y: number_field(self.rot_y.as_ref()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionPayload {
    pub room_id: String,
    #[serde(default)]
    pub actor_id: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub payload: Value,
}

impl ActionPayload {
    /// Maps the open-ended action channel onto the closed set of known actions.
    pub fn action(&self) -> Action {
        match self.kind.as_str() {
            "cast" => Action::Cast {
                spell_id: string_field(&self.payload, "spellId")
                    .unwrap_or_else(|| FIREBALL.to_string()),
                target_enemy_id: string_field(&self.payload, "targetEnemyId"),
            },
            "attack" => Action::Attack {
                target_enemy_id: string_field(&self.payload, "targetEnemyId"),
            },
            other => Action::Unrecognized {
                kind: other.to_string(),
            },
        }
    }
}

fn number_field(value: Option<&Value>) -> Option<f32> {
    value
        .and_then(Value::as_f64)
        .map(|n| n as f32)
        .filter(|n| n.is_finite())
}

fn string_field(payload: &Value, key: &str) -> Option<String> {
    payload
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Messages the server sends to connected clients over the WebSocket.
#[derive(Debug, Clone, Serialize)]
#[serde(
    tag = "type",
    content = "data",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum ServerMessage {
    Joined { room_id: String },
    Snapshot(SnapshotDto),
    Event(EventDto),
}

impl From<Outbound> for ServerMessage {
    fn from(outbound: Outbound) -> Self {
        match outbound {
            Outbound::Joined { room_id } => ServerMessage::Joined { room_id },
            Outbound::Snapshot(snapshot) => ServerMessage::Snapshot(snapshot.into()),
            Outbound::Event { t, room_id, event } => ServerMessage::Event(EventDto {
                t,
                room_id,
                kind: event.kind().to_string(),
                payload: event.into(),
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotDto {
    pub t: u64,
    pub room_id: String,
    pub players: Vec<PlayerStateDto>,
    pub enemies: Vec<EnemyStateDto>,
    pub projectiles: Vec<ProjectileStateDto>,
    pub env: EnvDto,
}

impl From<RoomSnapshot> for SnapshotDto {
    fn from(snapshot: RoomSnapshot) -> Self {
        Self {
            t: snapshot.t,
            room_id: snapshot.room_id,
            players: snapshot.players.into_iter().map(Into::into).collect(),
            enemies: snapshot.enemies.into_iter().map(Into::into).collect(),
            projectiles: snapshot.projectiles.into_iter().map(Into::into).collect(),
            env: snapshot.env.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStateDto {
    pub connection_id: String,
    pub player_id: String,
    pub name: String,
    pub x: f32,
    pub z: f32,
    pub rot_y: f32,
    pub hp: i32,
    pub max_hp: i32,
    pub mana: i32,
    pub max_mana: i32,
}

impl From<PlayerSnapshot> for PlayerStateDto {
    fn from(p: PlayerSnapshot) -> Self {
        Self {
            connection_id: p.connection_id,
            player_id: p.player_id,
            name: p.name,
            x: p.x,
            z: p.z,
            rot_y: p.rot_y,
            hp: p.hp,
            max_hp: p.max_hp,
            mana: p.mana,
            max_mana: p.max_mana,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnemyStateDto {
    pub id: String,
    pub x: f32,
    pub z: f32,
    pub rot_y: f32,
    pub state: &'static str,
    pub hp: i32,
    pub max_hp: i32,
}

impl From<EnemySnapshot> for EnemyStateDto {
    fn from(e: EnemySnapshot) -> Self {
        Self {
            id: e.id,
            x: e.x,
            z: e.z,
            rot_y: e.rot_y,
            state: e.state.as_str(),
            hp: e.hp,
            max_hp: e.max_hp,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectileStateDto {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub x: f32,
    pub z: f32,
    pub rot_y: f32,
    pub owner_id: String,
}

impl From<ProjectileSnapshot> for ProjectileStateDto {
    fn from(p: ProjectileSnapshot) -> Self {
        Self {
            id: p.id,
            kind: p.kind,
            x: p.x,
            z: p.z,
            rot_y: p.rot_y,
            owner_id: p.owner_id,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvDto {
    pub time_of_day: f32,
    pub weather: &'static str,
}

impl From<Environment> for EnvDto {
    fn from(env: Environment) -> Self {
        Self {
            time_of_day: env.time_of_day,
            weather: env.weather.as_str(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDto {
    pub t: u64,
    pub room_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub payload: EventPayloadDto,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct PointDto {
    pub x: f32,
    pub z: f32,
}

impl From<Vec2> for PointDto {
    fn from(v: Vec2) -> Self {
        Self { x: v.x, z: v.z }
    }
}

/// Event bodies; the discriminator travels next to them in `EventDto::kind`.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged, rename_all_fields = "camelCase")]
pub enum EventPayloadDto {
    PlayerJoined {
        player_id: String,
        connection_id: String,
        name: String,
    },
    PlayerLeft {
        player_id: String,
        connection_id: String,
    },
    CastStart {
        player_id: String,
        spell_id: String,
        target_enemy_id: Option<String>,
        finishes_at: u64,
    },
    CastFinish {
        player_id: String,
        spell_id: String,
        target_enemy_id: Option<String>,
    },
    SpellEffect {
        player_id: String,
        spell_id: String,
    },
    ProjectileSpawn {
        projectile_id: String,
        #[serde(rename = "type")]
        kind: String,
        owner_id: String,
        target_enemy_id: Option<String>,
        position: PointDto,
        velocity: PointDto,
    },
    ProjectileDespawn {
        projectile_id: String,
        reason: &'static str,
    },
    Hit {
        projectile_id: String,
        owner_id: String,
        enemy_id: String,
    },
    Damage {
        enemy_id: String,
        source_player_id: String,
        amount: i32,
        hp: i32,
        max_hp: i32,
    },
    EnemyDeath {
        enemy_id: String,
        killer_id: String,
    },
}

impl From<SimEvent> for EventPayloadDto {
    fn from(event: SimEvent) -> Self {
        match event {
            SimEvent::PlayerJoined {
                player_id,
                connection_id,
                name,
            } => Self::PlayerJoined {
                player_id,
                connection_id,
                name,
            },
            SimEvent::PlayerLeft {
                player_id,
                connection_id,
            } => Self::PlayerLeft {
                player_id,
                connection_id,
            },
            SimEvent::CastStart {
                player_id,
                spell_id,
                target_enemy_id,
                finishes_at,
            } => Self::CastStart {
                player_id,
                spell_id,
                target_enemy_id,
                finishes_at,
            },
            SimEvent::CastFinish {
                player_id,
                spell_id,
                target_enemy_id,
            } => Self::CastFinish {
                player_id,
                spell_id,
                target_enemy_id,
            },
            SimEvent::SpellEffect {
                player_id,
                spell_id,
            } => Self::SpellEffect {
                player_id,
                spell_id,
            },
            SimEvent::ProjectileSpawn {
                projectile_id,
                kind,
                owner_id,
                target_enemy_id,
                position,
                velocity,
            } => Self::ProjectileSpawn {
                projectile_id,
                kind,
                owner_id,
                target_enemy_id,
                position: position.into(),
                velocity: velocity.into(),
            },
            SimEvent::ProjectileDespawn {
                projectile_id,
                reason,
            } => Self::ProjectileDespawn {
                projectile_id,
                reason: reason.as_str(),
            },
            SimEvent::Hit {
                projectile_id,
                owner_id,
                enemy_id,
            } => Self::Hit {
                projectile_id,
                owner_id,
                enemy_id,
            },
            SimEvent::Damage {
                enemy_id,
                source_player_id,
                amount,
                hp,
                max_hp,
            } => Self::Damage {
                enemy_id,
                source_player_id,
                amount,
                hp,
                max_hp,
            },
            SimEvent::EnemyDeath {
                enemy_id,
                killer_id,
            } => Self::EnemyDeath {
                enemy_id,
                killer_id,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::events::DespawnReason;
    use crate::domain::state::Room;
    use serde_json::json;

    fn parse(value: Value) -> ClientMessage {
        serde_json::from_value(value).expect("client message should parse")
    }

    #[test]
    fn join_room_defaults_optional_identity() {
        let ClientMessage::JoinRoom(join) = parse(json!({
            "type": "joinRoom",
            "data": { "roomId": "r1" }
        })) else {
            panic!("expected joinRoom");
        };
        assert_eq!(join.room_id, "r1");
        assert!(join.player_id.is_none());
        assert!(join.name.is_none());
    }

    #[test]
    fn input_keeps_only_numeric_fields() {
        let ClientMessage::Input(input) = parse(json!({
            "type": "input",
            "data": { "roomId": "r1", "vx": 1, "vz": "fast", "rotY": null }
        })) else {
            panic!("expected input");
        };
        assert_eq!(
            input.intent(),
            MovementIntent {
                vx: Some(1.0),
                vz: None,
                rot_y: None,
            }
        );
    }

    #[test]
    fn cast_defaults_to_fireball() {
        let ClientMessage::Action(action) = parse(json!({
            "type": "action",
            "data": { "roomId": "r1", "type": "cast", "payload": { "targetEnemyId": "e1" } }
        })) else {
            panic!("expected action");
        };
        assert_eq!(
            action.action(),
            Action::Cast {
                spell_id: "fireball".into(),
                target_enemy_id: Some("e1".into()),
            }
        );
    }

    #[test]
    fn unknown_action_kind_is_unrecognized_not_an_error() {
        let ClientMessage::Action(action) = parse(json!({
            "type": "action",
            "data": { "roomId": "r1", "actorId": "p2", "type": "emote" }
        })) else {
            panic!("expected action");
        };
        assert_eq!(action.actor_id.as_deref(), Some("p2"));
        assert_eq!(
            action.action(),
            Action::Unrecognized {
                kind: "emote".into()
            }
        );
    }

    #[test]
    fn unknown_message_type_fails_to_parse() {
        let parsed = serde_json::from_value::<ClientMessage>(json!({
            "type": "teleport",
            "data": { "roomId": "r1" }
        }));
        assert!(parsed.is_err());
    }

    #[test]
    fn event_frames_carry_type_and_camel_case_payload() {
        let msg = ServerMessage::from(Outbound::Event {
            t: 10,
            room_id: "r1".into(),
            event: SimEvent::Damage {
                enemy_id: "e1".into(),
                source_player_id: "p1".into(),
                amount: 6,
                hp: 0,
                max_hp: 50,
            },
        });
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "event",
                "data": {
                    "t": 10,
                    "roomId": "r1",
                    "type": "damage",
                    "payload": {
                        "enemyId": "e1",
                        "sourcePlayerId": "p1",
                        "amount": 6,
                        "hp": 0,
                        "maxHp": 50
                    }
                }
            })
        );
    }

    #[test]
    fn despawn_reason_is_a_string() {
        let msg = ServerMessage::from(Outbound::Event {
            t: 1,
            room_id: "r1".into(),
            event: SimEvent::ProjectileDespawn {
                projectile_id: "p1-1".into(),
                reason: DespawnReason::Evicted,
            },
        });
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["data"]["type"], "projectile_despawn");
        assert_eq!(value["data"]["payload"]["reason"], "evicted");
    }

    #[test]
    fn snapshot_and_joined_frames_match_wire_shape() {
        let joined = serde_json::to_value(ServerMessage::from(Outbound::Joined {
            room_id: "r1".into(),
        }))
        .unwrap();
        assert_eq!(joined, json!({ "type": "joined", "data": { "roomId": "r1" } }));

        let room = Room::new("r1".into());
        let snapshot = serde_json::to_value(ServerMessage::from(Outbound::Snapshot(
            RoomSnapshot::capture(&room, 99),
        )))
        .unwrap();
        assert_eq!(snapshot["type"], "snapshot");
        assert_eq!(snapshot["data"]["t"], 99);
        assert_eq!(snapshot["data"]["roomId"], "r1");
        assert_eq!(snapshot["data"]["env"]["weather"], "clear");
        assert_eq!(snapshot["data"]["env"]["timeOfDay"], 12.0);
        assert!(snapshot["data"]["players"].as_array().unwrap().is_empty());
    }
}
