use crate::domain::state::RoomId;
use crate::interface_adapters::net::outbound::OutboundFrame;
use crate::interface_adapters::protocol::ClientMessage;
use crate::interface_adapters::state::AppState;
use crate::interface_adapters::utils::ids::next_connection_id;
use crate::use_cases::GameEvent;

use axum::{
    Error,
    extract::{
        State,
        ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade, close_code},
    },
    response::IntoResponse,
};
use futures::SinkExt;
use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::{broadcast, mpsc};
use tracing::{Instrument, debug, info, info_span, warn};

#[derive(Debug)]
enum NetError {
    // Categorizes connection lifecycle failures so callers can decide policy.
    #[allow(dead_code)]
    Ws(axum::Error),
    InputClosed,
    FramesClosed,
}

impl From<axum::Error> for NetError {
    fn from(e: axum::Error) -> Self {
        NetError::Ws(e)
    }
}

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let connection_id = next_connection_id();
    let span = info_span!("conn", conn_id = %connection_id);
    serve_connection(socket, state, connection_id)
        .instrument(span)
        .await;
}

async fn serve_connection(mut socket: WebSocket, state: Arc<AppState>, connection_id: String) {
    // Subscribe before anything else so no frame addressed to this connection is missed.
    let mut ctx = ConnCtx::new(
        connection_id,
        state.input_tx.clone(),
        state.frames_tx.subscribe(),
    );
    info!("client connected");

    if let Err(e) = run_client_loop(&mut socket, &mut ctx).await {
        warn!(error = ?e, "client loop exited with error");
    }
}

struct ConnCtx {
    pub connection_id: String,
    pub input_tx: mpsc::Sender<GameEvent>,
    pub frames_rx: broadcast::Receiver<OutboundFrame>,
    // Room whose frames this socket forwards; set as soon as a join is sent to the world task.
    pub room_id: Option<RoomId>,

    pub msgs_in: u64,
    pub msgs_out: u64,
    pub bytes_in: u64,
    pub bytes_out: u64,
    pub frames_missed: u64,

    pub invalid_json: u32,

    pub last_input_full_log: Instant,
    pub last_frames_lag_log: Instant,
    pub last_invalid_input_log: Instant,

    pub close_frame: Option<CloseFrame>,
}

impl ConnCtx {
    fn new(
        connection_id: String,
        input_tx: mpsc::Sender<GameEvent>,
        frames_rx: broadcast::Receiver<OutboundFrame>,
    ) -> Self {
        let now = Instant::now() - LOG_THROTTLE;
        Self {
            connection_id,
            input_tx,
            frames_rx,
            room_id: None,

            msgs_in: 0,
            msgs_out: 0,
            bytes_in: 0,
            bytes_out: 0,
            frames_missed: 0,

            invalid_json: 0,

            last_input_full_log: now,
            last_frames_lag_log: now,
            last_invalid_input_log: now,

            close_frame: None,
        }
    }

    fn accepts(&self, frame: &OutboundFrame) -> bool {
        frame.is_for(&self.connection_id, self.room_id.as_deref())
    }
}

enum LoopControl {
    Continue,
    Disconnect,
}

const LOG_THROTTLE: Duration = Duration::from_secs(2);
const MAX_INVALID_JSON: u32 = 10;

fn should_log(last: &mut Instant) -> bool {
    if last.elapsed() >= LOG_THROTTLE {
        *last = Instant::now();
        true
    } else {
        false
    }
}

async fn run_client_loop(socket: &mut WebSocket, ctx: &mut ConnCtx) -> Result<(), NetError> {
    let mut fatal: Option<NetError> = None;

    loop {
        // disconnect becomes true on error
        let disconnect: bool = tokio::select! {
            incoming = socket.recv() => {
                match handle_incoming_ws(incoming, ctx).await {
                    Ok(LoopControl::Continue) => false,
                    Ok(LoopControl::Disconnect) => true,
                    Err(e) => {
                        fatal = Some(e);
                        true
                    }
                }
            }

            frame = ctx.frames_rx.recv() => {
                match frame {
                    Ok(frame) => match forward_frame(frame, socket, ctx).await {
                        LoopControl::Continue => false,
                        LoopControl::Disconnect => true,
                    },
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        // The next snapshot carries the full room state again.
                        ctx.frames_missed += n;
                        if should_log(&mut ctx.last_frames_lag_log) {
                            warn!(missed = n, "outbound frames lagged; waiting for next snapshot");
                        }
                        false
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        fatal = Some(NetError::FramesClosed);
                        true
                    }
                }
            }
        };

        if disconnect {
            if let Some(frame) = ctx.close_frame.take() {
                let _ = socket.send(Message::Close(Some(frame))).await;
            }
            if let Err(err) = socket.close().await.map_err(NetError::Ws) {
                debug!(error = ?err, "socket close error");
            }
            break;
        }
    }

    if let Err(e) = disconnect_cleanup(ctx).await {
        warn!(error = ?e, "error during disconnect cleanup");
        if fatal.is_none() {
            fatal = Some(e);
        }
    }

    match fatal {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

async fn handle_incoming_ws(
    incoming: Option<Result<Message, Error>>,
    ctx: &mut ConnCtx,
) -> Result<LoopControl, NetError> {
    match incoming {
        Some(Ok(msg)) => match msg {
            Message::Text(text) => {
                ctx.msgs_in += 1;
                ctx.bytes_in += text.len() as u64;

                match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(message) => dispatch(message, ctx).await,
                    Err(parse_err) => {
                        ctx.invalid_json += 1;
                        if should_log(&mut ctx.last_invalid_input_log) {
                            warn!(
                                bytes = text.len(),
                                error = %parse_err,
                                "failed to parse client message"
                            );
                        }

                        if ctx.invalid_json > MAX_INVALID_JSON {
                            ctx.close_frame = Some(CloseFrame {
                                code: close_code::POLICY,
                                reason: "too many invalid messages".into(),
                            });
                            return Ok(LoopControl::Disconnect);
                        }

                        Ok(LoopControl::Continue)
                    }
                }
            }
            Message::Binary(_) => {
                ctx.close_frame = Some(CloseFrame {
                    code: close_code::UNSUPPORTED,
                    reason: "binary messages not supported".into(),
                });
                Ok(LoopControl::Disconnect)
            }
            Message::Ping(_) | Message::Pong(_) => Ok(LoopControl::Continue),
            Message::Close(_) => Ok(LoopControl::Disconnect),
        },
        Some(Err(e)) => {
            warn!(error = %e, "websocket recv error");
            Ok(LoopControl::Disconnect)
        }
        None => {
            info!("websocket closed");
            Ok(LoopControl::Disconnect)
        }
    }
}

async fn dispatch(message: ClientMessage, ctx: &mut ConnCtx) -> Result<LoopControl, NetError> {
    let connection_id = ctx.connection_id.clone();
    match message {
        ClientMessage::JoinRoom(join) => {
            ctx.input_tx
                .send(GameEvent::JoinRoom {
                    connection_id,
                    room_id: join.room_id.clone(),
                    player_id: join.player_id,
                    name: join.name,
                })
                .await
                .map_err(|_| NetError::InputClosed)?;
            // Joins always succeed, and the ack rides the lossy frame stream.
            ctx.room_id = Some(join.room_id);
            Ok(LoopControl::Continue)
        }
        ClientMessage::Input(input) => {
            let event = GameEvent::Input {
                connection_id,
                intent: input.intent(),
                room_id: input.room_id,
            };
            // Movement is superseded by the next input, so a full channel just drops it.
            match ctx.input_tx.try_send(event) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(mpsc::error::TrySendError::Full(_evt)) => {
                    if should_log(&mut ctx.last_input_full_log) {
                        warn!("input channel full; dropping input");
                    }
                    Ok(LoopControl::Continue)
                }
                Err(mpsc::error::TrySendError::Closed(_evt)) => Err(NetError::InputClosed),
            }
        }
        ClientMessage::Action(action) => {
            ctx.input_tx
                .send(GameEvent::Action {
                    connection_id,
                    action: action.action(),
                    room_id: action.room_id,
                    actor_id: action.actor_id,
                })
                .await
                .map_err(|_| NetError::InputClosed)?;
            Ok(LoopControl::Continue)
        }
    }
}

async fn forward_frame(
    frame: OutboundFrame,
    socket: &mut WebSocket,
    ctx: &mut ConnCtx,
) -> LoopControl {
    if !ctx.accepts(&frame) {
        return LoopControl::Continue;
    }

    let bytes_len = frame.bytes.len();
    match socket
        .send(Message::Text(frame.bytes))
        .await
        .map_err(NetError::Ws)
    {
        Ok(()) => {
            ctx.msgs_out += 1;
            ctx.bytes_out += bytes_len as u64;
            LoopControl::Continue
        }
        Err(err) => {
            // Log unexpected send failures; disconnect will follow immediately.
            warn!(error = ?err, "failed to send frame");
            LoopControl::Disconnect
        }
    }
}

async fn disconnect_cleanup(ctx: &ConnCtx) -> Result<(), NetError> {
    ctx.input_tx
        .send(GameEvent::Disconnect {
            connection_id: ctx.connection_id.clone(),
        })
        .await
        .map_err(|_| NetError::InputClosed)?;

    debug!(
        msgs_in = ctx.msgs_in,
        msgs_out = ctx.msgs_out,
        bytes_in = ctx.bytes_in,
        bytes_out = ctx.bytes_out,
        invalid_json = ctx.invalid_json,
        frames_missed = ctx.frames_missed,
        room_id = ?ctx.room_id,
        "connection stats"
    );
    info!("client disconnected");
    Ok(())
}
