// Outbound side of the transport: the engine publishes envelopes, a serializer encodes each one
// once, and every socket filters the shared frames by audience.

use crate::domain::ports::{Audience, Envelope, Publisher};
use crate::interface_adapters::protocol::ServerMessage;
use axum::extract::ws::Utf8Bytes;
use tokio::sync::broadcast;
use tracing::{error, warn};

/// A serialized envelope shared by every socket.
#[derive(Debug, Clone)]
pub struct OutboundFrame {
    pub audience: Audience,
    pub bytes: Utf8Bytes,
}

impl OutboundFrame {
    /// True when a socket for `connection_id`, currently in `room_id`, should forward this frame.
    pub fn is_for(&self, connection_id: &str, room_id: Option<&str>) -> bool {
        match &self.audience {
            Audience::Connection(target) => target == connection_id,
            Audience::Room(target) => room_id == Some(target.as_str()),
        }
    }
}

/// `Publisher` backed by a broadcast channel. Publishing never blocks the world task.
#[derive(Clone)]
pub struct BroadcastPublisher {
    tx: broadcast::Sender<Envelope>,
}

impl BroadcastPublisher {
    pub fn new(tx: broadcast::Sender<Envelope>) -> Self {
        Self { tx }
    }
}

impl Publisher for BroadcastPublisher {
    fn publish(&self, envelope: Envelope) {
        // No subscribers just means the serializer has not started or has exited.
        let _ = self.tx.send(envelope);
    }
}

pub fn encode(envelope: Envelope) -> Result<OutboundFrame, serde_json::Error> {
    let msg = ServerMessage::from(envelope.message);
    let txt = serde_json::to_string(&msg)?;
    Ok(OutboundFrame {
        audience: envelope.audience,
        bytes: Utf8Bytes::from(txt),
    })
}

pub async fn outbound_serializer(
    mut envelope_rx: broadcast::Receiver<Envelope>,
    frames_tx: broadcast::Sender<OutboundFrame>,
) {
    // Serialize each envelope once and broadcast the shared bytes.
    loop {
        match envelope_rx.recv().await {
            Ok(envelope) => {
                let frame = match encode(envelope) {
                    Ok(frame) => frame,
                    Err(e) => {
                        error!(error = ?e, "failed to serialize outbound message");
                        continue;
                    }
                };
                let _ = frames_tx.send(frame);
            }
            Err(broadcast::error::RecvError::Lagged(n)) => {
                warn!(missed = n, "outbound serializer lagged; skipping ahead");
            }
            Err(broadcast::error::RecvError::Closed) => {
                warn!("outbound channel closed; serializer exiting");
                break;
            }
        }
    }
}
