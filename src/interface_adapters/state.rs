use crate::domain::ports::Clock;
use crate::interface_adapters::net::OutboundFrame;
use crate::use_cases::GameEvent;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::{broadcast, mpsc};

#[derive(Clone)]
pub struct AppState {
    // Commands flowing from the network into the world task.
    pub input_tx: mpsc::Sender<GameEvent>,
    // Serialized envelopes, shared across all connections.
    pub frames_tx: broadcast::Sender<OutboundFrame>,
}

// System clock used by the world task in production.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}
