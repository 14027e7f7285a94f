use std::sync::{Arc, Mutex};

use crate::domain::SimEvent;
use crate::domain::ports::{Audience, Clock, Envelope, Outbound, Publisher};
use crate::domain::snapshot::RoomSnapshot;

// Shared fixed time source for deterministic use-case tests.
pub(crate) struct FixedClock(pub(crate) u64);

impl Clock for FixedClock {
    fn now_ms(&self) -> u64 {
        self.0
    }
}

/// Publisher that keeps every envelope so tests can inspect the outbound stream.
#[derive(Clone, Default)]
pub(crate) struct RecordingPublisher {
    sent: Arc<Mutex<Vec<Envelope>>>,
}

impl RecordingPublisher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn envelopes(&self) -> Vec<Envelope> {
        self.sent.lock().expect("publisher mutex poisoned").clone()
    }

    pub(crate) fn clear(&self) {
        self.sent.lock().expect("publisher mutex poisoned").clear();
    }

    /// Events in publish order, with the room they were addressed to.
    pub(crate) fn events(&self) -> Vec<(String, SimEvent)> {
        self.envelopes()
            .into_iter()
            .filter_map(|envelope| match envelope.message {
                Outbound::Event { room_id, event, .. } => Some((room_id, event)),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn event_kinds(&self) -> Vec<&'static str> {
        self.events().iter().map(|(_, event)| event.kind()).collect()
    }

    pub(crate) fn snapshots(&self) -> Vec<RoomSnapshot> {
        self.envelopes()
            .into_iter()
            .filter_map(|envelope| match envelope.message {
                Outbound::Snapshot(snapshot) => Some(snapshot),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn sent_to(&self, audience: &Audience) -> Vec<Outbound> {
        self.envelopes()
            .into_iter()
            .filter(|envelope| envelope.audience == *audience)
            .map(|envelope| envelope.message)
            .collect()
    }
}

impl Publisher for RecordingPublisher {
    fn publish(&self, envelope: Envelope) {
        let mut guard = self.sent.lock().expect("publisher mutex poisoned");
        guard.push(envelope);
    }
}
