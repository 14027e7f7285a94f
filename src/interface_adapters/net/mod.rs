// Network adapter modules: websocket clients and the shared outbound fan-out.

pub mod client;
pub mod outbound;

pub use client::ws_handler;
pub use outbound::{BroadcastPublisher, OutboundFrame, outbound_serializer};
