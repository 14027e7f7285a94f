// Use cases layer: room lifecycle, intent ingestion and the fixed-rate world loop.

pub mod game;
pub mod ingest;
pub mod registry;
pub mod simulation;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use registry::RoomRegistry;
pub use simulation::Simulation;
pub use types::GameEvent;
