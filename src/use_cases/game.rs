use super::simulation::Simulation;
use super::types::GameEvent;
use crate::domain::ports::{Clock, Publisher};
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, trace};

/// The single serializing loop: inbound commands and ticks never interleave.
///
/// Commands are applied the moment they arrive; the interval drives the fixed-rate tick.
/// Returns once every command sender has been dropped.
pub async fn world_task<P, C>(
    mut input_rx: mpsc::Receiver<GameEvent>,
    mut sim: Simulation<P>,
    clock: C,
) where
    P: Publisher,
    C: Clock,
{
    let tick_interval = sim.tuning().tick_interval();
    let mut interval = tokio::time::interval(tick_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut tick: u64 = 0;
    let mut last_tick = Instant::now();
    info!(tick_ms = tick_interval.as_millis() as u64, "world task started");

    loop {
        tokio::select! {
            maybe_event = input_rx.recv() => {
                let Some(event) = maybe_event else {
                    break;
                };
                trace!(connection_id = event.connection_id(), "command");
                sim.handle(event, clock.now_ms());
            }
            _ = interval.tick() => {
                let started = Instant::now();
                let dt = started.duration_since(last_tick).as_secs_f32();
                last_tick = started;

                sim.tick(clock.now_ms(), dt);
                tick += 1;

                if tick % 300 == 0 {
                    debug!(
                        tick,
                        rooms = sim.registry().len(),
                        took_us = started.elapsed().as_micros() as u64,
                        "tick stats"
                    );
                }
            }
        }
    }

    info!(tick, "world task stopped");
}
