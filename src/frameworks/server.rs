// Framework bootstrap for the arena server runtime.

use crate::frameworks::config;
use crate::interface_adapters::http::health_handler;
use crate::interface_adapters::net::{BroadcastPublisher, outbound_serializer, ws_handler};
use crate::interface_adapters::state::{AppState, SystemClock};
use crate::use_cases::game::world_task;
use crate::use_cases::{GameEvent, Simulation};

use axum::{Router, routing::get};
use std::net::SocketAddr;
use std::{io::Result, sync::Arc};
use tokio::sync::{broadcast, mpsc};

fn init_runtime() {
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

pub async fn run(listener: tokio::net::TcpListener) -> Result<()> {
    let address = listener.local_addr()?;
    let state = build_state();

    let app = Router::new()
        .route("/ws", get(ws_handler))
        .route("/health", get(health_handler))
        .with_state(state);

    tracing::info!(%address, "listening");

    // Serve app and report errors rather than panicking
    axum::serve(listener, app).await.inspect_err(|e| {
        tracing::error!(error = %e, "server error");
    })
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();

    let address = SocketAddr::from(([127, 0, 0, 1], config::http_port()));

    // Bind TCP listener with error handling
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .inspect_err(|e| {
            tracing::error!(%address, error = %e, "failed to bind");
        })?;

    run(listener).await
}

fn build_state() -> Arc<AppState> {
    // input_tx/rx: every connection's commands go to the single world task.
    let (input_tx, input_rx) = mpsc::channel::<GameEvent>(config::INPUT_CHANNEL_CAPACITY);
    let (envelope_tx, envelope_rx) = broadcast::channel(config::OUTBOUND_BROADCAST_CAPACITY);
    let (frames_tx, _frames_rx) = broadcast::channel(config::OUTBOUND_BROADCAST_CAPACITY);

    let tuning = config::sim_tuning();
    tracing::debug!(
        tick_rate_hz = tuning.tick_rate_hz,
        max_dt_ms = tuning.max_dt.as_millis() as u64,
        enemies_per_room = tuning.enemy.count,
        max_projectiles_per_room = tuning.max_projectiles_per_room,
        dead_enemy_policy = ?tuning.enemy.dead_policy,
        "simulation configured"
    );
    let sim = Simulation::new(tuning, BroadcastPublisher::new(envelope_tx));

    // The serializer subscribes before the world task can publish anything.
    tokio::spawn(outbound_serializer(envelope_rx, frames_tx.clone()));
    tokio::spawn(world_task(input_rx, sim, SystemClock));

    Arc::new(AppState {
        input_tx,
        frames_tx,
    })
}
