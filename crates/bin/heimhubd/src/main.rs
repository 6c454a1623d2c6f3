//! # heimhubd — hub daemon
//!
//! Composition root that wires the bus, registry, sink, and HTTP server
//! together.
//!
//! ## Responsibilities
//! - Parse configuration (TOML file, env vars)
//! - Connect to the MQTT broker and subscribe to the device topics
//! - Initialize the `SQLite` sink (optional) and run migrations
//! - Construct the hub service over the port traits
//! - Drain inbound bus messages in one dedicated task
//! - Serve the HTTP API with graceful shutdown (SIGINT or `/api/shutdown`)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use heimhub_adapter_http_axum::router;
use heimhub_adapter_http_axum::state::AppState;
use heimhub_adapter_mqtt::MqttBus;
use heimhub_adapter_storage_sqlite_sqlx::SqliteHistorySink;
use heimhub_app::hub::HubService;
use heimhub_app::ports::{HistorySink, NoopHistorySink};
use heimhub_app::registry::DeviceRegistry;
use heimhub_app::rooms::RoomStore;
use heimhub_domain::message::{REGISTER_TOPIC, STATUS_FILTER};

use config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    if config.database.enabled {
        let db = heimhub_adapter_storage_sqlite_sqlx::Config {
            database_url: config.database.url.clone(),
        }
        .build()
        .await?;
        let sink = SqliteHistorySink::new(db.pool().clone());
        run(config, sink).await
    } else {
        tracing::info!("persistence sink disabled");
        run(config, NoopHistorySink).await
    }
}

async fn run<H>(config: Config, sink: H) -> anyhow::Result<()>
where
    H: HistorySink + Send + Sync + 'static,
{
    let (bus, mut inbound) =
        MqttBus::connect(&config.mqtt, &[REGISTER_TOPIC, STATUS_FILTER]).await?;

    let hub = Arc::new(HubService::new(
        Arc::new(DeviceRegistry::new()),
        Arc::new(RoomStore::new()),
        bus,
        sink,
    ));

    // Single writer: all bus messages flow through this one task.
    let pump_hub = Arc::clone(&hub);
    tokio::spawn(async move {
        while let Some(message) = inbound.recv().await {
            pump_hub.handle_message(message).await;
        }
        tracing::warn!("inbound bus channel closed");
    });

    let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
    let app = router::build(AppState::new(hub, shutdown_tx));

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "heimhubd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_rx))
        .await?;

    tracing::info!("heimhubd stopped");
    Ok(())
}

async fn shutdown_signal(mut shutdown_rx: mpsc::Receiver<()>) {
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("received SIGINT");
        }
        _ = shutdown_rx.recv() => {}
    }
}
