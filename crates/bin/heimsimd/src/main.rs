//! # heimsimd — device simulator daemon
//!
//! Runs one simulated window contact or thermostat against an MQTT broker.
//! The device announces itself on startup, then serves commands from its
//! topics until interrupted.

mod config;

use std::time::Duration;

use tracing_subscriber::EnvFilter;

use heimhub_adapter_mqtt::MqttBus;
use heimhub_simulator::Runner;

use config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    let device = config.device.build();
    let subscriptions = device.subscriptions();
    let filters: Vec<&str> = subscriptions.iter().map(String::as_str).collect();

    let (bus, inbound) = MqttBus::connect(&config.mqtt, &filters).await?;

    let mut runner = Runner::new(device, bus);
    if let Some(secs) = config.device.toggle_interval_secs {
        runner = runner.with_toggle_interval(Duration::from_secs(secs));
    }

    tracing::info!(device_id = %config.device.device_id, "simulator running");
    tokio::select! {
        result = runner.run(inbound) => result?,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("received SIGINT");
        }
    }
    Ok(())
}
