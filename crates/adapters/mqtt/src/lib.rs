//! # heimhub-adapter-mqtt
//!
//! MQTT adapter — carries the device-state bus over an MQTT broker.
//!
//! Both sides of the bus live here: outbound publishing (the
//! [`BusPublisher`](heimhub_app::ports::BusPublisher) port) and inbound
//! delivery (decoded messages pushed into an `mpsc` channel the hub or a
//! simulator drains).
//!
//! ## Dependency rule
//! Depends on `heimhub-app` and `heimhub-domain`; never the other way
//! around.

pub mod client;
pub mod config;
pub mod error;

pub use client::MqttBus;
pub use config::MqttConfig;
pub use error::MqttError;
