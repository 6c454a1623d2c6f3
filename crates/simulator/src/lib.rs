//! # heimhub-simulator
//!
//! Simulated devices that speak the device-state bus protocol.
//!
//! ## Provided devices
//!
//! | Device | Behaviour |
//! |--------|-----------|
//! | Window contact | Reports `open`/`closed`, flips on command or on an optional timer |
//! | Thermostat | Adopts operator `setTemp` commands and hub-derived temperatures |
//!
//! Each simulator is a pure state machine ([`WindowContact`],
//! [`Thermostat`]) wrapped by a [`runner::Runner`] that connects it to the
//! bus. State machines take one inbound message and return the messages to
//! publish, which keeps the protocol behaviour testable without a broker.
//!
//! ## Dependency rule
//!
//! Depends on `heimhub-app` (port traits) and `heimhub-domain` only.

pub mod config;
pub mod runner;
pub mod thermostat;
pub mod window_contact;

pub use config::SimulatorConfig;
pub use runner::{Runner, SimulatedDevice};
pub use thermostat::Thermostat;
pub use window_contact::WindowContact;
