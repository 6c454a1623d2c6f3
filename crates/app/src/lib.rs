//! # heimhub-app
//!
//! Application layer — the device-state synchronization engine and its
//! **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement:
//!   - [`ports::BusPublisher`] — publish typed messages to the bus
//!   - [`ports::HistorySink`] — best-effort write-through persistence
//! - Provide the in-memory [`registry::DeviceRegistry`] and
//!   [`rooms::RoomStore`], the only shared mutable state in the hub
//! - Provide [`hub::HubService`], which drains the inbound bus queue,
//!   runs the thermostat control loop, and relays operator commands
//!
//! ## Dependency rule
//! Depends on `heimhub-domain` only (plus `tokio::sync` for locking).
//! Never imports adapter crates. Adapters depend on *this* crate, not the
//! reverse.

pub mod hub;
pub mod ports;
pub mod registry;
pub mod rooms;
