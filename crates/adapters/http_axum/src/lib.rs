//! # heimhub-adapter-http-axum
//!
//! HTTP adapter using axum — serves the hub's REST query and command API.
//!
//! Reads come straight from the in-memory registry and room store; commands
//! go through the hub service, which relays them onto the bus. The registry
//! itself only changes when the resulting device event comes back in.
//!
//! ## Dependency rule
//! Depends on `heimhub-app` and `heimhub-domain`; never the other way
//! around.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
