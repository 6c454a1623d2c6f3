//! # heimhub-domain
//!
//! Pure domain model for the heimhub home automation system.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions
//! - Define **Devices** (window contacts, thermostats, forward-compatible others)
//! - Define **Rooms** (named groupings of devices with thermostat settings)
//! - Define the **bus message grammar** (topics + typed JSON payloads)
//! - Contain the temperature derivation rule and partial-update merge logic
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;

pub mod device;
pub mod message;
pub mod room;
