//! Room — a named grouping of device ids with per-thermostat settings.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{HubError, ValidationError};
use crate::id::{DeviceId, RoomId};

/// Desired target/setback pair configured by an operator for one thermostat.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThermostatSetting {
    pub room_temp: f64,
    pub setback_temp: f64,
}

/// A named grouping of devices.
///
/// Membership is a list of device ids; the record does not own the devices
/// and may reference ids the registry has not seen yet (soft invariant —
/// lookups must miss gracefully).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    pub device_ids: Vec<DeviceId>,
    #[serde(default)]
    pub thermostat_settings: HashMap<DeviceId, ThermostatSetting>,
}

impl Room {
    /// Create a builder for constructing a [`Room`].
    #[must_use]
    pub fn builder() -> RoomBuilder {
        RoomBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::Validation`] when `name` is empty.
    pub fn validate(&self) -> Result<(), HubError> {
        if self.name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        Ok(())
    }

    /// Whether the given device is a member of this room.
    #[must_use]
    pub fn contains(&self, device_id: &DeviceId) -> bool {
        self.device_ids.contains(device_id)
    }

    /// The configured setting for one thermostat member, if any.
    #[must_use]
    pub fn setting_for(&self, device_id: &DeviceId) -> Option<ThermostatSetting> {
        self.thermostat_settings.get(device_id).copied()
    }
}

/// Step-by-step builder for [`Room`].
#[derive(Debug, Default)]
pub struct RoomBuilder {
    id: Option<RoomId>,
    name: Option<String>,
    device_ids: Vec<DeviceId>,
}

impl RoomBuilder {
    #[must_use]
    pub fn id(mut self, id: RoomId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn device_ids(mut self, device_ids: Vec<DeviceId>) -> Self {
        self.device_ids = device_ids;
        self
    }

    /// Consume the builder, validate, and return a [`Room`].
    ///
    /// # Errors
    ///
    /// Returns [`HubError::Validation`] if `name` is missing or empty.
    pub fn build(self) -> Result<Room, HubError> {
        let room = Room {
            id: self.id.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            device_ids: self.device_ids,
            thermostat_settings: HashMap::new(),
        };
        room.validate()?;
        Ok(room)
    }
}
