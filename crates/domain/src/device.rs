//! Device — the registry record for one simulated physical device.
//!
//! A record is created the first time a registration event for its id is
//! seen and then mutated in place by status events. There is no removal
//! operation; a stale record persists until the hub restarts.

use serde::{Deserialize, Serialize};

use crate::error::{HubError, ValidationError};
use crate::id::{DeviceId, RoomId};

/// The kind of device participating in the bus protocol.
///
/// Unknown kinds are stored as-is so newer simulators can register against
/// an older hub (forward-compatible but unvalidated).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DeviceKind {
    WindowContact,
    Thermostat,
    Other(String),
}

impl DeviceKind {
    /// The wire representation of this kind.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::WindowContact => "window_contact",
            Self::Thermostat => "thermostat",
            Self::Other(kind) => kind,
        }
    }
}

impl From<String> for DeviceKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "window_contact" => Self::WindowContact,
            "thermostat" => Self::Thermostat,
            _ => Self::Other(value),
        }
    }
}

impl From<DeviceKind> for String {
    fn from(value: DeviceKind) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Observable state of a window contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowState {
    Open,
    Closed,
}

impl WindowState {
    /// The temperature a thermostat should hold while a co-located window
    /// contact is in this state: the target while closed, the setback
    /// while open.
    #[must_use]
    pub fn derived_temp(self, target_temp: f64, setback_temp: f64) -> f64 {
        match self {
            Self::Closed => target_temp,
            Self::Open => setback_temp,
        }
    }
}

impl std::fmt::Display for WindowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Open => "open",
            Self::Closed => "closed",
        })
    }
}

/// Current known state of one device, as held by the hub registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: DeviceId,
    #[serde(rename = "type")]
    pub kind: DeviceKind,
    /// Window-contact variant only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<WindowState>,
    /// Thermostat variant only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_temp: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_temp: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub setback_temp: Option<f64>,
    /// Weak back-reference to the room this device is assigned to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_id: Option<RoomId>,
}

impl Device {
    /// Create a record with no observed state yet.
    #[must_use]
    pub fn new(id: DeviceId, kind: DeviceKind) -> Self {
        Self {
            id,
            kind,
            status: None,
            current_temp: None,
            target_temp: None,
            setback_temp: None,
            room_id: None,
        }
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::Validation`] when the id is empty.
    pub fn validate(&self) -> Result<(), HubError> {
        if self.id.is_empty() {
            return Err(ValidationError::EmptyDeviceId.into());
        }
        Ok(())
    }

    /// Whether this record describes a thermostat.
    #[must_use]
    pub fn is_thermostat(&self) -> bool {
        self.kind == DeviceKind::Thermostat
    }

    /// Whether this record describes a window contact.
    #[must_use]
    pub fn is_window_contact(&self) -> bool {
        self.kind == DeviceKind::WindowContact
    }
}
