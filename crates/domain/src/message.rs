//! Bus message grammar — topics and typed JSON payloads.
//!
//! Every payload on the bus belongs to one of three families, modelled as a
//! tagged enum rather than untyped JSON so the registry's partial-update
//! merge is exhaustively checked at compile time:
//!
//! | Topic | Payload | Direction |
//! |---|---|---|
//! | `smarthome/register` | [`Announcement`] | device → hub |
//! | `smarthome/device/{id}/status` | [`StatusPatch`] | device → hub report, hub → device command |
//! | `smarthome/updates` | [`Announcement`] | broadcast |
//! | `smarthome/thermostat/{id}/setTemp` | [`TempCommand`] | hub → device |

use serde::{Deserialize, Serialize};

use crate::device::{Device, DeviceKind, WindowState};
use crate::id::DeviceId;

/// Registration topic all devices announce themselves on.
pub const REGISTER_TOPIC: &str = "smarthome/register";

/// Broadcast topic for device state changes.
pub const UPDATES_TOPIC: &str = "smarthome/updates";

/// Subscription filter matching every per-device status topic.
pub const STATUS_FILTER: &str = "smarthome/device/+/status";

/// Per-device status topic (reports and commands).
#[must_use]
pub fn status_topic(device_id: &DeviceId) -> String {
    format!("smarthome/device/{device_id}/status")
}

/// Per-thermostat operator command topic.
#[must_use]
pub fn set_temp_topic(device_id: &DeviceId) -> String {
    format!("smarthome/thermostat/{device_id}/setTemp")
}

/// Full device snapshot carried on the register and updates topics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    pub id: DeviceId,
    #[serde(rename = "type")]
    pub kind: DeviceKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<WindowState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_temp: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_temp: Option<f64>,
}

impl Announcement {
    /// Snapshot a registry record for broadcasting.
    #[must_use]
    pub fn of_device(device: &Device) -> Self {
        Self {
            id: device.id.clone(),
            kind: device.kind.clone(),
            status: device.status,
            current_temp: device.current_temp,
            target_temp: device.target_temp,
        }
    }
}

/// Partial state update: only the fields present change anything.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<WindowState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_temp: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_temp: Option<f64>,
}

impl StatusPatch {
    /// A patch carrying only a window state.
    #[must_use]
    pub fn window(status: WindowState) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// A patch carrying derived thermostat temperatures.
    #[must_use]
    pub fn temps(current_temp: f64, target_temp: f64) -> Self {
        Self {
            current_temp: Some(current_temp),
            target_temp: Some(target_temp),
            ..Self::default()
        }
    }

    /// Whether the patch carries no fields at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.current_temp.is_none() && self.target_temp.is_none()
    }
}

/// Operator command setting a thermostat's target/setback pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TempCommand {
    pub room_temp: f64,
    pub setback_temp: f64,
}

/// One decoded bus message, tagged by topic family.
#[derive(Debug, Clone, PartialEq)]
pub enum BusMessage {
    /// `smarthome/register`
    Register(Announcement),
    /// `smarthome/device/{id}/status`
    Status {
        device_id: DeviceId,
        patch: StatusPatch,
    },
    /// `smarthome/updates`
    Update(Announcement),
    /// `smarthome/thermostat/{id}/setTemp`
    SetTemp {
        device_id: DeviceId,
        command: TempCommand,
    },
}

impl BusMessage {
    /// The topic this message is published on.
    #[must_use]
    pub fn topic(&self) -> String {
        match self {
            Self::Register(_) => REGISTER_TOPIC.to_string(),
            Self::Status { device_id, .. } => status_topic(device_id),
            Self::Update(_) => UPDATES_TOPIC.to_string(),
            Self::SetTemp { device_id, .. } => set_temp_topic(device_id),
        }
    }

    /// Encode the payload as JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::Payload`] if serialization fails.
    pub fn encode(&self) -> Result<Vec<u8>, MessageError> {
        let bytes = match self {
            Self::Register(announcement) | Self::Update(announcement) => {
                serde_json::to_vec(announcement)?
            }
            Self::Status { patch, .. } => serde_json::to_vec(patch)?,
            Self::SetTemp { command, .. } => serde_json::to_vec(command)?,
        };
        Ok(bytes)
    }

    /// Decode an inbound publish into a typed message.
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::UnknownTopic`] for topics outside the
    /// `smarthome/` grammar and [`MessageError::Payload`] for payloads that
    /// do not match the topic's schema. Callers log and drop both cases.
    pub fn parse(topic: &str, payload: &[u8]) -> Result<Self, MessageError> {
        let segments: Vec<&str> = topic.split('/').collect();
        match segments.as_slice() {
            ["smarthome", "register"] => Ok(Self::Register(serde_json::from_slice(payload)?)),
            ["smarthome", "updates"] => Ok(Self::Update(serde_json::from_slice(payload)?)),
            ["smarthome", "device", id, "status"] => Ok(Self::Status {
                device_id: DeviceId::from(*id),
                patch: serde_json::from_slice(payload)?,
            }),
            ["smarthome", "thermostat", id, "setTemp"] => Ok(Self::SetTemp {
                device_id: DeviceId::from(*id),
                command: serde_json::from_slice(payload)?,
            }),
            _ => Err(MessageError::UnknownTopic(topic.to_string())),
        }
    }
}

/// Decode/encode failures for bus messages.
#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    /// The topic does not belong to the `smarthome/` grammar.
    #[error("unknown topic: {0}")]
    UnknownTopic(String),

    /// The payload did not match the topic's schema.
    #[error("malformed payload")]
    Payload(#[from] serde_json::Error),
}
