//! Device registry — the hub's authoritative in-memory view of all devices.
//!
//! Built solely from bus events; read by the HTTP layer. The map is guarded
//! by a single async `RwLock`, which serializes writers while letting the
//! HTTP read path run concurrently with bus handling. Readers may observe a
//! torn snapshot across different keys but never a torn individual record.

use std::collections::HashMap;

use tokio::sync::RwLock;

use heimhub_domain::device::Device;
use heimhub_domain::id::{DeviceId, RoomId};
use heimhub_domain::message::{Announcement, StatusPatch};

/// In-memory mapping from device id to its current known state.
#[derive(Debug, Default)]
pub struct DeviceRegistry {
    devices: RwLock<HashMap<DeviceId, Device>>,
}

impl DeviceRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or merge a record from a registration or update announcement.
    ///
    /// Re-registration is an upsert: fields present in the announcement
    /// replace the stored ones, fields absent from it are preserved (room
    /// assignment and setback temperature survive a device reconnect).
    /// Returns the record after the merge.
    pub async fn upsert_from_announcement(&self, announcement: Announcement) -> Device {
        let mut devices = self.devices.write().await;
        let record = devices
            .entry(announcement.id.clone())
            .or_insert_with(|| Device::new(announcement.id.clone(), announcement.kind.clone()));

        record.kind = announcement.kind;
        if let Some(status) = announcement.status {
            record.status = Some(status);
        }
        if let Some(current) = announcement.current_temp {
            record.current_temp = Some(current);
        }
        if let Some(target) = announcement.target_temp {
            record.target_temp = Some(target);
        }
        record.clone()
    }

    /// Merge a partial status update into an existing record.
    ///
    /// Only the fields present in the patch change; everything else is left
    /// untouched. Returns `None` when the id was never registered — the
    /// update is dropped, no record is created (a patch can race a
    /// slow-arriving registration; this is a documented gap).
    pub async fn apply_patch(&self, device_id: &DeviceId, patch: StatusPatch) -> Option<Device> {
        let mut devices = self.devices.write().await;
        let record = devices.get_mut(device_id)?;

        if let Some(status) = patch.status {
            record.status = Some(status);
        }
        if let Some(current) = patch.current_temp {
            record.current_temp = Some(current);
        }
        if let Some(target) = patch.target_temp {
            record.target_temp = Some(target);
        }
        Some(record.clone())
    }

    /// Write the outcome of a control-loop derivation into a record.
    ///
    /// Returns `None` when the thermostat is unknown.
    pub async fn apply_derived(
        &self,
        device_id: &DeviceId,
        current_temp: f64,
        target_temp: f64,
        setback_temp: f64,
    ) -> Option<Device> {
        let mut devices = self.devices.write().await;
        let record = devices.get_mut(device_id)?;
        record.current_temp = Some(current_temp);
        record.target_temp = Some(target_temp);
        record.setback_temp = Some(setback_temp);
        Some(record.clone())
    }

    /// Look up one record.
    pub async fn get(&self, device_id: &DeviceId) -> Option<Device> {
        self.devices.read().await.get(device_id).cloned()
    }

    /// An immutable-at-call-time list of all records, for HTTP reads.
    ///
    /// No pagination: the set is bounded by physical device count (tens,
    /// not thousands).
    pub async fn snapshot(&self) -> Vec<Device> {
        self.devices.read().await.values().cloned().collect()
    }

    /// Set or clear the room back-reference on one device.
    ///
    /// A miss is silently tolerated: rooms may reference devices the
    /// registry has not seen yet.
    pub async fn set_room(&self, device_id: &DeviceId, room_id: Option<RoomId>) {
        let mut devices = self.devices.write().await;
        if let Some(record) = devices.get_mut(device_id) {
            record.room_id = room_id;
        }
    }

    /// Clear the back-reference of every device assigned to `room_id`.
    ///
    /// Called when a room is deleted; the device records themselves stay.
    pub async fn clear_room(&self, room_id: RoomId) {
        let mut devices = self.devices.write().await;
        for record in devices.values_mut() {
            if record.room_id == Some(room_id) {
                record.room_id = None;
            }
        }
    }
}
