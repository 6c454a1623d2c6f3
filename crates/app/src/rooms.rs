//! Room store — in-memory CRUD over room records.
//!
//! Same locking discipline as the registry: one async `RwLock` over the
//! map, record mutations atomic as a unit.

use std::collections::HashMap;

use tokio::sync::RwLock;

use heimhub_domain::id::{DeviceId, RoomId};
use heimhub_domain::room::Room;

/// In-memory mapping from room id to room record.
#[derive(Debug, Default)]
pub struct RoomStore {
    rooms: RwLock<HashMap<RoomId, Room>>,
}

impl RoomStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a freshly built room.
    pub async fn insert(&self, room: Room) -> Room {
        let mut rooms = self.rooms.write().await;
        rooms.insert(room.id, room.clone());
        room
    }

    /// Look up one room.
    pub async fn get(&self, room_id: RoomId) -> Option<Room> {
        self.rooms.read().await.get(&room_id).cloned()
    }

    /// All rooms, unordered.
    pub async fn list(&self) -> Vec<Room> {
        self.rooms.read().await.values().cloned().collect()
    }

    /// Remove a room, returning it if it existed.
    pub async fn remove(&self, room_id: RoomId) -> Option<Room> {
        self.rooms.write().await.remove(&room_id)
    }

    /// Mutate one room in place under the write lock.
    ///
    /// Returns the room after the mutation, or `None` if it does not exist.
    pub async fn update<F>(&self, room_id: RoomId, mutate: F) -> Option<Room>
    where
        F: FnOnce(&mut Room),
    {
        let mut rooms = self.rooms.write().await;
        let room = rooms.get_mut(&room_id)?;
        mutate(room);
        Some(room.clone())
    }

    /// All rooms that list the given device as a member.
    pub async fn rooms_containing(&self, device_id: &DeviceId) -> Vec<Room> {
        self.rooms
            .read()
            .await
            .values()
            .filter(|room| room.contains(device_id))
            .cloned()
            .collect()
    }

    /// Remove the given devices from every room except `keep`.
    ///
    /// Enforces device exclusivity when an assignment moves a device
    /// between rooms; any per-thermostat setting travels out with it.
    pub async fn evict_devices_elsewhere(&self, device_ids: &[DeviceId], keep: RoomId) {
        let mut rooms = self.rooms.write().await;
        for room in rooms.values_mut() {
            if room.id == keep {
                continue;
            }
            room.device_ids.retain(|id| !device_ids.contains(id));
            room.thermostat_settings
                .retain(|id, _| !device_ids.contains(id));
        }
    }
}
