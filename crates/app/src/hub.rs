//! Hub service — bus event handling, room use-cases, and the thermostat
//! control loop.
//!
//! The service is the only writer of the registry and room store. Inbound
//! bus messages arrive through one queue drained by a dedicated task; HTTP
//! handlers call the query and command methods. Commands are relayed to
//! the bus, never applied to the registry directly — the registry changes
//! only when the resulting device event comes back in.

use std::sync::Arc;
use std::time::Duration;

use heimhub_domain::device::{Device, WindowState};
use heimhub_domain::error::{HubError, NotFoundError};
use heimhub_domain::id::{DeviceId, RoomId};
use heimhub_domain::message::{Announcement, BusMessage, StatusPatch, TempCommand};
use heimhub_domain::room::{Room, ThermostatSetting};

use crate::ports::{BusPublisher, HistorySink};
use crate::registry::DeviceRegistry;
use crate::rooms::RoomStore;

/// How long a single persistence-sink write may take before it is abandoned.
const DEFAULT_SINK_TIMEOUT: Duration = Duration::from_secs(5);

/// Application service owning the device-state synchronization engine.
pub struct HubService<B, H> {
    registry: Arc<DeviceRegistry>,
    rooms: Arc<RoomStore>,
    bus: B,
    history: H,
    sink_timeout: Duration,
}

impl<B, H> HubService<B, H>
where
    B: BusPublisher + Send + Sync,
    H: HistorySink + Send + Sync,
{
    /// Create a new service over the given stores and ports.
    pub fn new(registry: Arc<DeviceRegistry>, rooms: Arc<RoomStore>, bus: B, history: H) -> Self {
        Self {
            registry,
            rooms,
            bus,
            history,
            sink_timeout: DEFAULT_SINK_TIMEOUT,
        }
    }

    /// Override the bounded timeout applied to persistence-sink writes.
    #[must_use]
    pub fn with_sink_timeout(mut self, sink_timeout: Duration) -> Self {
        self.sink_timeout = sink_timeout;
        self
    }

    // -----------------------------------------------------------------
    // Bus event handling
    // -----------------------------------------------------------------

    /// Apply one inbound bus message to the registry.
    ///
    /// Never fails: malformed or unexpected messages are logged and
    /// dropped so a single bad event cannot take down the handler loop.
    pub async fn handle_message(&self, message: BusMessage) {
        match message {
            BusMessage::Register(announcement) => self.handle_registration(announcement).await,
            BusMessage::Status { device_id, patch } => self.handle_status(&device_id, patch).await,
            BusMessage::Update(announcement) => {
                let patch = StatusPatch {
                    status: announcement.status,
                    current_temp: announcement.current_temp,
                    target_temp: announcement.target_temp,
                };
                self.handle_status(&announcement.id, patch).await;
            }
            BusMessage::SetTemp { device_id, .. } => {
                tracing::debug!(device_id = %device_id, "ignoring command addressed to a device");
            }
        }
    }

    async fn handle_registration(&self, announcement: Announcement) {
        if announcement.id.is_empty() {
            tracing::warn!("dropping registration with empty device id");
            return;
        }
        let device = self.registry.upsert_from_announcement(announcement).await;
        tracing::info!(device_id = %device.id, kind = %device.kind, "device registered");
        self.mirror(device).await;
    }

    async fn handle_status(&self, device_id: &DeviceId, patch: StatusPatch) {
        if patch.is_empty() {
            tracing::debug!(device_id = %device_id, "dropping empty status patch");
            return;
        }
        let Some(device) = self.registry.apply_patch(device_id, patch).await else {
            tracing::debug!(device_id = %device_id, "dropping status for unregistered device");
            return;
        };

        self.mirror(device.clone()).await;

        if let Some(state) = patch.status
            && device.is_window_contact()
        {
            self.record_status(device_id, state).await;
            self.publish_logged(BusMessage::Update(Announcement::of_device(&device)))
                .await;
            self.on_window_change(device_id, state).await;
        } else if device.is_thermostat()
            && (patch.current_temp.is_some() || patch.target_temp.is_some())
            && let (Some(current), Some(target)) = (device.current_temp, device.target_temp)
        {
            self.record_thermostat(device_id, current, target).await;
        }
    }

    // -----------------------------------------------------------------
    // Thermostat control loop
    // -----------------------------------------------------------------

    /// React to a window-contact transition: recompute the current
    /// temperature of every thermostat sharing a room with the window.
    ///
    /// The recomputation is a pure function of the window state and the
    /// thermostat's target/setback pair, so replaying the same event is
    /// idempotent and delivery order across devices does not matter.
    async fn on_window_change(&self, window_id: &DeviceId, state: WindowState) {
        for room in self.rooms.rooms_containing(window_id).await {
            for member in &room.device_ids {
                if member == window_id {
                    continue;
                }
                // Membership may reference ids the registry has not seen.
                let Some(device) = self.registry.get(member).await else {
                    continue;
                };
                if device.is_thermostat() {
                    self.derive(&room, &device, state).await;
                }
            }
        }
    }

    /// Recompute one thermostat and propagate the result.
    async fn derive(&self, room: &Room, thermostat: &Device, state: WindowState) {
        let setting = room.setting_for(&thermostat.id);
        let target = setting
            .map(|s| s.room_temp)
            .or(thermostat.target_temp);
        let setback = setting
            .map(|s| s.setback_temp)
            .or(thermostat.setback_temp);
        let (Some(target), Some(setback)) = (target, setback) else {
            tracing::debug!(
                device_id = %thermostat.id,
                "skipping derivation, no target/setback known"
            );
            return;
        };

        let current = state.derived_temp(target, setback);
        let Some(updated) = self
            .registry
            .apply_derived(&thermostat.id, current, target, setback)
            .await
        else {
            return;
        };

        tracing::info!(
            device_id = %updated.id,
            window_state = %state,
            current_temp = current,
            "derived thermostat temperature"
        );

        self.mirror(updated.clone()).await;
        self.record_thermostat(&updated.id, current, target).await;

        // Broadcast for the registry/dashboard side, command for the device.
        self.publish_logged(BusMessage::Update(Announcement::of_device(&updated)))
            .await;
        self.publish_logged(BusMessage::Status {
            device_id: updated.id.clone(),
            patch: StatusPatch::temps(current, target),
        })
        .await;
    }

    /// The window contact associated with a thermostat via room
    /// co-membership, recomputed on demand from the current room set.
    pub async fn window_for_thermostat(&self, thermostat_id: &DeviceId) -> Option<DeviceId> {
        for room in self.rooms.rooms_containing(thermostat_id).await {
            for member in &room.device_ids {
                if member == thermostat_id {
                    continue;
                }
                if let Some(device) = self.registry.get(member).await
                    && device.is_window_contact()
                {
                    return Some(member.clone());
                }
            }
        }
        None
    }

    // -----------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------

    /// Snapshot of all known devices.
    pub async fn list_devices(&self) -> Vec<Device> {
        self.registry.snapshot().await
    }

    /// Look up one device.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::NotFound`] when the id was never registered.
    pub async fn get_device(&self, device_id: &DeviceId) -> Result<Device, HubError> {
        self.registry.get(device_id).await.ok_or_else(|| {
            NotFoundError {
                entity: "Device",
                id: device_id.to_string(),
            }
            .into()
        })
    }

    /// All rooms.
    pub async fn list_rooms(&self) -> Vec<Room> {
        self.rooms.list().await
    }

    /// Look up one room.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::NotFound`] when no room with `room_id` exists.
    pub async fn get_room(&self, room_id: RoomId) -> Result<Room, HubError> {
        self.rooms.get(room_id).await.ok_or_else(|| {
            NotFoundError {
                entity: "Room",
                id: room_id.to_string(),
            }
            .into()
        })
    }

    // -----------------------------------------------------------------
    // Room use-cases
    // -----------------------------------------------------------------

    /// Create a new room.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::Validation`] when the name is empty.
    #[tracing::instrument(skip(self))]
    pub async fn create_room(&self, name: String) -> Result<Room, HubError> {
        let room = Room::builder().name(name).build()?;
        Ok(self.rooms.insert(room).await)
    }

    /// Delete a room and clear the back-reference of every member device.
    ///
    /// The member device records themselves are untouched.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::NotFound`] when no room with `room_id` exists.
    #[tracing::instrument(skip(self))]
    pub async fn delete_room(&self, room_id: RoomId) -> Result<(), HubError> {
        let removed = self.rooms.remove(room_id).await.ok_or(NotFoundError {
            entity: "Room",
            id: room_id.to_string(),
        })?;
        self.registry.clear_room(room_id).await;
        tracing::info!(room_id = %room_id, name = %removed.name, "room deleted");
        Ok(())
    }

    /// Replace a room's device assignment wholesale.
    ///
    /// Devices are exclusive to one room: ids in the new assignment are
    /// evicted from any other room first. Settings for devices that left
    /// the room are dropped. Assigning ids the registry has not seen yet
    /// is allowed (soft invariant).
    ///
    /// # Errors
    ///
    /// Returns [`HubError::NotFound`] when no room with `room_id` exists.
    #[tracing::instrument(skip(self, device_ids))]
    pub async fn assign_devices(
        &self,
        room_id: RoomId,
        device_ids: Vec<DeviceId>,
    ) -> Result<Room, HubError> {
        let previous = self.get_room(room_id).await?;

        self.rooms.evict_devices_elsewhere(&device_ids, room_id).await;
        for member in &previous.device_ids {
            if !device_ids.contains(member) {
                self.registry.set_room(member, None).await;
            }
        }

        let room = self
            .rooms
            .update(room_id, |room| {
                room.device_ids = device_ids.clone();
                room.thermostat_settings
                    .retain(|id, _| device_ids.contains(id));
            })
            .await
            .ok_or(NotFoundError {
                entity: "Room",
                id: room_id.to_string(),
            })?;

        for member in &device_ids {
            self.registry.set_room(member, Some(room_id)).await;
        }
        Ok(room)
    }

    /// Store a target/setback pair for every thermostat in the room and
    /// publish a `setTemp` command so the simulators converge.
    ///
    /// Members the registry does not know as thermostats are skipped.
    /// When the room's window state is already known, the derivation runs
    /// immediately instead of waiting for the next window event.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::NotFound`] when no room with `room_id` exists.
    #[tracing::instrument(skip(self))]
    pub async fn set_room_temperature(
        &self,
        room_id: RoomId,
        command: TempCommand,
    ) -> Result<Room, HubError> {
        let room = self.get_room(room_id).await?;

        let mut thermostats = Vec::new();
        for member in &room.device_ids {
            match self.registry.get(member).await {
                Some(device) if device.is_thermostat() => thermostats.push(member.clone()),
                Some(_) => {}
                None => {
                    tracing::debug!(device_id = %member, "skipping unregistered room member");
                }
            }
        }

        let room = self
            .rooms
            .update(room_id, |room| {
                for id in &thermostats {
                    room.thermostat_settings.insert(
                        id.clone(),
                        ThermostatSetting {
                            room_temp: command.room_temp,
                            setback_temp: command.setback_temp,
                        },
                    );
                }
            })
            .await
            .ok_or(NotFoundError {
                entity: "Room",
                id: room_id.to_string(),
            })?;

        for id in &thermostats {
            self.publish_logged(BusMessage::SetTemp {
                device_id: id.clone(),
                command,
            })
            .await;

            if let Some(window_id) = self.window_for_thermostat(id).await
                && let Some(window) = self.registry.get(&window_id).await
                && let Some(state) = window.status
                && let Some(thermostat) = self.registry.get(id).await
            {
                self.derive(&room, &thermostat, state).await;
            }
        }
        Ok(room)
    }

    /// Relay an operator status command to a device's status topic.
    ///
    /// The registry is not touched here; it changes when the device
    /// reports the resulting transition back over the bus.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::NotFound`] for unregistered devices and
    /// [`HubError::Bus`] when the publish fails.
    #[tracing::instrument(skip(self, patch))]
    pub async fn send_status(&self, device_id: DeviceId, patch: StatusPatch) -> Result<(), HubError> {
        if self.registry.get(&device_id).await.is_none() {
            return Err(NotFoundError {
                entity: "Device",
                id: device_id.to_string(),
            }
            .into());
        }
        self.bus.publish(BusMessage::Status { device_id, patch }).await
    }

    // -----------------------------------------------------------------
    // Port helpers
    // -----------------------------------------------------------------

    async fn publish_logged(&self, message: BusMessage) {
        let topic = message.topic();
        if let Err(err) = self.bus.publish(message).await {
            tracing::warn!(topic = %topic, error = %err, "bus publish failed");
        }
    }

    /// Run one sink write with the bounded timeout; failure is logged and
    /// swallowed so a database outage never stalls event handling.
    async fn sink_write<F>(&self, what: &'static str, device_id: &DeviceId, write: F)
    where
        F: Future<Output = Result<(), HubError>>,
    {
        match tokio::time::timeout(self.sink_timeout, write).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                tracing::warn!(device_id = %device_id, error = %err, "history {what} failed");
            }
            Err(_) => {
                tracing::warn!(device_id = %device_id, "history {what} timed out");
            }
        }
    }

    async fn mirror(&self, device: Device) {
        let id = device.id.clone();
        self.sink_write("mirror", &id, self.history.mirror_device(device))
            .await;
    }

    async fn record_status(&self, device_id: &DeviceId, state: WindowState) {
        self.sink_write(
            "status append",
            device_id,
            self.history.append_status(device_id.clone(), state),
        )
        .await;
    }

    async fn record_thermostat(&self, device_id: &DeviceId, current: f64, target: f64) {
        self.sink_write(
            "thermostat append",
            device_id,
            self.history.append_thermostat(device_id.clone(), current, target),
        )
        .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::NoopHistorySink;
    use heimhub_domain::device::DeviceKind;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingBus {
        messages: Mutex<Vec<BusMessage>>,
    }

    impl RecordingBus {
        fn sent(&self) -> Vec<BusMessage> {
            self.messages.lock().unwrap().clone()
        }
    }

    impl BusPublisher for RecordingBus {
        fn publish(
            &self,
            message: BusMessage,
        ) -> impl Future<Output = Result<(), HubError>> + Send {
            self.messages.lock().unwrap().push(message);
            async { Ok(()) }
        }
    }

    struct FailingSink;

    impl HistorySink for FailingSink {
        async fn mirror_device(&self, _device: Device) -> Result<(), HubError> {
            Err(HubError::Storage("database gone".into()))
        }

        async fn append_status(
            &self,
            _device_id: DeviceId,
            _status: WindowState,
        ) -> Result<(), HubError> {
            Err(HubError::Storage("database gone".into()))
        }

        async fn append_thermostat(
            &self,
            _device_id: DeviceId,
            _current_temp: f64,
            _target_temp: f64,
        ) -> Result<(), HubError> {
            Err(HubError::Storage("database gone".into()))
        }
    }

    fn make_service() -> (HubService<Arc<RecordingBus>, NoopHistorySink>, Arc<RecordingBus>) {
        let bus = Arc::new(RecordingBus::default());
        let service = HubService::new(
            Arc::new(DeviceRegistry::new()),
            Arc::new(RoomStore::new()),
            Arc::clone(&bus),
            NoopHistorySink,
        );
        (service, bus)
    }

    fn register_window(id: &str, status: WindowState) -> BusMessage {
        BusMessage::Register(Announcement {
            id: id.into(),
            kind: DeviceKind::WindowContact,
            status: Some(status),
            current_temp: None,
            target_temp: None,
        })
    }

    fn register_thermostat(id: &str, current: f64, target: f64) -> BusMessage {
        BusMessage::Register(Announcement {
            id: id.into(),
            kind: DeviceKind::Thermostat,
            status: None,
            current_temp: Some(current),
            target_temp: Some(target),
        })
    }

    fn window_status(id: &str, state: WindowState) -> BusMessage {
        BusMessage::Status {
            device_id: id.into(),
            patch: StatusPatch::window(state),
        }
    }

    /// Set up the §"Office" fixture: window + thermostat registered,
    /// co-assigned, settings 22/18.
    async fn office_fixture(
        service: &HubService<Arc<RecordingBus>, NoopHistorySink>,
    ) -> RoomId {
        service
            .handle_message(register_window("fensterkontakt_1", WindowState::Closed))
            .await;
        service
            .handle_message(register_thermostat("thermostat_1", 21.0, 21.0))
            .await;

        let room = service.create_room("Office".to_string()).await.unwrap();
        service
            .assign_devices(
                room.id,
                vec!["thermostat_1".into(), "fensterkontakt_1".into()],
            )
            .await
            .unwrap();
        service
            .set_room_temperature(
                room.id,
                TempCommand {
                    room_temp: 22.0,
                    setback_temp: 18.0,
                },
            )
            .await
            .unwrap();
        room.id
    }

    async fn current_temp(
        service: &HubService<Arc<RecordingBus>, NoopHistorySink>,
        id: &str,
    ) -> Option<f64> {
        service.get_device(&id.into()).await.unwrap().current_temp
    }

    #[tokio::test]
    async fn should_register_device_from_bus_event() {
        let (service, _) = make_service();
        service
            .handle_message(register_window("fensterkontakt_1", WindowState::Closed))
            .await;

        let device = service.get_device(&"fensterkontakt_1".into()).await.unwrap();
        assert_eq!(device.kind, DeviceKind::WindowContact);
        assert_eq!(device.status, Some(WindowState::Closed));
    }

    #[tokio::test]
    async fn should_drop_status_for_unregistered_device() {
        let (service, bus) = make_service();
        service
            .handle_message(window_status("ghost", WindowState::Open))
            .await;

        assert!(service.list_devices().await.is_empty());
        assert!(bus.sent().is_empty());
    }

    #[tokio::test]
    async fn should_derive_setback_when_window_opens() {
        let (service, bus) = make_service();
        office_fixture(&service).await;
        bus.messages.lock().unwrap().clear();

        service
            .handle_message(window_status("fensterkontakt_1", WindowState::Open))
            .await;

        assert_eq!(current_temp(&service, "thermostat_1").await, Some(18.0));

        let sent = bus.sent();
        assert!(sent.iter().any(|m| matches!(
            m,
            BusMessage::Update(a)
                if a.id == "thermostat_1".into() && a.current_temp == Some(18.0)
        )));
        assert!(sent.iter().any(|m| matches!(
            m,
            BusMessage::Status { device_id, patch }
                if *device_id == "thermostat_1".into()
                    && patch.current_temp == Some(18.0)
                    && patch.target_temp == Some(22.0)
        )));
    }

    #[tokio::test]
    async fn should_derive_target_when_window_closes() {
        let (service, _) = make_service();
        office_fixture(&service).await;

        service
            .handle_message(window_status("fensterkontakt_1", WindowState::Open))
            .await;
        service
            .handle_message(window_status("fensterkontakt_1", WindowState::Closed))
            .await;

        assert_eq!(current_temp(&service, "thermostat_1").await, Some(22.0));
    }

    #[tokio::test]
    async fn should_apply_identical_window_event_idempotently() {
        let (service, _) = make_service();
        office_fixture(&service).await;

        service
            .handle_message(window_status("fensterkontakt_1", WindowState::Open))
            .await;
        let after_first = current_temp(&service, "thermostat_1").await;
        service
            .handle_message(window_status("fensterkontakt_1", WindowState::Open))
            .await;

        assert_eq!(current_temp(&service, "thermostat_1").await, after_first);
        assert_eq!(after_first, Some(18.0));
    }

    #[tokio::test]
    async fn should_skip_derivation_when_setback_is_unknown() {
        let (service, _) = make_service();
        service
            .handle_message(register_window("fensterkontakt_1", WindowState::Closed))
            .await;
        service
            .handle_message(register_thermostat("thermostat_1", 21.0, 21.0))
            .await;
        let room = service.create_room("Office".to_string()).await.unwrap();
        service
            .assign_devices(
                room.id,
                vec!["thermostat_1".into(), "fensterkontakt_1".into()],
            )
            .await
            .unwrap();

        // No setback known from registration or settings: derivation skips.
        service
            .handle_message(window_status("fensterkontakt_1", WindowState::Open))
            .await;
        assert_eq!(current_temp(&service, "thermostat_1").await, Some(21.0));
    }

    #[tokio::test]
    async fn should_publish_set_temp_command_for_each_thermostat_member() {
        let (service, bus) = make_service();
        office_fixture(&service).await;

        let commands: Vec<_> = bus
            .sent()
            .into_iter()
            .filter(|m| matches!(m, BusMessage::SetTemp { .. }))
            .collect();
        assert_eq!(commands.len(), 1);
        let BusMessage::SetTemp { device_id, command } = &commands[0] else {
            unreachable!();
        };
        assert_eq!(*device_id, "thermostat_1".into());
        assert!((command.room_temp - 22.0).abs() < f64::EPSILON);
        assert!((command.setback_temp - 18.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn should_derive_immediately_when_settings_arrive_after_window_state() {
        let (service, _) = make_service();
        office_fixture(&service).await;

        // Window was closed at registration; setting the room temperature
        // derives without waiting for the next window event.
        assert_eq!(current_temp(&service, "thermostat_1").await, Some(22.0));
    }

    #[tokio::test]
    async fn should_skip_unregistered_members_when_setting_temperature() {
        let (service, bus) = make_service();
        let room = service.create_room("Office".to_string()).await.unwrap();
        service
            .assign_devices(room.id, vec!["thermostat_9".into()])
            .await
            .unwrap();

        let room = service
            .set_room_temperature(
                room.id,
                TempCommand {
                    room_temp: 22.0,
                    setback_temp: 18.0,
                },
            )
            .await
            .unwrap();

        assert!(room.thermostat_settings.is_empty());
        assert!(bus.sent().is_empty());
    }

    #[tokio::test]
    async fn should_cascade_back_reference_clearing_on_room_deletion() {
        let (service, _) = make_service();
        let room_id = office_fixture(&service).await;

        service.delete_room(room_id).await.unwrap();

        let device = service.get_device(&"fensterkontakt_1".into()).await.unwrap();
        assert!(device.room_id.is_none());
        assert_eq!(device.kind, DeviceKind::WindowContact);
        assert_eq!(device.status, Some(WindowState::Closed));
        assert!(service.list_rooms().await.is_empty());
    }

    #[tokio::test]
    async fn should_return_not_found_when_deleting_unknown_room() {
        let (service, _) = make_service();
        let result = service.delete_room(RoomId::new()).await;
        assert!(matches!(result, Err(HubError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_move_device_between_rooms_exclusively() {
        let (service, _) = make_service();
        service
            .handle_message(register_thermostat("thermostat_1", 21.0, 21.0))
            .await;
        let office = service.create_room("Office".to_string()).await.unwrap();
        let kitchen = service.create_room("Kitchen".to_string()).await.unwrap();
        service
            .assign_devices(office.id, vec!["thermostat_1".into()])
            .await
            .unwrap();

        service
            .assign_devices(kitchen.id, vec!["thermostat_1".into()])
            .await
            .unwrap();

        let office = service.get_room(office.id).await.unwrap();
        let kitchen = service.get_room(kitchen.id).await.unwrap();
        assert!(office.device_ids.is_empty());
        assert!(kitchen.contains(&"thermostat_1".into()));

        let device = service.get_device(&"thermostat_1".into()).await.unwrap();
        assert_eq!(device.room_id, Some(kitchen.id));
    }

    #[tokio::test]
    async fn should_find_window_for_thermostat_via_room_co_membership() {
        let (service, _) = make_service();
        office_fixture(&service).await;

        let window = service
            .window_for_thermostat(&"thermostat_1".into())
            .await;
        assert_eq!(window, Some("fensterkontakt_1".into()));
    }

    #[tokio::test]
    async fn should_return_none_when_thermostat_has_no_room() {
        let (service, _) = make_service();
        service
            .handle_message(register_thermostat("thermostat_1", 21.0, 21.0))
            .await;

        let window = service
            .window_for_thermostat(&"thermostat_1".into())
            .await;
        assert!(window.is_none());
    }

    #[tokio::test]
    async fn should_keep_updating_registry_when_history_sink_fails() {
        let bus = Arc::new(RecordingBus::default());
        let service = HubService::new(
            Arc::new(DeviceRegistry::new()),
            Arc::new(RoomStore::new()),
            Arc::clone(&bus),
            FailingSink,
        );

        service
            .handle_message(register_window("fensterkontakt_1", WindowState::Closed))
            .await;
        service
            .handle_message(window_status("fensterkontakt_1", WindowState::Open))
            .await;

        let device = service.get_device(&"fensterkontakt_1".into()).await.unwrap();
        assert_eq!(device.status, Some(WindowState::Open));
    }

    #[tokio::test]
    async fn should_relay_status_command_for_known_device() {
        let (service, bus) = make_service();
        service
            .handle_message(register_window("fensterkontakt_1", WindowState::Closed))
            .await;
        bus.messages.lock().unwrap().clear();

        service
            .send_status(
                "fensterkontakt_1".into(),
                StatusPatch::window(WindowState::Open),
            )
            .await
            .unwrap();

        // The command goes out on the bus but the registry stays untouched
        // until the device reports back.
        assert_eq!(bus.sent().len(), 1);
        let device = service.get_device(&"fensterkontakt_1".into()).await.unwrap();
        assert_eq!(device.status, Some(WindowState::Closed));
    }

    #[tokio::test]
    async fn should_return_not_found_when_commanding_unknown_device() {
        let (service, _) = make_service();
        let result = service
            .send_status("ghost".into(), StatusPatch::window(WindowState::Open))
            .await;
        assert!(matches!(result, Err(HubError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_run_office_scenario_end_to_end() {
        let (service, _) = make_service();
        let room_id = office_fixture(&service).await;

        service
            .handle_message(window_status("fensterkontakt_1", WindowState::Open))
            .await;
        assert_eq!(current_temp(&service, "thermostat_1").await, Some(18.0));

        service
            .handle_message(window_status("fensterkontakt_1", WindowState::Closed))
            .await;
        assert_eq!(current_temp(&service, "thermostat_1").await, Some(22.0));

        let room = service.get_room(room_id).await.unwrap();
        let setting = room.setting_for(&"thermostat_1".into()).unwrap();
        assert!((setting.room_temp - 22.0).abs() < f64::EPSILON);
    }
}
