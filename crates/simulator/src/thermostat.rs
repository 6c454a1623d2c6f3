//! Simulated thermostat.

use heimhub_domain::device::DeviceKind;
use heimhub_domain::id::DeviceId;
use heimhub_domain::message::{
    Announcement, BusMessage, StatusPatch, TempCommand, set_temp_topic, status_topic,
};

/// A thermostat holding a current and target temperature.
///
/// The hub owns the window association: when a window in the thermostat's
/// room opens or closes, the hub derives the new current temperature and
/// sends it back as a status command. The simulator only adopts commands,
/// it never computes temperatures itself.
#[derive(Debug)]
pub struct Thermostat {
    id: DeviceId,
    current_temp: f64,
    target_temp: f64,
    setback_temp: Option<f64>,
}

impl Thermostat {
    /// Create a thermostat resting at the given temperature.
    #[must_use]
    pub fn new(id: DeviceId, initial_temp: f64) -> Self {
        Self {
            id,
            current_temp: initial_temp,
            target_temp: initial_temp,
            setback_temp: None,
        }
    }

    /// The device id.
    #[must_use]
    pub fn id(&self) -> &DeviceId {
        &self.id
    }

    /// The current temperature.
    #[must_use]
    pub fn current_temp(&self) -> f64 {
        self.current_temp
    }

    /// The target temperature.
    #[must_use]
    pub fn target_temp(&self) -> f64 {
        self.target_temp
    }

    /// Topic filters this device listens on.
    #[must_use]
    pub fn subscriptions(&self) -> Vec<String> {
        vec![status_topic(&self.id), set_temp_topic(&self.id)]
    }

    /// The registration announcement published at startup.
    #[must_use]
    pub fn registration(&self) -> BusMessage {
        BusMessage::Register(Announcement {
            id: self.id.clone(),
            kind: DeviceKind::Thermostat,
            status: None,
            current_temp: Some(self.current_temp),
            target_temp: Some(self.target_temp),
        })
    }

    /// Adopt an operator `setTemp` command.
    ///
    /// Only the target/setback pair changes here; the current temperature
    /// follows once the hub derives it from the room's window state.
    pub fn handle_set_temp(&mut self, command: TempCommand) -> Vec<BusMessage> {
        self.setback_temp = Some(command.setback_temp);
        if (self.target_temp - command.room_temp).abs() < f64::EPSILON {
            return Vec::new();
        }
        self.target_temp = command.room_temp;
        tracing::info!(device_id = %self.id, target = command.room_temp, "target adopted");
        vec![self.report()]
    }

    /// Adopt a hub status command carrying derived temperatures.
    ///
    /// Unchanged values are a no-op so the report/command echo on the
    /// shared status topic settles instead of looping.
    pub fn handle_command(&mut self, patch: StatusPatch) -> Vec<BusMessage> {
        let mut changed = false;
        if let Some(current) = patch.current_temp
            && (self.current_temp - current).abs() >= f64::EPSILON
        {
            self.current_temp = current;
            changed = true;
        }
        if let Some(target) = patch.target_temp
            && (self.target_temp - target).abs() >= f64::EPSILON
        {
            self.target_temp = target;
            changed = true;
        }
        if changed {
            tracing::info!(
                device_id = %self.id,
                current = self.current_temp,
                target = self.target_temp,
                "temperatures adopted"
            );
            vec![self.report()]
        } else {
            Vec::new()
        }
    }

    fn report(&self) -> BusMessage {
        BusMessage::Status {
            device_id: self.id.clone(),
            patch: StatusPatch::temps(self.current_temp, self.target_temp),
        }
    }

    /// The adopted setback temperature, if an operator set one.
    #[must_use]
    pub fn setback_temp(&self) -> Option<f64> {
        self.setback_temp
    }
}
