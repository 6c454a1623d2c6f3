//! Simulated device configuration.

use serde::Deserialize;

use heimhub_domain::device::WindowState;

use crate::runner::SimulatedDevice;
use crate::thermostat::Thermostat;
use crate::window_contact::WindowContact;

/// Which device a simulator instance plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulatedKind {
    WindowContact,
    Thermostat,
}

/// Configuration for one simulated device.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Which device to simulate.
    pub kind: SimulatedKind,
    /// Device identifier announced at registration.
    pub device_id: String,
    /// Initial state for window contacts.
    pub initial_window_state: WindowState,
    /// Initial current/target temperature for thermostats.
    pub initial_temp: f64,
    /// Flip a window contact every N seconds; off when absent.
    pub toggle_interval_secs: Option<u64>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            kind: SimulatedKind::WindowContact,
            device_id: "fensterkontakt_1".to_string(),
            initial_window_state: WindowState::Closed,
            initial_temp: 21.0,
            toggle_interval_secs: None,
        }
    }
}

impl SimulatorConfig {
    /// Build the configured device state machine.
    #[must_use]
    pub fn build(&self) -> SimulatedDevice {
        match self.kind {
            SimulatedKind::WindowContact => SimulatedDevice::Window(WindowContact::new(
                self.device_id.as_str().into(),
                self.initial_window_state,
            )),
            SimulatedKind::Thermostat => SimulatedDevice::Thermostat(Thermostat::new(
                self.device_id.as_str().into(),
                self.initial_temp,
            )),
        }
    }
}
