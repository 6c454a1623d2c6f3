//! Connects one simulated device to the bus.

use std::time::Duration;

use tokio::sync::mpsc;

use heimhub_app::ports::BusPublisher;
use heimhub_domain::error::HubError;
use heimhub_domain::message::BusMessage;

use crate::thermostat::Thermostat;
use crate::window_contact::WindowContact;

/// One simulated device behind a common dispatch surface.
#[derive(Debug)]
pub enum SimulatedDevice {
    Window(WindowContact),
    Thermostat(Thermostat),
}

impl SimulatedDevice {
    /// Topic filters this device listens on.
    #[must_use]
    pub fn subscriptions(&self) -> Vec<String> {
        match self {
            Self::Window(contact) => contact.subscriptions(),
            Self::Thermostat(thermostat) => thermostat.subscriptions(),
        }
    }

    /// The registration announcement published at startup.
    #[must_use]
    pub fn registration(&self) -> BusMessage {
        match self {
            Self::Window(contact) => contact.registration(),
            Self::Thermostat(thermostat) => thermostat.registration(),
        }
    }

    /// Dispatch one inbound message, returning the messages to publish.
    ///
    /// Messages addressed to other devices arrive here too (shared topic
    /// filters during tests) and are ignored.
    pub fn handle(&mut self, message: BusMessage) -> Vec<BusMessage> {
        match (self, message) {
            (Self::Window(contact), BusMessage::Status { device_id, patch })
                if device_id == *contact.id() =>
            {
                contact.handle_command(patch)
            }
            (Self::Thermostat(thermostat), BusMessage::Status { device_id, patch })
                if device_id == *thermostat.id() =>
            {
                thermostat.handle_command(patch)
            }
            (Self::Thermostat(thermostat), BusMessage::SetTemp { device_id, command })
                if device_id == *thermostat.id() =>
            {
                thermostat.handle_set_temp(command)
            }
            _ => Vec::new(),
        }
    }

    fn toggle(&mut self) -> Vec<BusMessage> {
        match self {
            Self::Window(contact) => contact.toggle(),
            Self::Thermostat(_) => Vec::new(),
        }
    }
}

/// Drives a [`SimulatedDevice`] over a bus connection.
pub struct Runner<B> {
    device: SimulatedDevice,
    bus: B,
    toggle_interval: Option<Duration>,
}

impl<B> Runner<B>
where
    B: BusPublisher + Send + Sync,
{
    /// Create a runner for the given device.
    pub fn new(device: SimulatedDevice, bus: B) -> Self {
        Self {
            device,
            bus,
            toggle_interval: None,
        }
    }

    /// Flip a window contact on a timer, simulating someone at the window.
    #[must_use]
    pub fn with_toggle_interval(mut self, interval: Duration) -> Self {
        self.toggle_interval = Some(interval);
        self
    }

    /// Announce the device, then serve commands until the channel closes.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::Bus`] when the registration announcement cannot
    /// be published; later publish failures are logged and skipped.
    pub async fn run(mut self, mut inbound: mpsc::Receiver<BusMessage>) -> Result<(), HubError> {
        self.bus.publish(self.device.registration()).await?;

        // A far-off tick keeps the select arm alive when toggling is off.
        let period = self.toggle_interval.unwrap_or(Duration::from_secs(86_400));
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        ticker.tick().await;

        loop {
            let outgoing = tokio::select! {
                message = inbound.recv() => match message {
                    Some(message) => self.device.handle(message),
                    None => return Ok(()),
                },
                _ = ticker.tick() => {
                    if self.toggle_interval.is_some() {
                        self.device.toggle()
                    } else {
                        Vec::new()
                    }
                }
            };
            for message in outgoing {
                if let Err(err) = self.bus.publish(message).await {
                    tracing::warn!(error = %err, "simulator publish failed");
                }
            }
        }
    }
}
