//! Simulated window contact.

use heimhub_domain::device::{DeviceKind, WindowState};
use heimhub_domain::id::DeviceId;
use heimhub_domain::message::{Announcement, BusMessage, StatusPatch, status_topic};

/// A window contact reporting `open`/`closed` transitions.
///
/// Commands arrive on the same status topic the contact reports on, so a
/// command carrying the current state is a no-op — without that, every
/// report would echo back as a command and loop forever.
#[derive(Debug)]
pub struct WindowContact {
    id: DeviceId,
    state: WindowState,
}

impl WindowContact {
    /// Create a contact in the given initial state.
    #[must_use]
    pub fn new(id: DeviceId, initial: WindowState) -> Self {
        Self { id, state: initial }
    }

    /// The device id.
    #[must_use]
    pub fn id(&self) -> &DeviceId {
        &self.id
    }

    /// The current state.
    #[must_use]
    pub fn state(&self) -> WindowState {
        self.state
    }

    /// Topic filters this device listens on.
    #[must_use]
    pub fn subscriptions(&self) -> Vec<String> {
        vec![status_topic(&self.id)]
    }

    /// The registration announcement published at startup.
    #[must_use]
    pub fn registration(&self) -> BusMessage {
        BusMessage::Register(Announcement {
            id: self.id.clone(),
            kind: DeviceKind::WindowContact,
            status: Some(self.state),
            current_temp: None,
            target_temp: None,
        })
    }

    /// Apply a status command received on the contact's own topic.
    ///
    /// Returns the messages to publish: a report of the new state, or
    /// nothing when the command matches the current state.
    pub fn handle_command(&mut self, patch: StatusPatch) -> Vec<BusMessage> {
        match patch.status {
            Some(state) if state != self.state => self.transition(state),
            _ => Vec::new(),
        }
    }

    /// Flip between `open` and `closed`, reporting the transition.
    pub fn toggle(&mut self) -> Vec<BusMessage> {
        let next = match self.state {
            WindowState::Open => WindowState::Closed,
            WindowState::Closed => WindowState::Open,
        };
        self.transition(next)
    }

    fn transition(&mut self, state: WindowState) -> Vec<BusMessage> {
        self.state = state;
        tracing::info!(device_id = %self.id, state = %state, "window transition");
        vec![BusMessage::Status {
            device_id: self.id.clone(),
            patch: StatusPatch::window(state),
        }]
    }
}
