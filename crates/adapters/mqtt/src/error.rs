//! MQTT adapter error types.

use heimhub_domain::error::HubError;

/// Errors specific to the MQTT adapter.
#[derive(Debug, thiserror::Error)]
pub enum MqttError {
    /// The rumqttc client returned an error.
    #[error("MQTT client error")]
    Client(#[source] rumqttc::ClientError),

    /// Failed to encode an outbound payload as JSON.
    #[error("failed to encode MQTT payload")]
    Encode(#[source] heimhub_domain::message::MessageError),
}

impl From<MqttError> for HubError {
    fn from(err: MqttError) -> Self {
        HubError::Bus(Box::new(err))
    }
}
