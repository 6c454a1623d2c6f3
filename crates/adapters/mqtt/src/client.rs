//! rumqttc-backed bus transport.

use std::time::Duration;

use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Packet, QoS};
use tokio::sync::mpsc;

use heimhub_app::ports::BusPublisher;
use heimhub_domain::error::HubError;
use heimhub_domain::message::BusMessage;

use crate::config::MqttConfig;
use crate::error::MqttError;

/// Pause between polls after an event-loop error; rumqttc reconnects on the
/// next poll, the pause keeps a dead broker from spinning the task.
const RECONNECT_DELAY: Duration = Duration::from_secs(1);

/// Bus transport over one MQTT broker connection.
///
/// Outbound messages go through the [`BusPublisher`] port; inbound publishes
/// on the subscribed filters are decoded into [`BusMessage`] values and
/// delivered over the channel returned by [`MqttBus::connect`]. Payloads
/// that fail to decode are logged and dropped, never surfaced.
#[derive(Debug, Clone)]
pub struct MqttBus {
    client: AsyncClient,
}

impl MqttBus {
    /// Connect to the broker and subscribe to the given topic filters.
    ///
    /// Returns the publishing handle and the inbound message channel. The
    /// background task driving the connection runs until every receiver of
    /// the channel is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`MqttError::Client`] when a subscription cannot be queued.
    pub async fn connect(
        config: &MqttConfig,
        subscriptions: &[&str],
    ) -> Result<(Self, mpsc::Receiver<BusMessage>), MqttError> {
        let mut options = MqttOptions::new(
            &config.client_id,
            &config.broker_host,
            config.broker_port,
        );
        options.set_keep_alive(Duration::from_secs(u64::from(config.keep_alive_secs)));
        options.set_clean_session(true);

        let (client, event_loop) = AsyncClient::new(options, config.channel_capacity);
        for filter in subscriptions {
            client
                .subscribe(*filter, QoS::AtLeastOnce)
                .await
                .map_err(MqttError::Client)?;
        }

        let (inbound_tx, inbound_rx) = mpsc::channel(config.channel_capacity);
        tokio::spawn(drive_event_loop(event_loop, inbound_tx));

        Ok((Self { client }, inbound_rx))
    }
}

impl BusPublisher for MqttBus {
    fn publish(&self, message: BusMessage) -> impl Future<Output = Result<(), HubError>> + Send {
        async move {
            let topic = message.topic();
            let payload = message.encode().map_err(MqttError::Encode)?;
            tracing::debug!(topic = %topic, "publishing bus message");
            self.client
                .publish(topic, QoS::AtLeastOnce, false, payload)
                .await
                .map_err(MqttError::Client)?;
            Ok(())
        }
    }
}

/// Poll the connection, decode publishes, and push them inbound.
async fn drive_event_loop(mut event_loop: EventLoop, inbound_tx: mpsc::Sender<BusMessage>) {
    loop {
        match event_loop.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(ack))) => {
                tracing::info!(?ack, "connected to MQTT broker");
            }
            Ok(Event::Incoming(Packet::SubAck(ack))) => {
                tracing::debug!(?ack, "MQTT subscription acknowledged");
            }
            Ok(Event::Incoming(Packet::Publish(publish))) => {
                match BusMessage::parse(&publish.topic, &publish.payload) {
                    Ok(message) => {
                        if inbound_tx.send(message).await.is_err() {
                            tracing::debug!("inbound channel closed, stopping MQTT task");
                            return;
                        }
                    }
                    Err(err) => {
                        tracing::warn!(
                            topic = %publish.topic,
                            error = %err,
                            "dropping undecodable MQTT publish"
                        );
                    }
                }
            }
            Ok(_) => {}
            Err(err) => {
                tracing::warn!(error = %err, "MQTT connection error, retrying");
                tokio::time::sleep(RECONNECT_DELAY).await;
            }
        }
    }
}
