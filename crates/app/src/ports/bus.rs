//! Bus port — outbound publishing to the message bus.

use std::future::Future;

use heimhub_domain::error::HubError;
use heimhub_domain::message::BusMessage;

/// Publishes typed messages onto the bus.
///
/// Implementations must not buffer: a publish that fails while the broker
/// is unreachable is reported as an error and the caller logs and moves on
/// (no outbox/retry queue).
pub trait BusPublisher {
    /// Publish one message on its topic.
    fn publish(&self, message: BusMessage) -> impl Future<Output = Result<(), HubError>> + Send;
}

impl<T: BusPublisher + Send + Sync> BusPublisher for std::sync::Arc<T> {
    fn publish(&self, message: BusMessage) -> impl Future<Output = Result<(), HubError>> + Send {
        (**self).publish(message)
    }
}
