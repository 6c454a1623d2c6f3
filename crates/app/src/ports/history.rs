//! History port — best-effort write-through persistence.
//!
//! The in-memory registry is the runtime source of truth; the sink mirrors
//! it and keeps a time-ordered history per device. Callers wrap every sink
//! write in a bounded timeout, log failures, and continue.

use std::future::Future;

use heimhub_domain::device::{Device, WindowState};
use heimhub_domain::error::HubError;
use heimhub_domain::id::DeviceId;

/// Write-through mirror of registry state plus append-only histories.
pub trait HistorySink {
    /// Insert or replace the mirror row for one device.
    fn mirror_device(&self, device: Device) -> impl Future<Output = Result<(), HubError>> + Send;

    /// Append a window-contact transition to the device history.
    fn append_status(
        &self,
        device_id: DeviceId,
        status: WindowState,
    ) -> impl Future<Output = Result<(), HubError>> + Send;

    /// Append a thermostat transition to the thermostat history.
    fn append_thermostat(
        &self,
        device_id: DeviceId,
        current_temp: f64,
        target_temp: f64,
    ) -> impl Future<Output = Result<(), HubError>> + Send;
}

impl<T: HistorySink + Send + Sync> HistorySink for std::sync::Arc<T> {
    fn mirror_device(&self, device: Device) -> impl Future<Output = Result<(), HubError>> + Send {
        (**self).mirror_device(device)
    }

    fn append_status(
        &self,
        device_id: DeviceId,
        status: WindowState,
    ) -> impl Future<Output = Result<(), HubError>> + Send {
        (**self).append_status(device_id, status)
    }

    fn append_thermostat(
        &self,
        device_id: DeviceId,
        current_temp: f64,
        target_temp: f64,
    ) -> impl Future<Output = Result<(), HubError>> + Send {
        (**self).append_thermostat(device_id, current_temp, target_temp)
    }
}

/// Sink used when persistence is disabled; every write succeeds instantly.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHistorySink;

impl HistorySink for NoopHistorySink {
    async fn mirror_device(&self, _device: Device) -> Result<(), HubError> {
        Ok(())
    }

    async fn append_status(
        &self,
        _device_id: DeviceId,
        _status: WindowState,
    ) -> Result<(), HubError> {
        Ok(())
    }

    async fn append_thermostat(
        &self,
        _device_id: DeviceId,
        _current_temp: f64,
        _target_temp: f64,
    ) -> Result<(), HubError> {
        Ok(())
    }
}
