//! `SQLite` implementation of [`HistorySink`].

use std::future::Future;

use sqlx::SqlitePool;

use heimhub_app::ports::HistorySink;
use heimhub_domain::device::{Device, WindowState};
use heimhub_domain::error::HubError;
use heimhub_domain::id::DeviceId;

use crate::error::StorageError;

const UPSERT_DEVICE: &str = "INSERT INTO devices (id, kind, status, current_temp, target_temp, setback_temp, room_id) \
     VALUES (?, ?, ?, ?, ?, ?, ?) \
     ON CONFLICT(id) DO UPDATE SET \
         kind = excluded.kind, \
         status = excluded.status, \
         current_temp = excluded.current_temp, \
         target_temp = excluded.target_temp, \
         setback_temp = excluded.setback_temp, \
         room_id = excluded.room_id";
const INSERT_STATUS: &str =
    "INSERT INTO device_history (device_id, status, recorded_at) VALUES (?, ?, ?)";
const INSERT_THERMOSTAT: &str = "INSERT INTO thermostat_history (device_id, current_temp, target_temp, recorded_at) \
     VALUES (?, ?, ?, ?)";

/// `SQLite`-backed history sink.
pub struct SqliteHistorySink {
    pool: SqlitePool,
}

impl SqliteHistorySink {
    /// Create a new sink using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl HistorySink for SqliteHistorySink {
    fn mirror_device(&self, device: Device) -> impl Future<Output = Result<(), HubError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(UPSERT_DEVICE)
                .bind(device.id.as_str())
                .bind(device.kind.to_string())
                .bind(device.status.map(|s| s.to_string()))
                .bind(device.current_temp)
                .bind(device.target_temp)
                .bind(device.setback_temp)
                .bind(device.room_id.map(|id| id.to_string()))
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(())
        }
    }

    fn append_status(
        &self,
        device_id: DeviceId,
        status: WindowState,
    ) -> impl Future<Output = Result<(), HubError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(INSERT_STATUS)
                .bind(device_id.as_str())
                .bind(status.to_string())
                .bind(chrono::Utc::now())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(())
        }
    }

    fn append_thermostat(
        &self,
        device_id: DeviceId,
        current_temp: f64,
        target_temp: f64,
    ) -> impl Future<Output = Result<(), HubError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(INSERT_THERMOSTAT)
                .bind(device_id.as_str())
                .bind(current_temp)
                .bind(target_temp)
                .bind(chrono::Utc::now())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(())
        }
    }
}
