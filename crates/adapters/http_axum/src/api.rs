//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod devices;
#[allow(clippy::missing_errors_doc)]
pub mod rooms;
pub mod system;

use axum::Router;
use axum::routing::{get, post, put};

use heimhub_app::ports::{BusPublisher, HistorySink};

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<B, H>() -> Router<AppState<B, H>>
where
    B: BusPublisher + Send + Sync + 'static,
    H: HistorySink + Send + Sync + 'static,
{
    Router::new()
        // Devices
        .route("/devices", get(devices::list::<B, H>))
        .route("/devices/{id}", get(devices::get::<B, H>))
        .route("/devices/{id}/status", post(devices::send_status::<B, H>))
        // Rooms
        .route(
            "/rooms",
            get(rooms::list::<B, H>).post(rooms::create::<B, H>),
        )
        .route(
            "/rooms/{id}",
            get(rooms::get::<B, H>).delete(rooms::delete::<B, H>),
        )
        .route("/rooms/{id}/devices", put(rooms::assign_devices::<B, H>))
        .route(
            "/rooms/{id}/temperature",
            put(rooms::set_temperature::<B, H>),
        )
        // Lifecycle
        .route("/shutdown", post(system::shutdown::<B, H>))
}
