//! JSON REST handlers for devices.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use heimhub_app::ports::{BusPublisher, HistorySink};
use heimhub_domain::device::Device;
use heimhub_domain::id::DeviceId;
use heimhub_domain::message::StatusPatch;

use crate::error::ApiError;
use crate::state::AppState;

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<Device>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the get endpoint.
pub enum GetResponse {
    Ok(Json<Device>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the status-command endpoint.
pub enum SendStatusResponse {
    /// The command was relayed to the bus; the registry reflects it once
    /// the device reports back.
    Accepted,
}

impl IntoResponse for SendStatusResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Accepted => StatusCode::ACCEPTED.into_response(),
        }
    }
}

/// `GET /api/devices`
pub async fn list<B, H>(State(state): State<AppState<B, H>>) -> ListResponse
where
    B: BusPublisher + Send + Sync + 'static,
    H: HistorySink + Send + Sync + 'static,
{
    ListResponse::Ok(Json(state.hub.list_devices().await))
}

/// `GET /api/devices/:id`
pub async fn get<B, H>(
    State(state): State<AppState<B, H>>,
    Path(id): Path<String>,
) -> Result<GetResponse, ApiError>
where
    B: BusPublisher + Send + Sync + 'static,
    H: HistorySink + Send + Sync + 'static,
{
    let device = state.hub.get_device(&DeviceId::from(id)).await?;
    Ok(GetResponse::Ok(Json(device)))
}

/// `POST /api/devices/:id/status`
pub async fn send_status<B, H>(
    State(state): State<AppState<B, H>>,
    Path(id): Path<String>,
    Json(patch): Json<StatusPatch>,
) -> Result<SendStatusResponse, ApiError>
where
    B: BusPublisher + Send + Sync + 'static,
    H: HistorySink + Send + Sync + 'static,
{
    state.hub.send_status(DeviceId::from(id), patch).await?;
    Ok(SendStatusResponse::Accepted)
}
