//! JSON REST handlers for rooms.

use std::str::FromStr;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use heimhub_app::ports::{BusPublisher, HistorySink};
use heimhub_domain::error::ValidationError;
use heimhub_domain::id::{DeviceId, RoomId};
use heimhub_domain::message::TempCommand;
use heimhub_domain::room::Room;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for creating a room.
#[derive(Deserialize)]
pub struct CreateRoomRequest {
    pub name: String,
}

/// Request body for replacing a room's device assignment.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignDevicesRequest {
    pub device_ids: Vec<DeviceId>,
}

fn parse_room_id(id: &str) -> Result<RoomId, ApiError> {
    RoomId::from_str(id)
        .map_err(|_| {
            ApiError::from(heimhub_domain::error::HubError::from(
                ValidationError::MalformedId(id.to_string()),
            ))
        })
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<Room>>),
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
    Ok(Json<Room>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the create endpoint.
pub enum CreateResponse {
    Created(Json<Room>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// Possible responses from the delete endpoint.
pub enum DeleteResponse {
    NoContent,
}

impl IntoResponse for DeleteResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// `GET /api/rooms`
pub async fn list<B, H>(State(state): State<AppState<B, H>>) -> ListResponse
where
    B: BusPublisher + Send + Sync + 'static,
    H: HistorySink + Send + Sync + 'static,
{
    ListResponse::Ok(Json(state.hub.list_rooms().await))
}

/// `GET /api/rooms/:id`
pub async fn get<B, H>(
    State(state): State<AppState<B, H>>,
    Path(id): Path<String>,
) -> Result<GetResponse, ApiError>
where
    B: BusPublisher + Send + Sync + 'static,
    H: HistorySink + Send + Sync + 'static,
{
    let room = state.hub.get_room(parse_room_id(&id)?).await?;
    Ok(GetResponse::Ok(Json(room)))
}

/// `POST /api/rooms`
pub async fn create<B, H>(
    State(state): State<AppState<B, H>>,
    Json(req): Json<CreateRoomRequest>,
) -> Result<CreateResponse, ApiError>
where
    B: BusPublisher + Send + Sync + 'static,
    H: HistorySink + Send + Sync + 'static,
{
    let room = state.hub.create_room(req.name).await?;
    Ok(CreateResponse::Created(Json(room)))
}

/// `DELETE /api/rooms/:id`
pub async fn delete<B, H>(
    State(state): State<AppState<B, H>>,
    Path(id): Path<String>,
) -> Result<DeleteResponse, ApiError>
where
    B: BusPublisher + Send + Sync + 'static,
    H: HistorySink + Send + Sync + 'static,
{
    state.hub.delete_room(parse_room_id(&id)?).await?;
    Ok(DeleteResponse::NoContent)
}

/// `PUT /api/rooms/:id/devices`
pub async fn assign_devices<B, H>(
    State(state): State<AppState<B, H>>,
    Path(id): Path<String>,
    Json(req): Json<AssignDevicesRequest>,
) -> Result<GetResponse, ApiError>
where
    B: BusPublisher + Send + Sync + 'static,
    H: HistorySink + Send + Sync + 'static,
{
    let room = state
        .hub
        .assign_devices(parse_room_id(&id)?, req.device_ids)
        .await?;
    Ok(GetResponse::Ok(Json(room)))
}

/// `PUT /api/rooms/:id/temperature`
pub async fn set_temperature<B, H>(
    State(state): State<AppState<B, H>>,
    Path(id): Path<String>,
    Json(command): Json<TempCommand>,
) -> Result<GetResponse, ApiError>
where
    B: BusPublisher + Send + Sync + 'static,
    H: HistorySink + Send + Sync + 'static,
{
    let room = state
        .hub
        .set_room_temperature(parse_room_id(&id)?, command)
        .await?;
    Ok(GetResponse::Ok(Json(room)))
}
