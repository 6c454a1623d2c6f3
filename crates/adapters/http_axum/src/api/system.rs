//! Lifecycle endpoints.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use heimhub_app::ports::{BusPublisher, HistorySink};

use crate::state::AppState;

/// Possible responses from the shutdown endpoint.
pub enum ShutdownResponse {
    Accepted,
}

impl IntoResponse for ShutdownResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Accepted => StatusCode::ACCEPTED.into_response(),
        }
    }
}

/// `POST /api/shutdown`
///
/// Asks the server to stop; the response is sent before the listener
/// closes.
pub async fn shutdown<B, H>(State(state): State<AppState<B, H>>) -> ShutdownResponse
where
    B: BusPublisher + Send + Sync + 'static,
    H: HistorySink + Send + Sync + 'static,
{
    tracing::info!("shutdown requested via HTTP");
    let _ = state.shutdown.send(()).await;
    ShutdownResponse::Accepted
}
