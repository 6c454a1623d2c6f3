//! End-to-end smoke tests for the full heimhubd stack.
//!
//! Each test wires the real hub service, an in-memory `SQLite` sink, and
//! the real axum router, then exercises the HTTP layer via
//! `tower::ServiceExt::oneshot` — no TCP port is bound and no broker is
//! required. Device traffic is injected as decoded bus messages, the same
//! shape the MQTT task delivers at runtime.

use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use tower::ServiceExt;

use heimhub_adapter_http_axum::router;
use heimhub_adapter_http_axum::state::AppState;
use heimhub_adapter_storage_sqlite_sqlx::SqliteHistorySink;
use heimhub_app::hub::HubService;
use heimhub_app::ports::BusPublisher;
use heimhub_app::registry::DeviceRegistry;
use heimhub_app::rooms::RoomStore;
use heimhub_domain::device::{DeviceKind, WindowState};
use heimhub_domain::error::HubError;
use heimhub_domain::message::{Announcement, BusMessage, StatusPatch};

#[derive(Default)]
struct RecordingBus {
    messages: Mutex<Vec<BusMessage>>,
}

impl RecordingBus {
    fn sent(&self) -> Vec<BusMessage> {
        self.messages.lock().unwrap().clone()
    }
}

impl BusPublisher for RecordingBus {
    fn publish(&self, message: BusMessage) -> impl Future<Output = Result<(), HubError>> + Send {
        self.messages.lock().unwrap().push(message);
        async { Ok(()) }
    }
}

struct TestStack {
    app: axum::Router,
    hub: Arc<HubService<Arc<RecordingBus>, SqliteHistorySink>>,
    bus: Arc<RecordingBus>,
    pool: sqlx::SqlitePool,
}

/// Build a fully-wired stack backed by an in-memory `SQLite` sink.
async fn stack() -> TestStack {
    let db = heimhub_adapter_storage_sqlite_sqlx::Config {
        database_url: "sqlite::memory:".to_string(),
    }
    .build()
    .await
    .expect("in-memory database should initialise");
    let pool = db.pool().clone();

    let bus = Arc::new(RecordingBus::default());
    let hub = Arc::new(HubService::new(
        Arc::new(DeviceRegistry::new()),
        Arc::new(RoomStore::new()),
        Arc::clone(&bus),
        SqliteHistorySink::new(pool.clone()),
    ));

    let (shutdown_tx, _shutdown_rx) = tokio::sync::mpsc::channel(1);
    let app = router::build(AppState::new(Arc::clone(&hub), shutdown_tx));

    TestStack {
        app,
        hub,
        bus,
        pool,
    }
}

fn json_request(method: Method, uri: &str, body: String) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn register(id: &str, kind: DeviceKind, status: Option<WindowState>, temp: Option<f64>) -> BusMessage {
    BusMessage::Register(Announcement {
        id: id.into(),
        kind,
        status,
        current_temp: temp,
        target_temp: temp,
    })
}

#[tokio::test]
async fn should_return_ok_when_health_check_called() {
    let stack = stack().await;

    let resp = stack
        .app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn should_expose_registered_devices_over_http() {
    let stack = stack().await;
    stack
        .hub
        .handle_message(register(
            "fensterkontakt_1",
            DeviceKind::WindowContact,
            Some(WindowState::Closed),
            None,
        ))
        .await;

    let resp = stack
        .app
        .oneshot(
            Request::builder()
                .uri("/api/devices")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["id"], "fensterkontakt_1");
    assert_eq!(body[0]["type"], "window_contact");
    assert_eq!(body[0]["status"], "closed");
}

#[tokio::test]
async fn should_drive_office_scenario_through_http_and_bus() {
    let stack = stack().await;

    // Devices come up and announce themselves.
    stack
        .hub
        .handle_message(register(
            "fensterkontakt_1",
            DeviceKind::WindowContact,
            Some(WindowState::Closed),
            None,
        ))
        .await;
    stack
        .hub
        .handle_message(register(
            "thermostat_1",
            DeviceKind::Thermostat,
            None,
            Some(21.0),
        ))
        .await;

    // Operator creates the Office and assigns both devices.
    let resp = stack
        .app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/rooms",
            r#"{"name":"Office"}"#.to_string(),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let room = json_body(resp).await;
    let room_id = room["id"].as_str().unwrap().to_string();

    let resp = stack
        .app
        .clone()
        .oneshot(json_request(
            Method::PUT,
            &format!("/api/rooms/{room_id}/devices"),
            r#"{"deviceIds":["thermostat_1","fensterkontakt_1"]}"#.to_string(),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // Operator sets 22 °C with an 18 °C setback.
    let resp = stack
        .app
        .clone()
        .oneshot(json_request(
            Method::PUT,
            &format!("/api/rooms/{room_id}/temperature"),
            r#"{"roomTemp":22.0,"setbackTemp":18.0}"#.to_string(),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // Window was closed at registration, so the derivation runs right away.
    let resp = stack
        .app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/devices/thermostat_1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let device = json_body(resp).await;
    assert_eq!(device["currentTemp"], 22.0);

    // The window opens: the thermostat falls to the setback.
    stack
        .hub
        .handle_message(BusMessage::Status {
            device_id: "fensterkontakt_1".into(),
            patch: StatusPatch::window(WindowState::Open),
        })
        .await;

    let resp = stack
        .app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/devices/thermostat_1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let device = json_body(resp).await;
    assert_eq!(device["currentTemp"], 18.0);
    assert_eq!(device["targetTemp"], 22.0);

    // The window closes again: back to the target.
    stack
        .hub
        .handle_message(BusMessage::Status {
            device_id: "fensterkontakt_1".into(),
            patch: StatusPatch::window(WindowState::Closed),
        })
        .await;

    let resp = stack
        .app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/devices/thermostat_1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let device = json_body(resp).await;
    assert_eq!(device["currentTemp"], 22.0);

    // The hub commanded the thermostat over the bus.
    assert!(stack.bus.sent().iter().any(|m| matches!(
        m,
        BusMessage::SetTemp { device_id, .. } if *device_id == "thermostat_1".into()
    )));

    // And the sink kept a history of the derived temperatures.
    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM thermostat_history WHERE device_id = ?")
            .bind("thermostat_1")
            .fetch_one(&stack.pool)
            .await
            .unwrap();
    assert!(count >= 2);
}

#[tokio::test]
async fn should_relay_window_command_without_touching_registry() {
    let stack = stack().await;
    stack
        .hub
        .handle_message(register(
            "fensterkontakt_1",
            DeviceKind::WindowContact,
            Some(WindowState::Closed),
            None,
        ))
        .await;

    let resp = stack
        .app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/devices/fensterkontakt_1/status",
            r#"{"status":"open"}"#.to_string(),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::ACCEPTED);

    // The command went out on the bus.
    assert!(stack.bus.sent().iter().any(|m| matches!(
        m,
        BusMessage::Status { device_id, patch }
            if *device_id == "fensterkontakt_1".into()
                && patch.status == Some(WindowState::Open)
    )));

    // The registry still shows the reported state.
    let resp = stack
        .app
        .oneshot(
            Request::builder()
                .uri("/api/devices/fensterkontakt_1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let device = json_body(resp).await;
    assert_eq!(device["status"], "closed");
}

#[tokio::test]
async fn should_reject_command_for_unknown_device() {
    let stack = stack().await;

    let resp = stack
        .app
        .oneshot(json_request(
            Method::POST,
            "/api/devices/ghost/status",
            r#"{"status":"open"}"#.to_string(),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn should_delete_room_and_clear_back_references() {
    let stack = stack().await;
    stack
        .hub
        .handle_message(register(
            "thermostat_1",
            DeviceKind::Thermostat,
            None,
            Some(21.0),
        ))
        .await;

    let resp = stack
        .app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/rooms",
            r#"{"name":"Office"}"#.to_string(),
        ))
        .await
        .unwrap();
    let room = json_body(resp).await;
    let room_id = room["id"].as_str().unwrap().to_string();

    stack
        .app
        .clone()
        .oneshot(json_request(
            Method::PUT,
            &format!("/api/rooms/{room_id}/devices"),
            r#"{"deviceIds":["thermostat_1"]}"#.to_string(),
        ))
        .await
        .unwrap();

    let resp = stack
        .app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::DELETE)
                .uri(format!("/api/rooms/{room_id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = stack
        .app
        .oneshot(
            Request::builder()
                .uri("/api/devices/thermostat_1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let device = json_body(resp).await;
    assert!(device.get("roomId").is_none());
}
