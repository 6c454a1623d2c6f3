//! Shared application state for axum handlers.

use std::sync::Arc;

use tokio::sync::mpsc;

use heimhub_app::hub::HubService;

/// Application state shared across all axum handlers.
///
/// Generic over the bus publisher and history sink to avoid dynamic
/// dispatch. `Clone` is implemented manually so the underlying types do not
/// need to be `Clone` — only the `Arc` wrapper is cloned.
pub struct AppState<B, H> {
    /// The hub service owning registry, rooms, and the control loop.
    pub hub: Arc<HubService<B, H>>,
    /// Signals the server to shut down when a message is sent.
    pub shutdown: mpsc::Sender<()>,
}

impl<B, H> Clone for AppState<B, H> {
    fn clone(&self) -> Self {
        Self {
            hub: Arc::clone(&self.hub),
            shutdown: self.shutdown.clone(),
        }
    }
}

impl<B, H> AppState<B, H> {
    /// Create a new application state over a shared hub service.
    pub fn new(hub: Arc<HubService<B, H>>, shutdown: mpsc::Sender<()>) -> Self {
        Self { hub, shutdown }
    }
}
