// Application state for HTTP handlers
use crate::application::refresh_service::RefreshService;
use tokio::sync::watch;

#[derive(Clone)]
pub struct AppState {
    pub refresh_service: RefreshService,
    /// Page auto-reload period, matching the poll interval.
    pub refresh_seconds: u64,
    /// Ends open event streams so graceful shutdown can drain connections.
    pub shutdown: watch::Receiver<bool>,
}
