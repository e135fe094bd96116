// Route table
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    dashboard_page, health_check, trigger_refresh, view_events, view_json,
};
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn build(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(dashboard_page))
        .route("/refresh", post(trigger_refresh))
        .route("/view.json", get(view_json))
        .route("/events", get(view_events))
        .route("/healthz", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
