// HTTP request handlers
use crate::application::shutdown;
use crate::domain::view::DashboardView;
use crate::domain::window::Controls;
use crate::infrastructure::http_response::{accepts_brotli, html_response};
use crate::infrastructure::page::DashboardTemplate;
use crate::presentation::app_state::AppState;
use askama::Template;
use axum::{
    Form, Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{
        IntoResponse, Redirect,
        sse::{Event, KeepAlive, Sse},
    },
};
use futures::stream::Stream;
use serde::Deserialize;
use std::convert::Infallible;
use std::sync::Arc;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::WatchStream;

/// Fields of the controls form. Missing fields keep their current value.
#[derive(Debug, Deserialize)]
pub struct ControlsForm {
    pub minutes: Option<String>,
    pub bucket: Option<String>,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Dashboard page for the latest committed view
pub async fn dashboard_page(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let compress = accepts_brotli(&headers);
    let view = state.refresh_service.latest();
    let html = match DashboardTemplate::new(&view, state.refresh_seconds).render() {
        Ok(html) => html,
        Err(e) => {
            tracing::error!("Template render error: {}", e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    match html_response(html, compress).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

pub async fn view_json(State(state): State<Arc<AppState>>) -> Json<DashboardView> {
    Json(state.refresh_service.latest().as_ref().clone())
}

/// Server-sent events: the current view, then one event per committed view,
/// until shutdown
pub async fn view_events(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let views = WatchStream::new(state.refresh_service.subscribe());
    let events = views.filter_map(|view| match Event::default().event("view").json_data(&*view) {
        Ok(event) => Some(Ok(event)),
        Err(e) => {
            tracing::warn!("Failed to encode view {} for SSE: {}", view.generation, e);
            None
        }
    });
    let events = futures::StreamExt::take_until(
        events,
        shutdown::signalled(state.shutdown.clone()),
    );

    Sse::new(events).keep_alive(KeepAlive::default())
}

/// Manual refresh: apply the submitted controls, run one cycle, back to the page
pub async fn trigger_refresh(
    State(state): State<Arc<AppState>>,
    form: Option<Form<ControlsForm>>,
) -> Redirect {
    let service = &state.refresh_service;
    let current = service.controls().await;

    let controls = match form {
        Some(Form(form)) => Controls::new(
            form.minutes.or(current.minutes),
            form.bucket.unwrap_or(current.bucket),
        ),
        None => current,
    };
    tracing::info!(
        "Manual refresh (minutes={:?}, bucket={})",
        controls.minutes,
        controls.bucket
    );

    service.set_controls(controls).await;
    service.refresh().await;

    Redirect::to("/")
}
