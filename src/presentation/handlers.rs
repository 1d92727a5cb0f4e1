// HTTP request handlers
use crate::domain::authoring::operation_choices;
use crate::domain::element::VisualElement;
use crate::domain::error::PanelError;
use crate::domain::rule::{PanelOptions, RuleEdit};
use crate::infrastructure::channel_surface::ChannelSurface;
use crate::infrastructure::chunked_json::stream_from_receiver;
use crate::infrastructure::http_response::{accepts_brotli, json_response};
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Json, Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Deserialize)]
pub struct WatchToggle {
    pub enabled: bool,
}

/// Pointer-up event from the drawing surface. `element` is absent when the
/// click did not hit anything.
#[derive(Deserialize)]
pub struct PointerUp {
    #[serde(default)]
    pub element: Option<VisualElement>,
}

fn error_status(error: &anyhow::Error) -> StatusCode {
    match error.downcast_ref::<PanelError>() {
        Some(PanelError::NotFound(_)) => StatusCode::NOT_FOUND,
        Some(PanelError::RuleIndexOutOfRange { .. }) => StatusCode::BAD_REQUEST,
        None => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

async fn respond<T: Serialize>(result: anyhow::Result<T>, headers: &HeaderMap) -> Response {
    match result {
        Ok(data) => match json_response(&data, accepts_brotli(headers)).await {
            Ok(response) => response,
            Err(status) => status.into_response(),
        },
        Err(e) => {
            let status = error_status(&e);
            if status.is_server_error() {
                tracing::error!("Request failed: {:#}", e);
            } else {
                tracing::debug!("Request rejected: {}", e);
            }
            (status, e.to_string()).into_response()
        }
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// List all panels
pub async fn list_panels(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    respond(state.editor_service.list_panels().await, &headers).await
}

pub async fn get_options(
    Path(id): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    respond(state.editor_service.snapshot(&id).await, &headers).await
}

/// Options-editor `onChange`: persist the whole options value.
pub async fn put_options(
    Path(id): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(options): Json<PanelOptions>,
) -> Response {
    respond(state.editor_service.save_options(&id, options).await, &headers).await
}

/// Drawing-surface `onChange`: the user edited the diagram.
pub async fn put_elements(
    Path(id): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(elements): Json<Vec<Arc<VisualElement>>>,
) -> Response {
    respond(state.editor_service.replace_elements(&id, elements).await, &headers).await
}

/// Evaluate the panel once and return the resulting elements
pub async fn get_scene(
    Path(id): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let result = state
        .refresh_service
        .render_once(&id)
        .await
        .and_then(|scene| scene.ok_or_else(|| PanelError::NotFound(id.clone()).into()));
    respond(result, &headers).await
}

/// Stream a live scene for a panel, one chunk per refresh tick
pub async fn stream_scene(
    Path(id): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    if let Err(e) = state.editor_service.snapshot(&id).await {
        return respond::<()>(Err(e), &headers).await;
    }

    let (surface, rx) = ChannelSurface::channel();
    state.refresh_service.attach(&id, Arc::new(surface));
    stream_from_receiver(rx, accepts_brotli(&headers)).await.into_response()
}

pub async fn add_rule(
    Path(id): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    respond(state.editor_service.add_rule(&id).await, &headers).await
}

pub async fn edit_rule(
    Path((id, index)): Path<(String, usize)>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(edit): Json<RuleEdit>,
) -> Response {
    respond(state.editor_service.edit_rule(&id, index, edit).await, &headers).await
}

pub async fn remove_rule(
    Path((id, index)): Path<(String, usize)>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    respond(state.editor_service.remove_rule(&id, index).await, &headers).await
}

pub async fn set_watch(
    Path((id, index)): Path<(String, usize)>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(toggle): Json<WatchToggle>,
) -> Response {
    respond(state.editor_service.set_watch(&id, index, toggle.enabled).await, &headers).await
}

pub async fn element_choices(
    Path((id, index)): Path<(String, usize)>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    respond(state.editor_service.element_choices(&id, index).await, &headers).await
}

pub async fn pointer_up(
    Path(id): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(event): Json<PointerUp>,
) -> Response {
    respond(state.editor_service.pointer_up(&id, event.element).await, &headers).await
}

pub async fn data_sources(
    Path(id): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    respond(state.editor_service.data_source_choices(&id).await, &headers).await
}

pub async fn operations(headers: HeaderMap) -> Response {
    respond(Ok(operation_choices()), &headers).await
}
