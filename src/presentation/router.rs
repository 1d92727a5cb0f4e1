// Route table
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    add_rule, data_sources, edit_rule, element_choices, get_options, get_scene, health_check,
    list_panels, operations, pointer_up, put_elements, put_options, remove_rule, set_watch,
    stream_scene,
};
use axum::{
    routing::{get, patch, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/operations", get(operations))
        .route("/panels", get(list_panels))
        .route("/panels/:id/options", get(get_options).put(put_options))
        .route("/panels/:id/elements", put(put_elements))
        .route("/panels/:id/scene", get(get_scene))
        .route("/panels/:id/stream", get(stream_scene))
        .route("/panels/:id/data-sources", get(data_sources))
        .route("/panels/:id/pointer-up", post(pointer_up))
        .route("/panels/:id/rules", post(add_rule))
        .route("/panels/:id/rules/:index", patch(edit_rule).delete(remove_rule))
        .route("/panels/:id/rules/:index/watch", put(set_watch))
        .route("/panels/:id/rules/:index/element-choices", get(element_choices))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
