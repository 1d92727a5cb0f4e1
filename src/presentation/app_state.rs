// Application state for HTTP handlers
use crate::application::editor_service::EditorService;
use crate::application::refresh_service::RefreshService;

#[derive(Clone)]
pub struct AppState {
    pub refresh_service: RefreshService,
    pub editor_service: EditorService,
}
