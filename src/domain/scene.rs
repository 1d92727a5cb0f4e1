// Scene pushed to the drawing surface
use super::element::VisualElement;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneUpdate {
    pub panel_id: String,
    pub sequence: u64,
    pub elements: Vec<Arc<VisualElement>>,
}

impl SceneUpdate {
    pub fn new(panel_id: String, sequence: u64, elements: Vec<Arc<VisualElement>>) -> Self {
        Self {
            panel_id,
            sequence,
            elements,
        }
    }
}
