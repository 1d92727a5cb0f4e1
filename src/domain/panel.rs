// Panel domain model
use super::field_config::FieldConfig;
use super::rule::PanelOptions;
use serde::{Deserialize, Serialize};

/// A query the data source runs for the panel; its results are tagged
/// with `ref_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryTarget {
    #[serde(rename = "refId")]
    pub ref_id: String,
    pub query: String,
}

/// One diagram panel in the host's panel JSON layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Panel {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub targets: Vec<QueryTarget>,
    #[serde(default)]
    pub field_config: FieldConfig,
    #[serde(default)]
    pub options: PanelOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelSummary {
    pub id: String,
    pub title: String,
}

impl Panel {
    pub fn summary(&self) -> PanelSummary {
        PanelSummary {
            id: self.id.clone(),
            title: if self.title.is_empty() {
                Self::format_title(&self.id)
            } else {
                self.title.clone()
            },
        }
    }

    fn format_title(id: &str) -> String {
        // "pump_room_" -> "pump room"
        id.trim_end_matches('_').replace(['_', '-'], " ")
    }
}
