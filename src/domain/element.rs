// Drawing-surface elements
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An element owned by the drawing surface. Only the properties the rules
/// read or write are typed; everything else (geometry, stroke, version
/// counters) is carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualElement {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub is_deleted: bool,
    #[serde(default)]
    pub bound_elements: Option<Vec<BoundElement>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundElement {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl VisualElement {
    pub fn new(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            is_deleted: false,
            bound_elements: None,
            background_color: None,
            extra: Map::new(),
        }
    }

    pub fn with_background(mut self, color: impl Into<String>) -> Self {
        self.background_color = Some(color.into());
        self
    }

    pub fn with_bound(mut self, bound: Vec<BoundElement>) -> Self {
        self.bound_elements = Some(bound);
        self
    }

    /// Whether the element has a fill that can be recolored. Elements
    /// without one (or with an empty one) are left alone.
    pub fn has_background(&self) -> bool {
        self.background_color.as_deref().is_some_and(|c| !c.is_empty())
    }

    /// Copy of the element with a new background color.
    pub fn recolored(&self, color: &str) -> Self {
        Self {
            background_color: Some(color.to_string()),
            ..self.clone()
        }
    }

    /// Selector label, e.g. `rectangle - a1b2`.
    pub fn label(&self) -> String {
        format!("{} - {}", self.kind, self.id)
    }
}

impl BoundElement {
    pub fn new(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
        }
    }

    pub fn label(&self) -> String {
        format!("{} - {}", self.kind, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unknown_properties_survive_round_trip() {
        let raw = json!({
            "id": "rect-1",
            "type": "rectangle",
            "x": 10,
            "y": 20,
            "strokeColor": "#1e1e1e",
            "backgroundColor": "transparent",
            "isDeleted": false,
            "boundElements": [{ "id": "text-1", "type": "text" }]
        });
        let element: VisualElement = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(element.kind, "rectangle");
        assert_eq!(element.extra.get("strokeColor"), Some(&json!("#1e1e1e")));
        assert_eq!(serde_json::to_value(&element).unwrap(), raw);
    }

    #[test]
    fn test_has_background() {
        assert!(!VisualElement::new("a", "line").has_background());
        assert!(!VisualElement::new("a", "line").with_background("").has_background());
        assert!(VisualElement::new("a", "rectangle").with_background("transparent").has_background());
    }

    #[test]
    fn test_recolored_keeps_everything_else() {
        let mut element = VisualElement::new("a", "ellipse").with_background("#fff");
        element.extra.insert("roughness".to_string(), json!(1));
        let recolored = element.recolored("red");
        assert_eq!(recolored.background_color.as_deref(), Some("red"));
        assert_eq!(recolored.extra, element.extra);
        assert_eq!(element.background_color.as_deref(), Some("#fff"));
    }
}
