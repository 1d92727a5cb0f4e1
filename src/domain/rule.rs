// Rules and the persisted panel options
use super::element::VisualElement;
use super::error::PanelError;
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::Arc;

/// Visual change a rule performs. Persisted as the host's numeric enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Operation {
    ReplaceText,
    Stroke,
    Background,
}

impl Operation {
    pub const ALL: [Operation; 3] = [Operation::ReplaceText, Operation::Stroke, Operation::Background];

    pub fn label(&self) -> &'static str {
        match self {
            Operation::ReplaceText => "Replace Text",
            Operation::Stroke => "Change Stroke",
            Operation::Background => "Change Background",
        }
    }
}

impl From<Operation> for u8 {
    fn from(op: Operation) -> Self {
        match op {
            Operation::ReplaceText => 0,
            Operation::Stroke => 1,
            Operation::Background => 2,
        }
    }
}

impl TryFrom<u8> for Operation {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Operation::ReplaceText),
            1 => Ok(Operation::Stroke),
            2 => Ok(Operation::Background),
            other => Err(format!("unknown operation {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DataSourceRef {
    pub series: String,
    pub field: String,
}

impl DataSourceRef {
    pub fn new(series: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            series: series.into(),
            field: field.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    #[serde(default, deserialize_with = "lenient_operation")]
    pub op: Option<Operation>,
    #[serde(default)]
    pub data_source: Option<DataSourceRef>,
    #[serde(default)]
    pub element_id: Option<String>,
}

/// An `op` this build does not know leaves the rule unset instead of
/// rejecting the whole panel.
fn lenient_operation<'de, D>(deserializer: D) -> Result<Option<Operation>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| {
        let op = value
            .as_u64()
            .and_then(|n| u8::try_from(n).ok())
            .and_then(|n| Operation::try_from(n).ok());
        if op.is_none() {
            tracing::warn!("Ignoring unknown rule operation {}", value);
        }
        op
    }))
}

/// A rule with every part set, ready to evaluate.
#[derive(Debug, Clone, Copy)]
pub struct CompleteRule<'a> {
    pub op: Operation,
    pub data_source: &'a DataSourceRef,
    pub element_id: &'a str,
}

impl Rule {
    pub fn new(op: Operation, data_source: DataSourceRef, element_id: impl Into<String>) -> Self {
        Self {
            op: Some(op),
            data_source: Some(data_source),
            element_id: Some(element_id.into()),
        }
    }

    /// `None` while the rule is still being edited.
    pub fn complete(&self) -> Option<CompleteRule<'_>> {
        Some(CompleteRule {
            op: self.op?,
            data_source: self.data_source.as_ref()?,
            element_id: self.element_id.as_deref()?,
        })
    }
}

/// A single edit to one rule field; `None` clears the field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "set", content = "value", rename_all = "camelCase")]
pub enum RuleEdit {
    Operation(Option<Operation>),
    DataSource(Option<DataSourceRef>),
    ElementId(Option<String>),
}

/// Panel options as persisted by the host: the rule list and the diagram.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PanelOptions {
    #[serde(default)]
    pub rules: Vec<Rule>,
    #[serde(default)]
    pub elements: Vec<Arc<VisualElement>>,
}

impl PanelOptions {
    pub fn add_rule(&mut self) -> usize {
        self.rules.push(Rule::default());
        self.rules.len() - 1
    }

    /// Removes the rule at `index`; later rules shift down by one.
    pub fn remove_rule(&mut self, index: usize) -> Result<Rule, PanelError> {
        self.check_index(index)?;
        Ok(self.rules.remove(index))
    }

    pub fn edit_rule(&mut self, index: usize, edit: RuleEdit) -> Result<(), PanelError> {
        let rule = self.rule_mut(index)?;
        match edit {
            RuleEdit::Operation(op) => rule.op = op,
            RuleEdit::DataSource(source) => rule.data_source = source,
            RuleEdit::ElementId(id) => rule.element_id = id,
        }
        Ok(())
    }

    pub fn rule_mut(&mut self, index: usize) -> Result<&mut Rule, PanelError> {
        self.check_index(index)?;
        Ok(&mut self.rules[index])
    }

    /// Stores the drawing surface's element list. Returns false when it is
    /// identical to the current one and nothing needs persisting.
    pub fn replace_elements(&mut self, elements: Vec<Arc<VisualElement>>) -> bool {
        if self.elements == elements {
            return false;
        }
        self.elements = elements;
        true
    }

    pub fn check_index(&self, index: usize) -> Result<(), PanelError> {
        if index >= self.rules.len() {
            return Err(PanelError::RuleIndexOutOfRange {
                index,
                len: self.rules.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rule_is_incomplete_until_all_parts_set() {
        let mut rule = Rule::default();
        assert!(rule.complete().is_none());
        rule.op = Some(Operation::Background);
        rule.data_source = Some(DataSourceRef::new("A", "temp"));
        assert!(rule.complete().is_none());
        rule.element_id = Some("rect".to_string());
        let complete = rule.complete().unwrap();
        assert_eq!(complete.element_id, "rect");
        assert_eq!(complete.op, Operation::Background);
    }

    #[test]
    fn test_options_use_host_layout() {
        let options: PanelOptions = serde_json::from_value(json!({
            "rules": [
                { "op": 2, "dataSource": { "series": "A", "field": "temp" }, "elementId": "rect" },
                { "op": null, "dataSource": null, "elementId": null }
            ],
            "elements": [{ "id": "rect", "type": "rectangle", "backgroundColor": "#fff" }]
        }))
        .unwrap();
        assert_eq!(options.rules[0].op, Some(Operation::Background));
        assert_eq!(options.rules[1], Rule::default());

        let back = serde_json::to_value(&options).unwrap();
        assert_eq!(back["rules"][0]["op"], json!(2));
        assert_eq!(back["rules"][1]["dataSource"], json!(null));
    }

    #[test]
    fn test_unknown_operation_leaves_rule_unset() {
        let options: PanelOptions = serde_json::from_value(json!({
            "rules": [
                { "op": 7, "dataSource": { "series": "A", "field": "temp" }, "elementId": "rect" },
                { "op": "fill", "elementId": "rect" },
                { "op": 2, "dataSource": { "series": "A", "field": "temp" }, "elementId": "rect" }
            ]
        }))
        .unwrap();
        assert_eq!(options.rules[0].op, None);
        assert!(options.rules[0].complete().is_none());
        assert_eq!(options.rules[1].op, None);
        assert_eq!(options.rules[2].op, Some(Operation::Background));
    }

    #[test]
    fn test_unknown_operation_is_rejected_outside_rules() {
        assert!(serde_json::from_value::<Operation>(json!(7)).is_err());
    }

    #[test]
    fn test_missing_keys_default_to_empty() {
        let options: PanelOptions = serde_json::from_value(json!({})).unwrap();
        assert!(options.rules.is_empty());
        assert!(options.elements.is_empty());
    }

    #[test]
    fn test_remove_rule_shifts_positions() {
        let mut options = PanelOptions::default();
        for id in ["a", "b", "c"] {
            let index = options.add_rule();
            options.edit_rule(index, RuleEdit::ElementId(Some(id.to_string()))).unwrap();
        }
        let removed = options.remove_rule(1).unwrap();
        assert_eq!(removed.element_id.as_deref(), Some("b"));
        assert_eq!(options.rules[1].element_id.as_deref(), Some("c"));
        assert_eq!(
            options.remove_rule(5),
            Err(PanelError::RuleIndexOutOfRange { index: 5, len: 2 })
        );
    }

    #[test]
    fn test_edit_clears_fields() {
        let mut options = PanelOptions {
            rules: vec![Rule::new(Operation::Stroke, DataSourceRef::new("A", "x"), "el")],
            elements: vec![],
        };
        options.edit_rule(0, RuleEdit::DataSource(None)).unwrap();
        assert_eq!(options.rules[0].data_source, None);
        assert_eq!(options.rules[0].op, Some(Operation::Stroke));
    }

    #[test]
    fn test_replace_elements_reports_changes() {
        let mut options = PanelOptions::default();
        let elements = vec![Arc::new(VisualElement::new("a", "rectangle"))];
        assert!(options.replace_elements(elements.clone()));
        assert!(!options.replace_elements(elements));
    }

    #[test]
    fn test_rule_edit_wire_format() {
        let edit: RuleEdit =
            serde_json::from_value(json!({ "set": "dataSource", "value": { "series": "A", "field": "t" } }))
                .unwrap();
        assert_eq!(edit, RuleEdit::DataSource(Some(DataSourceRef::new("A", "t"))));
        let clear: RuleEdit = serde_json::from_value(json!({ "set": "operation", "value": null })).unwrap();
        assert_eq!(clear, RuleEdit::Operation(None));
    }
}
