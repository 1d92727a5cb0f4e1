// Rule authoring: watch mode and selector choices
use super::element::VisualElement;
use super::error::PanelError;
use super::rule::{DataSourceRef, Operation, PanelOptions};
use super::telemetry::DataFrame;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectOption<T> {
    pub label: String,
    pub value: T,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectGroup<T> {
    pub label: String,
    pub options: Vec<SelectOption<T>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "rule", rename_all = "camelCase")]
pub enum WatchState {
    #[default]
    Idle,
    Watching(usize),
}

/// Editor state for one panel. While a rule is watched, the element the
/// user clicks on the drawing surface is bound to it.
#[derive(Debug, Clone, Default)]
pub struct EditorSession {
    watch: WatchState,
    selected: Option<VisualElement>,
}

impl EditorSession {
    pub fn watch(&self) -> WatchState {
        self.watch
    }

    pub fn selected(&self) -> Option<&VisualElement> {
        self.selected.as_ref()
    }

    /// Turns watch mode on for `index` or back off. Only one rule is
    /// watched at a time; switching it on binds the current selection right
    /// away. Returns whether `options` changed.
    pub fn set_watch(
        &mut self,
        index: usize,
        enabled: bool,
        options: &mut PanelOptions,
    ) -> Result<bool, PanelError> {
        options.check_index(index)?;
        if !enabled {
            self.watch = WatchState::Idle;
            return Ok(false);
        }
        self.watch = WatchState::Watching(index);
        Ok(self.bind_selection(options))
    }

    /// Pointer-up from the drawing surface; `hit` is `None` when the click
    /// landed on empty canvas. Returns whether `options` changed.
    pub fn pointer_up(&mut self, hit: Option<VisualElement>, options: &mut PanelOptions) -> bool {
        self.selected = hit;
        self.bind_selection(options)
    }

    /// Keeps the watched position in step with a rule removal.
    pub fn rule_removed(&mut self, index: usize) {
        if let WatchState::Watching(watched) = self.watch {
            self.watch = match watched {
                w if w == index => WatchState::Idle,
                w if w > index => WatchState::Watching(w - 1),
                w => WatchState::Watching(w),
            };
        }
    }

    /// Drops a watch that no longer points at an existing rule, after the
    /// whole rule list was replaced.
    pub fn rules_replaced(&mut self, len: usize) {
        if matches!(self.watch, WatchState::Watching(i) if i >= len) {
            self.watch = WatchState::Idle;
        }
    }

    fn bind_selection(&self, options: &mut PanelOptions) -> bool {
        let (WatchState::Watching(index), Some(selected)) = (self.watch, self.selected.as_ref()) else {
            return false;
        };
        match options.rules.get_mut(index) {
            Some(rule) if rule.element_id.as_deref() != Some(selected.id.as_str()) => {
                rule.element_id = Some(selected.id.clone());
                true
            }
            _ => false,
        }
    }

    /// Choices for the element-id selector of rule `index`: the selection
    /// and its bound elements while that rule is watched, otherwise every
    /// element that is not deleted.
    pub fn element_choices(&self, index: usize, options: &PanelOptions) -> Vec<SelectOption<String>> {
        if self.watch == WatchState::Watching(index) {
            let Some(selected) = self.selected.as_ref() else {
                return Vec::new();
            };
            let mut out = vec![SelectOption {
                label: selected.label(),
                value: selected.id.clone(),
            }];
            out.extend(selected.bound_elements.iter().flatten().map(|bound| SelectOption {
                label: bound.label(),
                value: bound.id.clone(),
            }));
            return out;
        }

        options
            .elements
            .iter()
            .filter(|el| !el.is_deleted)
            .map(|el| SelectOption {
                label: el.label(),
                value: el.id.clone(),
            })
            .collect()
    }
}

/// One group per frame, one choice per field.
pub fn data_source_choices(frames: &[DataFrame]) -> Vec<SelectGroup<DataSourceRef>> {
    frames
        .iter()
        .map(|frame| {
            if frame.ref_id.is_none() {
                tracing::debug!("frame without refId offered as data source");
            }
            let series = frame.series_id();
            SelectGroup {
                label: series.to_string(),
                options: frame
                    .fields
                    .iter()
                    .map(|field| SelectOption {
                        label: field.name.clone(),
                        value: DataSourceRef::new(series, field.name.clone()),
                    })
                    .collect(),
            }
        })
        .collect()
}

pub fn operation_choices() -> Vec<SelectOption<Operation>> {
    Operation::ALL
        .iter()
        .map(|op| SelectOption {
            label: op.label().to_string(),
            value: *op,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::element::BoundElement;
    use crate::domain::telemetry::Field;
    use std::sync::Arc;

    fn options() -> PanelOptions {
        let mut deleted = VisualElement::new("gone", "ellipse");
        deleted.is_deleted = true;
        let mut options = PanelOptions {
            rules: vec![],
            elements: vec![
                Arc::new(VisualElement::new("rect", "rectangle").with_background("#fff")),
                Arc::new(deleted),
                Arc::new(VisualElement::new("label", "text")),
            ],
        };
        options.add_rule();
        options.add_rule();
        options
    }

    fn rect_with_label() -> VisualElement {
        VisualElement::new("rect", "rectangle").with_bound(vec![BoundElement::new("label", "text")])
    }

    #[test]
    fn test_click_binds_watched_rule() {
        let mut options = options();
        let mut session = EditorSession::default();
        assert!(!session.set_watch(1, true, &mut options).unwrap());
        assert!(session.pointer_up(Some(rect_with_label()), &mut options));
        assert_eq!(options.rules[1].element_id.as_deref(), Some("rect"));
        assert_eq!(options.rules[0].element_id, None);
    }

    #[test]
    fn test_click_while_idle_only_selects() {
        let mut options = options();
        let mut session = EditorSession::default();
        assert!(!session.pointer_up(Some(rect_with_label()), &mut options));
        assert_eq!(session.selected().map(|e| e.id.as_str()), Some("rect"));
        assert!(options.rules.iter().all(|r| r.element_id.is_none()));
    }

    #[test]
    fn test_enabling_watch_binds_existing_selection() {
        let mut options = options();
        let mut session = EditorSession::default();
        session.pointer_up(Some(rect_with_label()), &mut options);
        assert!(session.set_watch(0, true, &mut options).unwrap());
        assert_eq!(options.rules[0].element_id.as_deref(), Some("rect"));
    }

    #[test]
    fn test_only_one_rule_watched() {
        let mut options = options();
        let mut session = EditorSession::default();
        session.set_watch(0, true, &mut options).unwrap();
        session.set_watch(1, true, &mut options).unwrap();
        assert_eq!(session.watch(), WatchState::Watching(1));
        session.set_watch(1, false, &mut options).unwrap();
        assert_eq!(session.watch(), WatchState::Idle);
        assert_eq!(
            session.set_watch(9, true, &mut options),
            Err(PanelError::RuleIndexOutOfRange { index: 9, len: 2 })
        );
    }

    #[test]
    fn test_empty_click_clears_selection() {
        let mut options = options();
        let mut session = EditorSession::default();
        session.set_watch(0, true, &mut options).unwrap();
        session.pointer_up(Some(rect_with_label()), &mut options);
        assert!(!session.pointer_up(None, &mut options));
        assert!(session.selected().is_none());
        assert!(session.element_choices(0, &options).is_empty());
        assert_eq!(options.rules[0].element_id.as_deref(), Some("rect"));
    }

    #[test]
    fn test_choices_while_watching_show_selection_and_bound() {
        let mut options = options();
        let mut session = EditorSession::default();
        session.set_watch(0, true, &mut options).unwrap();
        session.pointer_up(Some(rect_with_label()), &mut options);
        let choices = session.element_choices(0, &options);
        let labels: Vec<_> = choices.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["rectangle - rect", "text - label"]);
    }

    #[test]
    fn test_choices_when_not_watching_skip_deleted() {
        let mut options = options();
        let mut session = EditorSession::default();
        session.set_watch(0, true, &mut options).unwrap();
        let values: Vec<_> = session
            .element_choices(1, &options)
            .into_iter()
            .map(|c| c.value)
            .collect();
        assert_eq!(values, vec!["rect".to_string(), "label".to_string()]);
    }

    #[test]
    fn test_watch_follows_rule_removal() {
        let mut session = EditorSession {
            watch: WatchState::Watching(2),
            selected: None,
        };
        session.rule_removed(0);
        assert_eq!(session.watch(), WatchState::Watching(1));
        session.rule_removed(3);
        assert_eq!(session.watch(), WatchState::Watching(1));
        session.rule_removed(1);
        assert_eq!(session.watch(), WatchState::Idle);
    }

    #[test]
    fn test_watch_dropped_when_rules_shrink() {
        let mut session = EditorSession {
            watch: WatchState::Watching(1),
            selected: None,
        };
        session.rules_replaced(2);
        assert_eq!(session.watch(), WatchState::Watching(1));
        session.rules_replaced(1);
        assert_eq!(session.watch(), WatchState::Idle);
    }

    #[test]
    fn test_data_source_choices() {
        let frames = vec![
            DataFrame::new(
                Some("A".to_string()),
                vec![Field::new("time", vec![]), Field::new("temp", vec![])],
            ),
            DataFrame::new(None, vec![Field::new("level", vec![])]),
        ];
        let groups = data_source_choices(&frames);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].options[1].value, DataSourceRef::new("A", "temp"));
        assert_eq!(groups[1].label, "");
        assert_eq!(groups[1].options[0].value, DataSourceRef::new("", "level"));
    }

    #[test]
    fn test_operation_choices() {
        let labels: Vec<_> = operation_choices().into_iter().map(|c| c.label).collect();
        assert_eq!(labels, vec!["Replace Text", "Change Stroke", "Change Background"]);
    }
}
