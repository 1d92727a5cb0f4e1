// Rule evaluator - Applies rules to a copy of the diagram on every refresh
use crate::domain::element::VisualElement;
use crate::domain::error::RuleError;
use crate::domain::field_config::FieldConfig;
use crate::domain::rule::{CompleteRule, Operation, Rule};
use crate::domain::telemetry::{extract_last_value, DataFrame};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Incomplete,
    Unimplemented(Operation),
    ElementNotFound,
    NoBackground,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RuleOutcome {
    Applied { element_id: String, color: String },
    Skipped(SkipReason),
    Failed(RuleError),
}

#[derive(Debug, Clone)]
pub struct Evaluation {
    pub elements: Vec<Arc<VisualElement>>,
    pub outcomes: Vec<RuleOutcome>,
}

impl Evaluation {
    pub fn failures(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, RuleOutcome::Failed(_)))
            .count()
    }
}

/// Returns the element collection after applying every rule.
pub fn apply(
    rules: &[Rule],
    base: &[Arc<VisualElement>],
    frames: &[DataFrame],
    field_config: &FieldConfig,
) -> Vec<Arc<VisualElement>> {
    evaluate(rules, base, frames, field_config).elements
}

/// Evaluates each rule independently against `base` without touching it.
/// Untouched elements are shared with `base`; a recolored element is a new
/// allocation. A failing rule is logged and does not stop the others.
pub fn evaluate(
    rules: &[Rule],
    base: &[Arc<VisualElement>],
    frames: &[DataFrame],
    field_config: &FieldConfig,
) -> Evaluation {
    let mut elements = base.to_vec();
    let mut outcomes = Vec::with_capacity(rules.len());

    for (index, rule) in rules.iter().enumerate() {
        let outcome = match rule.complete() {
            None => RuleOutcome::Skipped(SkipReason::Incomplete),
            Some(rule) => evaluate_rule(rule, &mut elements, frames, field_config),
        };
        if let RuleOutcome::Failed(error) = &outcome {
            tracing::debug!("Rule {} skipped: {}", index, error);
        }
        outcomes.push(outcome);
    }

    Evaluation { elements, outcomes }
}

fn evaluate_rule(
    rule: CompleteRule<'_>,
    elements: &mut [Arc<VisualElement>],
    frames: &[DataFrame],
    field_config: &FieldConfig,
) -> RuleOutcome {
    match rule.op {
        Operation::ReplaceText => RuleOutcome::Skipped(SkipReason::Unimplemented(Operation::ReplaceText)),
        Operation::Stroke => RuleOutcome::Skipped(SkipReason::Unimplemented(Operation::Stroke)),
        Operation::Background => {
            // The user may have deleted the element since the rule was made.
            let Some(slot) = elements.iter_mut().find(|el| el.id == rule.element_id) else {
                return RuleOutcome::Skipped(SkipReason::ElementNotFound);
            };
            if !slot.has_background() {
                return RuleOutcome::Skipped(SkipReason::NoBackground);
            }
            match resolve_color(rule, frames, field_config) {
                Ok(color) => {
                    *slot = Arc::new(slot.recolored(&color));
                    RuleOutcome::Applied {
                        element_id: rule.element_id.to_string(),
                        color,
                    }
                }
                Err(error) => RuleOutcome::Failed(error),
            }
        }
    }
}

fn resolve_color(
    rule: CompleteRule<'_>,
    frames: &[DataFrame],
    field_config: &FieldConfig,
) -> Result<String, RuleError> {
    let value = extract_last_value(rule.data_source, frames)?;
    let ladder = field_config.resolve_ladder(&rule.data_source.field)?;
    ladder
        .color_for(value)
        .map(str::to_string)
        .ok_or(RuleError::EmptyThresholds)
}
