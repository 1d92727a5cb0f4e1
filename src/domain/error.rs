// Domain errors
use thiserror::Error;

/// Failures raised while resolving a single rule. They never leave the
/// evaluator: each one is logged and only the offending rule is dropped.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RuleError {
    #[error("series with refId '{0}' not found")]
    SeriesNotFound(String),

    #[error("field '{field}' not found in series '{series}'")]
    FieldNotFound { series: String, field: String },

    #[error("no value found in series '{series}' field '{field}'")]
    NoValue { series: String, field: String },

    #[error("an override was defined for field '{0}', but thresholds are missing")]
    OverrideMissingThreshold(String),

    #[error("thresholds of the override for field '{field}' are malformed: {reason}")]
    InvalidThresholds { field: String, reason: String },

    #[error("unsupported thresholds mode: {0}")]
    UnsupportedThresholdMode(String),

    #[error("thresholds have no steps")]
    EmptyThresholds,

    #[error("threshold steps are not in ascending order (step {index})")]
    UnsortedThresholds { index: usize },
}

/// Failures of panel-level operations (editing, lookup).
#[derive(Debug, Error, PartialEq)]
pub enum PanelError {
    #[error("panel '{0}' not found")]
    NotFound(String),

    #[error("rule index {index} out of range ({len} rules)")]
    RuleIndexOutOfRange { index: usize, len: usize },
}
