// Threshold ladders and color resolution
use super::error::RuleError;
use serde::{Deserialize, Serialize};

/// Ladder mode as written in the field config. Modes other than the two
/// known ones keep their raw name for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ThresholdsMode {
    Absolute,
    Percentage,
    Other(String),
}

impl ThresholdsMode {
    pub fn as_str(&self) -> &str {
        match self {
            ThresholdsMode::Absolute => "absolute",
            ThresholdsMode::Percentage => "percentage",
            ThresholdsMode::Other(mode) => mode,
        }
    }
}

impl From<String> for ThresholdsMode {
    fn from(mode: String) -> Self {
        match mode.as_str() {
            "absolute" => ThresholdsMode::Absolute,
            "percentage" => ThresholdsMode::Percentage,
            _ => ThresholdsMode::Other(mode),
        }
    }
}

impl From<ThresholdsMode> for String {
    fn from(mode: ThresholdsMode) -> Self {
        mode.as_str().to_string()
    }
}

/// One step of a ladder. A `None` value stands for negative infinity,
/// which is how the host serializes the base step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdStep {
    #[serde(default)]
    pub value: Option<f64>,
    pub color: String,
}

impl ThresholdStep {
    pub fn new(value: Option<f64>, color: impl Into<String>) -> Self {
        Self {
            value,
            color: color.into(),
        }
    }

    fn bound(&self) -> f64 {
        self.value.unwrap_or(f64::NEG_INFINITY)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdLadder {
    pub mode: ThresholdsMode,
    #[serde(default)]
    pub steps: Vec<ThresholdStep>,
}

impl ThresholdLadder {
    pub fn absolute(steps: Vec<ThresholdStep>) -> Self {
        Self {
            mode: ThresholdsMode::Absolute,
            steps,
        }
    }

    /// Color of the highest step whose value is <= `value`, or the floor
    /// color when none qualifies. The first step is the unconditional floor
    /// and its own value is never compared.
    ///
    /// Steps must already be ascending; see [`ThresholdLadder::validate`].
    /// Returns `None` only for a ladder without steps.
    pub fn color_for(&self, value: f64) -> Option<&str> {
        let (floor, rest) = self.steps.split_first()?;
        let step = rest
            .iter()
            .rev()
            .find(|step| value >= step.bound())
            .unwrap_or(floor);
        Some(step.color.as_str())
    }

    /// Checks that the ladder can be used for resolution: absolute mode,
    /// at least one step, and the steps above the floor in ascending order.
    pub fn validate(&self) -> Result<(), RuleError> {
        if self.mode != ThresholdsMode::Absolute {
            return Err(RuleError::UnsupportedThresholdMode(self.mode.as_str().to_string()));
        }
        if self.steps.is_empty() {
            return Err(RuleError::EmptyThresholds);
        }
        for (offset, pair) in self.steps[1..].windows(2).enumerate() {
            if pair[1].bound() < pair[0].bound() {
                return Err(RuleError::UnsortedThresholds { index: offset + 2 });
            }
        }
        Ok(())
    }
}
