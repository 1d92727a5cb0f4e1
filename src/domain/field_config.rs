// Host field configuration and per-field threshold overrides
use super::error::RuleError;
use super::thresholds::ThresholdLadder;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const BY_NAME_MATCHER: &str = "byName";
pub const THRESHOLDS_PROPERTY: &str = "thresholds";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    #[serde(default)]
    pub defaults: FieldDefaults,
    #[serde(default)]
    pub overrides: Vec<ConfigOverride>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldDefaults {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thresholds: Option<ThresholdLadder>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigOverride {
    pub matcher: Matcher,
    #[serde(default)]
    pub properties: Vec<OverrideProperty>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matcher {
    pub id: String,
    #[serde(default)]
    pub options: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverrideProperty {
    pub id: String,
    #[serde(default)]
    pub value: Value,
}

impl ConfigOverride {
    fn matches_field(&self, field_name: &str) -> bool {
        self.matcher.id == BY_NAME_MATCHER && self.matcher.options.as_str() == Some(field_name)
    }

    fn thresholds(&self) -> Option<&Value> {
        self.properties
            .iter()
            .find(|p| p.id == THRESHOLDS_PROPERTY)
            .map(|p| &p.value)
    }
}

impl FieldConfig {
    /// Returns the threshold ladder that applies to `field_name`.
    ///
    /// The first `byName` override targeting the field wins and is used
    /// exclusively; when it carries no thresholds the lookup fails instead
    /// of falling back to the defaults. The resolved ladder is validated
    /// before it is returned.
    pub fn resolve_ladder(&self, field_name: &str) -> Result<ThresholdLadder, RuleError> {
        let ladder = match self.overrides.iter().find(|o| o.matches_field(field_name)) {
            Some(found) => {
                let value = found
                    .thresholds()
                    .filter(|v| !v.is_null())
                    .ok_or_else(|| RuleError::OverrideMissingThreshold(field_name.to_string()))?;
                serde_json::from_value::<ThresholdLadder>(value.clone()).map_err(|e| {
                    RuleError::InvalidThresholds {
                        field: field_name.to_string(),
                        reason: e.to_string(),
                    }
                })?
            }
            None => self
                .defaults
                .thresholds
                .clone()
                .ok_or_else(|| RuleError::UnsupportedThresholdMode("none".to_string()))?,
        };

        ladder.validate()?;
        Ok(ladder)
    }
}
