// Telemetry data domain models

use super::error::RuleError;
use super::rule::DataSourceRef;
use serde::{Deserialize, Serialize};

/// One query result as delivered by the host. Frames without a refId are
/// addressed with the empty string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataFrame {
    #[serde(rename = "refId", default, skip_serializing_if = "Option::is_none")]
    pub ref_id: Option<String>,
    #[serde(default)]
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(default)]
    pub values: Vec<Option<f64>>,
}

impl DataFrame {
    pub fn new(ref_id: Option<String>, fields: Vec<Field>) -> Self {
        Self { ref_id, fields }
    }

    pub fn series_id(&self) -> &str {
        self.ref_id.as_deref().unwrap_or_default()
    }
}

impl Field {
    pub fn new(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// Latest value of the field a rule points at. When several frames or
/// fields carry the same name, the last one wins. No aggregation is done.
pub fn extract_last_value(source: &DataSourceRef, frames: &[DataFrame]) -> Result<f64, RuleError> {
    let frame = frames
        .iter()
        .rev()
        .find(|frame| frame.series_id() == source.series)
        .ok_or_else(|| RuleError::SeriesNotFound(source.series.clone()))?;

    let field = frame
        .fields
        .iter()
        .rev()
        .find(|field| field.name == source.field)
        .ok_or_else(|| RuleError::FieldNotFound {
            series: source.series.clone(),
            field: source.field.clone(),
        })?;

    field.values.last().copied().flatten().ok_or_else(|| RuleError::NoValue {
        series: source.series.clone(),
        field: source.field.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(series: &str, field: &str) -> DataSourceRef {
        DataSourceRef::new(series, field)
    }

    fn frames() -> Vec<DataFrame> {
        vec![
            DataFrame::new(
                Some("A".to_string()),
                vec![
                    Field::new("time", vec![Some(1.0), Some(2.0)]),
                    Field::new("temp", vec![Some(20.5), Some(21.0)]),
                    Field::new("empty", vec![]),
                    Field::new("gap", vec![Some(3.0), None]),
                ],
            ),
            DataFrame::new(None, vec![Field::new("level", vec![Some(7.0)])]),
        ]
    }

    #[test]
    fn test_returns_last_value() {
        assert_eq!(extract_last_value(&source("A", "temp"), &frames()), Ok(21.0));
    }

    #[test]
    fn test_missing_series() {
        assert_eq!(
            extract_last_value(&source("B", "temp"), &frames()),
            Err(RuleError::SeriesNotFound("B".to_string()))
        );
    }

    #[test]
    fn test_missing_field() {
        assert!(matches!(
            extract_last_value(&source("A", "pressure"), &frames()),
            Err(RuleError::FieldNotFound { .. })
        ));
    }

    #[test]
    fn test_empty_or_trailing_null_has_no_value() {
        assert!(matches!(
            extract_last_value(&source("A", "empty"), &frames()),
            Err(RuleError::NoValue { .. })
        ));
        // Only the very last entry is consulted, even if earlier ones are set.
        assert!(matches!(
            extract_last_value(&source("A", "gap"), &frames()),
            Err(RuleError::NoValue { .. })
        ));
    }

    #[test]
    fn test_absent_ref_id_is_empty_string() {
        assert_eq!(extract_last_value(&source("", "level"), &frames()), Ok(7.0));
    }

    #[test]
    fn test_last_matching_frame_wins() {
        let mut frames = frames();
        frames.push(DataFrame::new(
            Some("A".to_string()),
            vec![Field::new("temp", vec![Some(99.0)])],
        ));
        assert_eq!(extract_last_value(&source("A", "temp"), &frames), Ok(99.0));
    }

    #[test]
    fn test_deserialize_host_frame() {
        let frame: DataFrame = serde_json::from_value(serde_json::json!({
            "refId": "A",
            "fields": [{ "name": "temp", "values": [1.5, null, 3] }]
        }))
        .unwrap();
        assert_eq!(frame.series_id(), "A");
        assert_eq!(frame.fields[0].values, vec![Some(1.5), None, Some(3.0)]);
    }
}
