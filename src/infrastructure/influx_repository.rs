// InfluxDB repository implementation
use crate::application::telemetry_repository::TelemetryRepository;
use crate::domain::panel::QueryTarget;
use crate::domain::telemetry::{DataFrame, Field};
use crate::infrastructure::config::prepare_query;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct InfluxRepository {
    client: reqwest::Client,
    host: String,
    token: String,
    database: String,
    retention_policy: String,
}

#[derive(Debug, Deserialize)]
struct InfluxQLResponse {
    results: Vec<InfluxQLResult>,
}

#[derive(Debug, Deserialize)]
struct InfluxQLResult {
    #[serde(default)]
    series: Option<Vec<InfluxQLSeries>>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct InfluxQLSeries {
    #[allow(dead_code)]
    name: String,
    columns: Vec<String>,
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

impl InfluxRepository {
    pub fn new(host: String, token: String, database: String, retention_policy: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            host: host.trim_end_matches('/').to_string(),
            token,
            database,
            retention_policy,
        }
    }

    fn build_query_url(&self, query: &str) -> String {
        let encoded_query = urlencoding::encode(query);
        format!(
            "{}/query?db={}&rp={}&epoch=ms&q={}",
            self.host, self.database, self.retention_policy, encoded_query
        )
    }

    async fn execute_query(&self, query: &str) -> Result<InfluxQLResponse> {
        let url = self.build_query_url(query);

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Token {}", self.token))
            .header("Accept", "application/json")
            .send()
            .await
            .context("Failed to send request to InfluxDB")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("InfluxDB query failed with status {}: {}", status, body);
        }

        let data = response
            .json::<InfluxQLResponse>()
            .await
            .context("Failed to parse InfluxDB response")?;

        if let Some(error) = data.results.iter().find_map(|r| r.error.as_ref()) {
            anyhow::bail!("InfluxDB query error: {}", error);
        }

        Ok(data)
    }

    /// One frame per returned series, one field per column. Cells that are
    /// not numbers become null values; RFC 3339 timestamps are turned into
    /// epoch milliseconds.
    fn to_frames(ref_id: &str, response: InfluxQLResponse) -> Vec<DataFrame> {
        response
            .results
            .into_iter()
            .flat_map(|result| result.series.unwrap_or_default())
            .map(|series| {
                let fields = series
                    .columns
                    .iter()
                    .enumerate()
                    .map(|(idx, column)| {
                        let values = series
                            .values
                            .iter()
                            .map(|row| row.get(idx).and_then(Self::cell_value))
                            .collect();
                        Field::new(column.clone(), values)
                    })
                    .collect();
                DataFrame::new(Some(ref_id.to_string()), fields)
            })
            .collect()
    }

    fn cell_value(cell: &serde_json::Value) -> Option<f64> {
        match cell {
            serde_json::Value::Number(n) => n.as_f64(),
            serde_json::Value::String(s) => chrono::DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|time| time.timestamp_millis() as f64),
            serde_json::Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }
}

#[async_trait]
impl TelemetryRepository for InfluxRepository {
    async fn query_frames(
        &self,
        targets: &[QueryTarget],
        vars: &HashMap<String, String>,
    ) -> Result<Vec<DataFrame>> {
        let mut frames = Vec::new();

        for target in targets {
            let query = prepare_query(&target.query, vars);
            tracing::debug!("Executing query for refId {}: {}", target.ref_id, query);

            let response = self
                .execute_query(&query)
                .await
                .with_context(|| format!("Query for refId {} failed", target.ref_id))?;
            frames.extend(Self::to_frames(&target.ref_id, response));
        }

        tracing::debug!("Fetched {} frames for {} targets", frames.len(), targets.len());
        Ok(frames)
    }
}
