// Repository trait for telemetry data access
use crate::domain::panel::QueryTarget;
use crate::domain::telemetry::DataFrame;
use async_trait::async_trait;
use std::collections::HashMap;

#[async_trait]
pub trait TelemetryRepository: Send + Sync {
    /// Run every target and return the resulting frames, each tagged with
    /// its target's refId. `vars` fills `${name}` placeholders in queries.
    async fn query_frames(
        &self,
        targets: &[QueryTarget],
        vars: &HashMap<String, String>,
    ) -> anyhow::Result<Vec<DataFrame>>;
}
