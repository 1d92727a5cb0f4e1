// Store trait for persisted panel state
use crate::domain::panel::{Panel, PanelSummary};
use crate::domain::rule::PanelOptions;
use async_trait::async_trait;

#[async_trait]
pub trait PanelStore: Send + Sync {
    async fn list_panels(&self) -> anyhow::Result<Vec<PanelSummary>>;

    async fn load(&self, panel_id: &str) -> anyhow::Result<Option<Panel>>;

    /// Persist new options for an existing panel.
    async fn save_options(&self, panel_id: &str, options: PanelOptions) -> anyhow::Result<()>;
}
