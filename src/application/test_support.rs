// In-memory fakes shared by the service tests
use crate::application::panel_store::PanelStore;
use crate::domain::panel::{Panel, PanelSummary};
use crate::domain::rule::PanelOptions;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct MemoryStore {
    panels: RwLock<HashMap<String, Panel>>,
}

impl MemoryStore {
    pub fn with_panels(panels: Vec<Panel>) -> Self {
        Self {
            panels: RwLock::new(panels.into_iter().map(|p| (p.id.clone(), p)).collect()),
        }
    }
}

#[async_trait]
impl PanelStore for MemoryStore {
    async fn list_panels(&self) -> anyhow::Result<Vec<PanelSummary>> {
        Ok(self.panels.read().await.values().map(Panel::summary).collect())
    }

    async fn load(&self, panel_id: &str) -> anyhow::Result<Option<Panel>> {
        Ok(self.panels.read().await.get(panel_id).cloned())
    }

    async fn save_options(&self, panel_id: &str, options: PanelOptions) -> anyhow::Result<()> {
        let mut panels = self.panels.write().await;
        let panel = panels
            .get_mut(panel_id)
            .ok_or_else(|| anyhow::anyhow!("panel {} not found", panel_id))?;
        panel.options = options;
        Ok(())
    }
}
