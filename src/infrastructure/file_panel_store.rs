// Panel store backed by a directory of panel JSON files
use crate::application::panel_store::PanelStore;
use crate::domain::error::PanelError;
use crate::domain::panel::{Panel, PanelSummary};
use crate::domain::rule::PanelOptions;
use crate::infrastructure::config::load_panels;
use anyhow::Context;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

struct StoredPanel {
    path: PathBuf,
    panel: Panel,
}

pub struct FilePanelStore {
    panels: RwLock<HashMap<String, StoredPanel>>,
}

impl FilePanelStore {
    /// Load every panel file in `dir`. Later files win on duplicate ids.
    pub fn open(dir: &Path) -> anyhow::Result<Self> {
        let mut panels = HashMap::new();
        for (path, panel) in load_panels(dir)? {
            if let Some(previous) = panels.insert(panel.id.clone(), StoredPanel { path, panel }) {
                tracing::warn!(
                    "Panel {} defined more than once, ignoring {}",
                    previous.panel.id,
                    previous.path.display()
                );
            }
        }
        tracing::info!("Loaded {} panels from {}", panels.len(), dir.display());

        Ok(Self {
            panels: RwLock::new(panels),
        })
    }
}

#[async_trait]
impl PanelStore for FilePanelStore {
    async fn list_panels(&self) -> anyhow::Result<Vec<PanelSummary>> {
        let panels = self.panels.read().await;
        let mut summaries: Vec<PanelSummary> = panels.values().map(|p| p.panel.summary()).collect();
        summaries.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(summaries)
    }

    async fn load(&self, panel_id: &str) -> anyhow::Result<Option<Panel>> {
        Ok(self.panels.read().await.get(panel_id).map(|p| p.panel.clone()))
    }

    async fn save_options(&self, panel_id: &str, options: PanelOptions) -> anyhow::Result<()> {
        let mut panels = self.panels.write().await;
        let stored = panels
            .get_mut(panel_id)
            .ok_or_else(|| PanelError::NotFound(panel_id.to_string()))?;

        let mut updated = stored.panel.clone();
        updated.options = options;
        let bytes = serde_json::to_vec_pretty(&updated).context("Failed to serialize panel")?;
        tokio::fs::write(&stored.path, bytes)
            .await
            .with_context(|| format!("Failed to write panel file {}", stored.path.display()))?;

        stored.panel = updated;
        Ok(())
    }
}
