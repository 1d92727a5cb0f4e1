// Refresh service - Re-evaluates a panel's rules on every tick and pushes the scene
use crate::application::drawing_surface::DrawingSurface;
use crate::application::panel_store::PanelStore;
use crate::application::rule_evaluator;
use crate::application::telemetry_repository::TelemetryRepository;
use crate::domain::element::VisualElement;
use crate::domain::panel::Panel;
use crate::domain::scene::SceneUpdate;
use crate::domain::telemetry::DataFrame;
use crate::infrastructure::config::RefreshSettings;
use anyhow::Context;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::IntervalStream;
use tokio_stream::StreamExt;

#[derive(Clone)]
pub struct RefreshService {
    repository: Arc<dyn TelemetryRepository>,
    store: Arc<dyn PanelStore>,
    settings: RefreshSettings,
}

impl RefreshService {
    pub fn new(
        repository: Arc<dyn TelemetryRepository>,
        store: Arc<dyn PanelStore>,
        settings: RefreshSettings,
    ) -> Self {
        Self {
            repository,
            store,
            settings,
        }
    }

    /// Evaluate the panel once against fresh data. `None` if the panel does
    /// not exist.
    pub async fn render_once(&self, panel_id: &str) -> anyhow::Result<Option<Vec<Arc<VisualElement>>>> {
        let Some(panel) = self.store.load(panel_id).await? else {
            return Ok(None);
        };

        let frames = self.fetch_frames(&panel).await?;

        let evaluation = rule_evaluator::evaluate(
            &panel.options.rules,
            &panel.options.elements,
            &frames,
            &panel.field_config,
        );

        tracing::debug!(
            "Evaluated {} rules for panel {} ({} failed)",
            evaluation.outcomes.len(),
            panel_id,
            evaluation.failures()
        );

        Ok(Some(evaluation.elements))
    }

    /// Current frames for the panel's query targets.
    pub async fn fetch_frames(&self, panel: &Panel) -> anyhow::Result<Vec<DataFrame>> {
        let vars = self.query_vars(&panel.id);
        self.repository
            .query_frames(&panel.targets, &vars)
            .await
            .with_context(|| format!("Failed to fetch frames for panel {}", panel.id))
    }

    /// Spawn the tick loop for one panel. Each tick renders the panel and
    /// hands the result to `surface`; a failed fetch keeps the previous
    /// scene. The loop stops when the surface closes, even between ticks
    /// that only failed, or when the panel is gone.
    pub fn attach(&self, panel_id: &str, surface: Arc<dyn DrawingSurface>) -> JoinHandle<()> {
        let service = self.clone();
        let panel_id = panel_id.to_string();
        let period = Duration::from_millis(self.settings.interval_ms.max(1));

        tokio::spawn(async move {
            let mut ticks = IntervalStream::new(tokio::time::interval(period));
            let mut sequence = 0u64;

            loop {
                tokio::select! {
                    biased;
                    _ = surface.closed() => {
                        tracing::debug!("Surface for panel {} closed, stopping refresh", panel_id);
                        break;
                    }
                    tick = ticks.next() => {
                        if tick.is_none() {
                            break;
                        }
                    }
                }

                match service.render_once(&panel_id).await {
                    Ok(Some(elements)) => {
                        sequence += 1;
                        let scene = SceneUpdate::new(panel_id.clone(), sequence, elements);
                        if surface.update_scene(scene).await.is_err() {
                            tracing::debug!("Surface for panel {} closed, stopping refresh", panel_id);
                            break;
                        }
                    }
                    Ok(None) => {
                        tracing::warn!("Panel {} no longer exists, stopping refresh", panel_id);
                        break;
                    }
                    Err(e) => {
                        tracing::warn!("Skipping refresh of panel {}: {:#}", panel_id, e);
                    }
                }
            }
        })
    }

    fn query_vars(&self, panel_id: &str) -> HashMap<String, String> {
        let mut vars = HashMap::new();
        vars.insert("panel".to_string(), panel_id.to_string());
        vars.insert("range".to_string(), self.settings.range.clone());
        vars
    }
}
