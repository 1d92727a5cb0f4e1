// Editor service - Rule authoring use cases for the options editor
use crate::application::panel_store::PanelStore;
use crate::application::refresh_service::RefreshService;
use crate::domain::authoring::{self, EditorSession, SelectGroup, SelectOption, WatchState};
use crate::domain::element::VisualElement;
use crate::domain::error::PanelError;
use crate::domain::panel::{Panel, PanelSummary};
use crate::domain::rule::{DataSourceRef, PanelOptions, RuleEdit};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// What the editor shows after an edit.
#[derive(Debug, Clone, Serialize)]
pub struct EditorSnapshot {
    pub options: PanelOptions,
    pub watch: WatchState,
}

#[derive(Clone)]
pub struct EditorService {
    store: Arc<dyn PanelStore>,
    refresh: RefreshService,
    sessions: Arc<Mutex<HashMap<String, EditorSession>>>,
}

impl EditorService {
    pub fn new(store: Arc<dyn PanelStore>, refresh: RefreshService) -> Self {
        Self {
            store,
            refresh,
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub async fn list_panels(&self) -> anyhow::Result<Vec<PanelSummary>> {
        self.store.list_panels().await
    }

    pub async fn snapshot(&self, panel_id: &str) -> anyhow::Result<EditorSnapshot> {
        self.modify(panel_id, |_, _| Ok(false)).await
    }

    /// Replace the options wholesale, as the host's `onChange` does.
    pub async fn save_options(&self, panel_id: &str, options: PanelOptions) -> anyhow::Result<EditorSnapshot> {
        self.modify(panel_id, move |session, current| {
            session.rules_replaced(options.rules.len());
            *current = options;
            Ok(true)
        })
        .await
    }

    pub async fn add_rule(&self, panel_id: &str) -> anyhow::Result<EditorSnapshot> {
        self.modify(panel_id, |_, options| {
            options.add_rule();
            Ok(true)
        })
        .await
    }

    pub async fn remove_rule(&self, panel_id: &str, index: usize) -> anyhow::Result<EditorSnapshot> {
        self.modify(panel_id, |session, options| {
            options.remove_rule(index)?;
            session.rule_removed(index);
            Ok(true)
        })
        .await
    }

    pub async fn edit_rule(&self, panel_id: &str, index: usize, edit: RuleEdit) -> anyhow::Result<EditorSnapshot> {
        self.modify(panel_id, |_, options| {
            options.edit_rule(index, edit)?;
            Ok(true)
        })
        .await
    }

    pub async fn set_watch(&self, panel_id: &str, index: usize, enabled: bool) -> anyhow::Result<EditorSnapshot> {
        self.modify(panel_id, |session, options| session.set_watch(index, enabled, options))
            .await
    }

    /// Selection event from the drawing surface.
    pub async fn pointer_up(&self, panel_id: &str, hit: Option<VisualElement>) -> anyhow::Result<EditorSnapshot> {
        self.modify(panel_id, |session, options| Ok(session.pointer_up(hit, options)))
            .await
    }

    /// Element list edited on the drawing surface; persisted only if it
    /// actually differs.
    pub async fn replace_elements(
        &self,
        panel_id: &str,
        elements: Vec<Arc<VisualElement>>,
    ) -> anyhow::Result<EditorSnapshot> {
        self.modify(panel_id, |_, options| Ok(options.replace_elements(elements)))
            .await
    }

    pub async fn element_choices(&self, panel_id: &str, index: usize) -> anyhow::Result<Vec<SelectOption<String>>> {
        let panel = self.load(panel_id).await?;
        panel.options.check_index(index)?;
        let sessions = self.sessions.lock().await;
        let choices = match sessions.get(panel_id) {
            Some(session) => session.element_choices(index, &panel.options),
            None => EditorSession::default().element_choices(index, &panel.options),
        };
        Ok(choices)
    }

    pub async fn data_source_choices(&self, panel_id: &str) -> anyhow::Result<Vec<SelectGroup<DataSourceRef>>> {
        let panel = self.load(panel_id).await?;
        let frames = self.refresh.fetch_frames(&panel).await?;
        Ok(authoring::data_source_choices(&frames))
    }

    async fn load(&self, panel_id: &str) -> anyhow::Result<Panel> {
        self.store
            .load(panel_id)
            .await?
            .ok_or_else(|| PanelError::NotFound(panel_id.to_string()).into())
    }

    /// Runs one edit under the session lock so edits of the same service are
    /// applied one after another. `edit` reports whether the options changed
    /// and need persisting.
    async fn modify<F>(&self, panel_id: &str, edit: F) -> anyhow::Result<EditorSnapshot>
    where
        F: FnOnce(&mut EditorSession, &mut PanelOptions) -> Result<bool, PanelError>,
    {
        let mut sessions = self.sessions.lock().await;
        let mut options = self.load(panel_id).await?.options;
        let session = sessions.entry(panel_id.to_string()).or_default();

        if edit(session, &mut options)? {
            self.store.save_options(panel_id, options.clone()).await?;
            tracing::debug!("Saved options for panel {} ({} rules)", panel_id, options.rules.len());
        }

        Ok(EditorSnapshot {
            options,
            watch: session.watch(),
        })
    }
}
