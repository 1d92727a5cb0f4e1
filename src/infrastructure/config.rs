use crate::domain::panel::Panel;
use anyhow::Context;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "config/app";
const ENV_PREFIX: &str = "DIAGRAM_PANEL";

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    pub influx: InfluxSettings,
    #[serde(default)]
    pub refresh: RefreshSettings,
    #[serde(default)]
    pub panels: PanelsSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct InfluxSettings {
    pub host: String,
    pub token: String,
    pub database: String,
    pub retention_policy: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RefreshSettings {
    pub interval_ms: u64,
    /// Substituted for `${range}` in panel queries.
    pub range: String,
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self {
            interval_ms: 5000,
            range: "1h".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct PanelsSettings {
    pub dir: PathBuf,
}

impl Default for PanelsSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("config/panels"),
        }
    }
}

pub fn load_app_config() -> anyhow::Result<AppConfig> {
    load_app_config_from(CONFIG_FILE)
}

/// `path` (any format the config crate knows, extension optional) layered
/// under `DIAGRAM_PANEL_*` environment variables, e.g.
/// `DIAGRAM_PANEL_INFLUX__TOKEN`.
pub fn load_app_config_from(path: &str) -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name(path).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}

/// Read every `*.json` panel file in `dir`, in file-name order.
pub fn load_panels(dir: &Path) -> anyhow::Result<Vec<(PathBuf, Panel)>> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read panels directory {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();

    let mut panels = Vec::with_capacity(paths.len());
    for path in paths {
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read panel file {}", path.display()))?;
        let panel: Panel = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse panel file {}", path.display()))?;
        panels.push((path, panel));
    }

    Ok(panels)
}

/// Replace template variables in a query string
pub fn prepare_query(query: &str, vars: &HashMap<String, String>) -> String {
    let mut result = query.to_string();
    for (key, value) in vars {
        let placeholder = format!("${{{}}}", key);
        result = result.replace(&placeholder, value);
    }
    result
}
