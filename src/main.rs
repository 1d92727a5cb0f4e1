// Main entry point - Dependency injection and server setup
use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use diagram_panel::application::editor_service::EditorService;
use diagram_panel::application::panel_store::PanelStore;
use diagram_panel::application::refresh_service::RefreshService;
use diagram_panel::application::telemetry_repository::TelemetryRepository;
use diagram_panel::infrastructure::config::load_app_config;
use diagram_panel::infrastructure::file_panel_store::FilePanelStore;
use diagram_panel::infrastructure::influx_repository::InfluxRepository;
use diagram_panel::presentation::app_state::AppState;
use diagram_panel::presentation::router::build_router;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_app_config()?;

    // Create adapters (infrastructure layer)
    let repository: Arc<dyn TelemetryRepository> = Arc::new(InfluxRepository::new(
        config.influx.host,
        config.influx.token,
        config.influx.database,
        config.influx.retention_policy,
    ));
    let store: Arc<dyn PanelStore> = Arc::new(FilePanelStore::open(&config.panels.dir)?);

    // Create services (application layer)
    let refresh_service = RefreshService::new(repository, store.clone(), config.refresh);
    let editor_service = EditorService::new(store, refresh_service.clone());

    let state = Arc::new(AppState {
        refresh_service,
        editor_service,
    });

    // Build router (presentation layer)
    let router = build_router(state);

    // Start server
    let addr: SocketAddr = config
        .server
        .bind
        .parse()
        .with_context(|| format!("Invalid bind address {}", config.server.bind))?;
    tracing::info!("Starting diagram-panel service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
