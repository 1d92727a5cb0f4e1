// Infrastructure layer - External dependencies and adapters
pub mod channel_surface;
pub mod chunked_json;
pub mod config;
pub mod file_panel_store;
pub mod http_response;
pub mod influx_repository;
