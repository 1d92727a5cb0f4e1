// Domain layer - Rules, thresholds and the data they are evaluated against
pub mod authoring;
pub mod element;
pub mod error;
pub mod field_config;
pub mod panel;
pub mod rule;
pub mod scene;
pub mod telemetry;
pub mod thresholds;
