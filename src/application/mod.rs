// Application layer - Use cases and the ports they depend on
pub mod drawing_surface;
pub mod editor_service;
pub mod panel_store;
pub mod refresh_service;
pub mod rule_evaluator;
pub mod telemetry_repository;

#[cfg(test)]
pub(crate) mod test_support;
