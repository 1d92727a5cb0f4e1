// Diagram panel service - binds diagram elements to live time-series data
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
