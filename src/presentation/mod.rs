// Presentation layer - HTTP surface for the chart screens
pub mod app_state;
pub mod handlers;
pub mod routes;
