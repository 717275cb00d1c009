// Application layer - Use cases
pub mod auto_sync_service;
pub mod chart_board;
pub mod dataset_builder;
pub mod import_service;
pub mod settings_service;
pub mod sync_source;
