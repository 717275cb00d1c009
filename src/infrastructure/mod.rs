// Infrastructure layer - External formats, simulated sources and HTTP adapters
pub mod chart_mapper;
pub mod chunked_events;
pub mod config;
pub mod file_pickers;
pub mod http_response;
pub mod simulated_folder;
pub mod tabular_decoder;
