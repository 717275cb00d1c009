// Domain layer - Core business models
pub mod connection;
pub mod dataset;
pub mod refresh;
pub mod sample;
pub mod tabular;
