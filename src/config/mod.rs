// src/config/mod.rs
//! Configuration: which sources are enabled (file-backed, loaded once per
//! aggregator) and how the OpenAI-compatible backend is reached (environment).

pub mod backend;
pub mod sources;

pub use backend::BackendSettings;
pub use sources::{default_config_path, load_source_config, SourceConfig};
