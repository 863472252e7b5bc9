//! Configuration for the vox backend
//!
//! Priority: env vars > config/{env}.yaml > config/default.yaml > defaults.
//! Every key has a documented default; missing keys never fail, they fall
//! back. Settings are loaded once at process start and read-only after.

mod settings;

pub use settings::{
    load_settings, CacheConfig, ChatConfig, EmbeddingConfig, LlmConfig, ObservabilityConfig,
    PersistenceConfig, ServerConfig, Settings, VectorStoreConfig,
};

use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(String),

    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::Parse(err.to_string())
    }
}
