//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Embedding provider selection and connection
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// LLM provider selection and connection
    #[serde(default)]
    pub llm: LlmConfig,

    /// Cache/search provider selection
    #[serde(default)]
    pub cache: CacheConfig,

    /// Vector store connection
    #[serde(default)]
    pub vector_store: VectorStoreConfig,

    /// Chat orchestration
    #[serde(default)]
    pub chat: ChatConfig,

    /// Session/message persistence
    #[serde(default)]
    pub persistence: PersistenceConfig,

    /// Logging and metrics
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind host. Default: 127.0.0.1
    #[serde(default = "default_host")]
    pub host: String,
    /// Bind port. Default: 8080
    #[serde(default = "default_port")]
    pub port: u16,
    /// Allowed CORS origins; empty means localhost only. Default: []
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// Per-request timeout in seconds. Default: 30
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Embedding provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Provider tag: lmstudio | openai | google | local.
    /// Empty or unknown tags fall back to lmstudio (always-runnable-offline
    /// policy). Default: lmstudio
    #[serde(default = "default_embedding_provider")]
    pub provider: String,
    /// Base URL of the local proxy. Default: http://localhost:1234/v1
    #[serde(default = "default_embedding_endpoint")]
    pub endpoint: String,
    /// Model name. Default: text-embedding-nomic-embed-text-v1.5
    #[serde(default = "default_embedding_model")]
    pub model: String,
    /// API key for hosted providers. Default: none
    #[serde(default)]
    pub api_key: Option<String>,
    /// Output vector dimension. Default: 768
    #[serde(default = "default_embedding_dimension")]
    pub dimension: usize,
    /// Request timeout in milliseconds. Default: 10000
    #[serde(default = "default_embedding_timeout")]
    pub timeout_ms: u64,
}

fn default_embedding_provider() -> String {
    "lmstudio".to_string()
}

fn default_embedding_endpoint() -> String {
    "http://localhost:1234/v1".to_string()
}

fn default_embedding_model() -> String {
    "text-embedding-nomic-embed-text-v1.5".to_string()
}

fn default_embedding_dimension() -> usize {
    768
}

fn default_embedding_timeout() -> u64 {
    10_000
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: default_embedding_provider(),
            endpoint: default_embedding_endpoint(),
            model: default_embedding_model(),
            api_key: None,
            dimension: default_embedding_dimension(),
            timeout_ms: default_embedding_timeout(),
        }
    }
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Provider tag: lmstudio | openai | google | vllm | ollama.
    /// Empty or unknown tags fall back to lmstudio. Default: lmstudio
    #[serde(default = "default_llm_provider")]
    pub provider: String,
    /// Base URL of the local proxy. Default: http://localhost:1234/v1
    #[serde(default = "default_llm_endpoint")]
    pub endpoint: String,
    /// Model name. Default: qwen2.5-7b-instruct
    #[serde(default = "default_llm_model")]
    pub model: String,
    /// API key for hosted providers. Default: none
    #[serde(default)]
    pub api_key: Option<String>,
    /// Maximum tokens to generate. Default: 1024
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,
    /// Sampling temperature. Default: 0.7
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Request timeout in milliseconds. Default: 60000
    #[serde(default = "default_llm_timeout")]
    pub timeout_ms: u64,
}

fn default_llm_provider() -> String {
    "lmstudio".to_string()
}

fn default_llm_endpoint() -> String {
    "http://localhost:1234/v1".to_string()
}

fn default_llm_model() -> String {
    "qwen2.5-7b-instruct".to_string()
}

fn default_max_tokens() -> usize {
    1024
}

fn default_temperature() -> f32 {
    0.7
}

fn default_llm_timeout() -> u64 {
    60_000
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_llm_provider(),
            endpoint: default_llm_endpoint(),
            model: default_llm_model(),
            api_key: None,
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_ms: default_llm_timeout(),
        }
    }
}

/// Cache/search provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Provider tag: memory | whoosh | redis | elasticsearch.
    /// This factory is strict: unknown tags error. Default: memory
    #[serde(default = "default_cache_provider")]
    pub provider: String,
    /// Entry time-to-live in seconds; 0 disables expiry. Default: 3600
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,
    /// Maximum entries before eviction. Default: 10000
    #[serde(default = "default_cache_max_entries")]
    pub max_entries: usize,
    /// On-disk index path for the full-text backend; none means RAM.
    /// Default: none
    #[serde(default)]
    pub index_path: Option<String>,
}

fn default_cache_provider() -> String {
    "memory".to_string()
}

fn default_cache_ttl() -> u64 {
    3600
}

fn default_cache_max_entries() -> usize {
    10_000
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            provider: default_cache_provider(),
            ttl_secs: default_cache_ttl(),
            max_entries: default_cache_max_entries(),
            index_path: None,
        }
    }
}

/// Vector store connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorStoreConfig {
    /// Qdrant REST endpoint. Default: http://localhost:6333
    #[serde(default = "default_qdrant_endpoint")]
    pub endpoint: String,
    /// API key. Default: none
    #[serde(default)]
    pub api_key: Option<String>,
    /// Default collection for the knowledge base. Default: knowledge_base
    #[serde(default = "default_collection")]
    pub collection: String,
    /// Vector dimension for created collections. Default: 768
    #[serde(default = "default_embedding_dimension")]
    pub dimension: usize,
    /// Distance metric: cosine | euclid | dot. Default: cosine
    #[serde(default = "default_distance")]
    pub distance: String,
    /// Request timeout in milliseconds. Default: 5000
    #[serde(default = "default_store_timeout")]
    pub timeout_ms: u64,
}

fn default_qdrant_endpoint() -> String {
    "http://localhost:6333".to_string()
}

fn default_collection() -> String {
    "knowledge_base".to_string()
}

fn default_distance() -> String {
    "cosine".to_string()
}

fn default_store_timeout() -> u64 {
    5_000
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        Self {
            endpoint: default_qdrant_endpoint(),
            api_key: None,
            collection: default_collection(),
            dimension: default_embedding_dimension(),
            distance: default_distance(),
            timeout_ms: default_store_timeout(),
        }
    }
}

/// Chat orchestration configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// System prompt prepended to every LLM call
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
    /// Most recent turns included per LLM call. Default: 20
    #[serde(default = "default_max_history_turns")]
    pub max_history_turns: usize,
    /// Retrieved chunks injected as context per turn. Default: 3
    #[serde(default = "default_rag_top_k")]
    pub rag_top_k: usize,
    /// Minimum relevance score for injected chunks. Default: 0.5
    #[serde(default = "default_rag_threshold")]
    pub rag_score_threshold: f32,
}

fn default_system_prompt() -> String {
    "You are a helpful voice assistant. Answer concisely; your replies may be \
     spoken aloud."
        .to_string()
}

fn default_max_history_turns() -> usize {
    20
}

fn default_rag_top_k() -> usize {
    3
}

fn default_rag_threshold() -> f32 {
    0.5
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            system_prompt: default_system_prompt(),
            max_history_turns: default_max_history_turns(),
            rag_top_k: default_rag_top_k(),
            rag_score_threshold: default_rag_threshold(),
        }
    }
}

/// Persistence configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceConfig {
    /// Enable the SQLite store (false = in-memory only). Default: true
    #[serde(default = "default_persistence_enabled")]
    pub enabled: bool,
    /// SQLite database path. Default: data/vox.db
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

fn default_persistence_enabled() -> bool {
    true
}

fn default_db_path() -> String {
    "data/vox.db".to_string()
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            enabled: default_persistence_enabled(),
            db_path: default_db_path(),
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log filter when RUST_LOG is unset. Default: info
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Emit JSON-formatted logs. Default: false
    #[serde(default)]
    pub log_json: bool,
    /// Expose Prometheus metrics at /metrics. Default: true
    #[serde(default = "default_metrics_enabled")]
    pub metrics_enabled: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_metrics_enabled() -> bool {
    true
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
            metrics_enabled: default_metrics_enabled(),
        }
    }
}

impl Settings {
    /// Create default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings that cannot be checked by serde alone
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.embedding.dimension == 0 {
            return Err(ConfigError::InvalidValue {
                field: "embedding.dimension".to_string(),
                message: "must be positive".to_string(),
            });
        }
        if self.vector_store.dimension == 0 {
            return Err(ConfigError::InvalidValue {
                field: "vector_store.dimension".to_string(),
                message: "must be positive".to_string(),
            });
        }
        if !matches!(
            self.vector_store.distance.as_str(),
            "cosine" | "euclid" | "dot"
        ) {
            return Err(ConfigError::InvalidValue {
                field: "vector_store.distance".to_string(),
                message: format!("unknown metric '{}'", self.vector_store.distance),
            });
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(ConfigError::InvalidValue {
                field: "llm.temperature".to_string(),
                message: "must be within 0.0..=2.0".to_string(),
            });
        }
        Ok(())
    }
}

/// Load settings from files and environment.
///
/// Priority: env vars > config/{env}.yaml > config/default.yaml > defaults.
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    builder = builder.add_source(File::with_name("config/default").required(false));

    if let Some(env_name) = env {
        builder =
            builder.add_source(File::with_name(&format!("config/{}", env_name)).required(false));
    }

    builder = builder.add_source(
        Environment::with_prefix("VOX")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.embedding.provider, "lmstudio");
        assert_eq!(settings.cache.provider, "memory");
        assert_eq!(settings.vector_store.distance, "cosine");
        assert!(settings.persistence.enabled);
    }

    #[test]
    fn test_defaults_pass_validation() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_zero_dimension() {
        let mut settings = Settings::default();
        settings.embedding.dimension = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_unknown_distance() {
        let mut settings = Settings::default();
        settings.vector_store.distance = "manhattan".to_string();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_missing_keys_fall_back_to_defaults() {
        // A partial document deserializes with documented defaults filled in.
        let partial: Settings = serde_yaml::from_str("server:\n  port: 9999\n").unwrap();
        assert_eq!(partial.server.port, 9999);
        assert_eq!(partial.server.host, "127.0.0.1");
        assert_eq!(partial.llm.provider, "lmstudio");
    }
}
