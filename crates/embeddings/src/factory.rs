//! Embedding provider factory

use std::sync::Arc;

use vox_config::EmbeddingConfig;
use vox_core::{EmbeddingProvider, Error, Result};

use crate::google::{GoogleEmbedding, GoogleEmbeddingConfig};
use crate::local::HashEmbedding;
use crate::openai_like::{OpenAiCompatConfig, OpenAiCompatEmbedding};

/// Known embedding backends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingProviderKind {
    /// LM Studio local proxy (OpenAI-compatible)
    LmStudio,
    /// Hosted OpenAI API
    OpenAi,
    /// Hosted Gemini API
    Google,
    /// In-process hashing embedder
    Local,
}

impl EmbeddingProviderKind {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.to_lowercase().as_str() {
            "lmstudio" | "lm_studio" => Some(Self::LmStudio),
            "openai" => Some(Self::OpenAi),
            "google" | "gemini" => Some(Self::Google),
            "local" => Some(Self::Local),
            _ => None,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Self::LmStudio => "lmstudio",
            Self::OpenAi => "openai",
            Self::Google => "google",
            Self::Local => "local",
        }
    }
}

/// Fallback policy for the embedding and LLM factories only.
///
/// An empty or unrecognized tag resolves to the local proxy instead of
/// erroring, so a fresh checkout runs fully offline with no configuration.
/// The cache factory is strict on purpose; the divergence is intentional
/// and covered by tests on both sides.
pub fn resolve_or_local_proxy(tag: &str) -> EmbeddingProviderKind {
    match EmbeddingProviderKind::from_tag(tag) {
        Some(kind) => kind,
        None => {
            tracing::warn!(
                tag,
                "unrecognized embedding provider, falling back to local proxy"
            );
            EmbeddingProviderKind::LmStudio
        }
    }
}

/// Factory for embedding provider handles
pub struct EmbeddingFactory;

impl EmbeddingFactory {
    /// Resolve the configured tag (with local-proxy fallback) and build
    /// the handle. No network calls happen here.
    pub fn create(config: &EmbeddingConfig) -> Result<Arc<dyn EmbeddingProvider>> {
        let kind = resolve_or_local_proxy(&config.provider);
        Self::create_kind(kind, config)
    }

    /// Build a specific backend, bypassing the fallback policy.
    pub fn create_kind(
        kind: EmbeddingProviderKind,
        config: &EmbeddingConfig,
    ) -> Result<Arc<dyn EmbeddingProvider>> {
        match kind {
            EmbeddingProviderKind::LmStudio => {
                let backend = OpenAiCompatEmbedding::new(OpenAiCompatConfig {
                    provider_tag: "lmstudio".to_string(),
                    endpoint: config.endpoint.clone(),
                    model: config.model.clone(),
                    api_key: None,
                    dimension: config.dimension,
                    timeout_ms: config.timeout_ms,
                })?;
                Ok(Arc::new(backend))
            }

            EmbeddingProviderKind::OpenAi => {
                let api_key = config.api_key.clone().ok_or_else(|| {
                    Error::Construction("openai embedding provider requires an api key".to_string())
                })?;
                let backend = OpenAiCompatEmbedding::new(OpenAiCompatConfig {
                    provider_tag: "openai".to_string(),
                    endpoint: "https://api.openai.com/v1".to_string(),
                    model: config.model.clone(),
                    api_key: Some(api_key),
                    dimension: config.dimension,
                    timeout_ms: config.timeout_ms,
                })?;
                Ok(Arc::new(backend))
            }

            EmbeddingProviderKind::Google => {
                let api_key = config.api_key.clone().ok_or_else(|| {
                    Error::Construction("google embedding provider requires an api key".to_string())
                })?;
                let backend = GoogleEmbedding::new(GoogleEmbeddingConfig {
                    api_key,
                    model: config.model.clone(),
                    dimension: config.dimension,
                    timeout_ms: config.timeout_ms,
                    api_base: None,
                })?;
                Ok(Arc::new(backend))
            }

            EmbeddingProviderKind::Local => Ok(Arc::new(HashEmbedding::new(config.dimension))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_tags() {
        assert_eq!(
            EmbeddingProviderKind::from_tag("lmstudio"),
            Some(EmbeddingProviderKind::LmStudio)
        );
        assert_eq!(
            EmbeddingProviderKind::from_tag("OpenAI"),
            Some(EmbeddingProviderKind::OpenAi)
        );
        assert_eq!(
            EmbeddingProviderKind::from_tag("gemini"),
            Some(EmbeddingProviderKind::Google)
        );
        assert_eq!(EmbeddingProviderKind::from_tag("unknown_xyz"), None);
    }

    #[test]
    fn test_fallback_policy_resolves_to_local_proxy() {
        // Unknown and empty tags both resolve to the proxy instead of
        // erroring. The cache factory tests assert the opposite behavior.
        assert_eq!(
            resolve_or_local_proxy("unknown_xyz"),
            EmbeddingProviderKind::LmStudio
        );
        assert_eq!(resolve_or_local_proxy(""), EmbeddingProviderKind::LmStudio);
        assert_eq!(
            resolve_or_local_proxy("local"),
            EmbeddingProviderKind::Local
        );
    }

    #[test]
    fn test_create_with_unknown_tag_succeeds() {
        let mut config = vox_config::EmbeddingConfig::default();
        config.provider = "unknown_xyz".to_string();
        let provider = EmbeddingFactory::create(&config).unwrap();
        assert_eq!(provider.model_info().provider, "lmstudio");
    }

    #[test]
    fn test_hosted_backends_require_keys() {
        let config = vox_config::EmbeddingConfig::default();
        assert!(EmbeddingFactory::create_kind(EmbeddingProviderKind::OpenAi, &config).is_err());
        assert!(EmbeddingFactory::create_kind(EmbeddingProviderKind::Google, &config).is_err());
    }

    #[test]
    fn test_local_backend_reports_dimension() {
        let mut config = vox_config::EmbeddingConfig::default();
        config.provider = "local".to_string();
        config.dimension = 128;
        let provider = EmbeddingFactory::create(&config).unwrap();
        assert_eq!(provider.dimension(), 128);
    }
}
