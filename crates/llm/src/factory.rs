//! LLM provider factory

use std::sync::Arc;

use vox_config::LlmConfig;
use vox_core::{Error, LanguageModel, Result};

use crate::backend::{OpenAiCompatChat, OpenAiCompatChatConfig};
use crate::google::{GoogleChat, GoogleChatConfig};

/// Known LLM backends. `Vllm` and `Ollama` are declared but not built;
/// selecting them is a deployment gap, reported as such rather than as an
/// unsupported tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProviderKind {
    /// LM Studio local proxy (OpenAI-compatible)
    LmStudio,
    /// Hosted OpenAI API
    OpenAi,
    /// Hosted Gemini API
    Google,
    /// Self-hosted vLLM runtime (not yet supported)
    Vllm,
    /// Self-hosted Ollama runtime (not yet supported)
    Ollama,
}

impl LlmProviderKind {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.to_lowercase().as_str() {
            "lmstudio" | "lm_studio" => Some(Self::LmStudio),
            "openai" => Some(Self::OpenAi),
            "google" | "gemini" => Some(Self::Google),
            "vllm" => Some(Self::Vllm),
            "ollama" => Some(Self::Ollama),
            _ => None,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Self::LmStudio => "lmstudio",
            Self::OpenAi => "openai",
            Self::Google => "google",
            Self::Vllm => "vllm",
            Self::Ollama => "ollama",
        }
    }
}

/// Fallback policy shared with the embedding factory: empty or
/// unrecognized tags resolve to the local proxy so the deployment stays
/// runnable offline. See `vox_embeddings::resolve_or_local_proxy`.
pub fn resolve_or_local_proxy(tag: &str) -> LlmProviderKind {
    match LlmProviderKind::from_tag(tag) {
        Some(kind) => kind,
        None => {
            tracing::warn!(tag, "unrecognized llm provider, falling back to local proxy");
            LlmProviderKind::LmStudio
        }
    }
}

/// Factory for language model handles
pub struct LlmFactory;

impl LlmFactory {
    /// Resolve the configured tag (with local-proxy fallback) and build
    /// the handle. No network calls happen here.
    pub fn create(config: &LlmConfig) -> Result<Arc<dyn LanguageModel>> {
        let kind = resolve_or_local_proxy(&config.provider);
        Self::create_kind(kind, config)
    }

    /// Build a specific backend, bypassing the fallback policy.
    pub fn create_kind(kind: LlmProviderKind, config: &LlmConfig) -> Result<Arc<dyn LanguageModel>> {
        match kind {
            LlmProviderKind::LmStudio => {
                let backend = OpenAiCompatChat::new(OpenAiCompatChatConfig {
                    provider_tag: "lmstudio".to_string(),
                    endpoint: config.endpoint.clone(),
                    model: config.model.clone(),
                    api_key: None,
                    max_tokens: config.max_tokens,
                    temperature: config.temperature,
                    timeout_ms: config.timeout_ms,
                })?;
                Ok(Arc::new(backend))
            }

            LlmProviderKind::OpenAi => {
                let api_key = config.api_key.clone().ok_or_else(|| {
                    Error::Construction("openai llm provider requires an api key".to_string())
                })?;
                let backend = OpenAiCompatChat::new(OpenAiCompatChatConfig {
                    provider_tag: "openai".to_string(),
                    endpoint: "https://api.openai.com/v1".to_string(),
                    model: config.model.clone(),
                    api_key: Some(api_key),
                    max_tokens: config.max_tokens,
                    temperature: config.temperature,
                    timeout_ms: config.timeout_ms,
                })?;
                Ok(Arc::new(backend))
            }

            LlmProviderKind::Google => {
                let api_key = config.api_key.clone().ok_or_else(|| {
                    Error::Construction("google llm provider requires an api key".to_string())
                })?;
                let backend = GoogleChat::new(GoogleChatConfig {
                    api_key,
                    model: config.model.clone(),
                    max_tokens: config.max_tokens,
                    temperature: config.temperature,
                    timeout_ms: config.timeout_ms,
                    api_base: None,
                })?;
                Ok(Arc::new(backend))
            }

            LlmProviderKind::Vllm | LlmProviderKind::Ollama => {
                Err(Error::NotImplemented(kind.tag().to_string()))
            }
        }
    }
}
