//! Gemini embedding backend (`embedContent` API)

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use vox_core::{EmbeddingModelInfo, EmbeddingProvider, Error, Result, TransportError};

const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Connection settings for the Gemini embedding API
#[derive(Debug, Clone)]
pub struct GoogleEmbeddingConfig {
    pub api_key: String,
    pub model: String,
    pub dimension: usize,
    pub timeout_ms: u64,
    /// Override for tests; defaults to the public API base
    pub api_base: Option<String>,
}

/// Embedding backend for Google's hosted API
pub struct GoogleEmbedding {
    config: GoogleEmbeddingConfig,
    client: Client,
}

impl GoogleEmbedding {
    pub fn new(config: GoogleEmbeddingConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(Error::Construction(
                "google embedding provider requires an api key".to_string(),
            ));
        }
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| Error::Construction(e.to_string()))?;
        Ok(Self { config, client })
    }

    fn embed_url(&self) -> String {
        let base = self
            .config
            .api_base
            .as_deref()
            .unwrap_or(DEFAULT_API_BASE)
            .trim_end_matches('/');
        format!(
            "{}/models/{}:embedContent?key={}",
            base, self.config.model, self.config.api_key
        )
    }

    fn map_transport(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::Transport(TransportError::Timeout(self.config.timeout_ms))
        } else {
            Error::Transport(TransportError::Connection(e.to_string()))
        }
    }
}

#[async_trait]
impl EmbeddingProvider for GoogleEmbedding {
    async fn create_embedding(&self, text: &str) -> Result<Vec<f32>> {
        let body = EmbedContentRequest {
            content: Content {
                parts: vec![Part {
                    text: text.to_string(),
                }],
            },
        };

        let response = self
            .client
            .post(self.embed_url())
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_transport(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Transport(TransportError::Status {
                status: status.as_u16(),
                body,
            }));
        }

        let parsed: EmbedContentResponse = response
            .json()
            .await
            .map_err(|e| Error::Embedding(format!("malformed response: {e}")))?;

        Ok(parsed.embedding.values)
    }

    fn model_info(&self) -> EmbeddingModelInfo {
        EmbeddingModelInfo {
            provider: "google".to_string(),
            model: self.config.model.clone(),
            dimension: self.config.dimension,
        }
    }

    async fn is_available(&self) -> bool {
        self.create_embedding("ping").await.is_ok()
    }
}

#[derive(Debug, Serialize)]
struct EmbedContentRequest {
    content: Content,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct EmbedContentResponse {
    embedding: EmbeddingValues,
}

#[derive(Debug, Deserialize)]
struct EmbeddingValues {
    values: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_api_key() {
        let result = GoogleEmbedding::new(GoogleEmbeddingConfig {
            api_key: String::new(),
            model: "text-embedding-004".to_string(),
            dimension: 768,
            timeout_ms: 1000,
            api_base: None,
        });
        assert!(matches!(result, Err(Error::Construction(_))));
    }

    #[test]
    fn test_embed_url_shape() {
        let backend = GoogleEmbedding::new(GoogleEmbeddingConfig {
            api_key: "k".to_string(),
            model: "text-embedding-004".to_string(),
            dimension: 768,
            timeout_ms: 1000,
            api_base: None,
        })
        .unwrap();
        assert!(backend
            .embed_url()
            .ends_with("/models/text-embedding-004:embedContent?key=k"));
    }
}
