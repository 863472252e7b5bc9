//! OpenAI-compatible embedding backend
//!
//! Covers both the LM Studio local proxy and the hosted OpenAI API; the
//! two differ only in base URL and whether a bearer token is sent.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use vox_core::{EmbeddingModelInfo, EmbeddingProvider, Error, Result, TransportError};

/// Connection settings for one OpenAI-compatible endpoint
#[derive(Debug, Clone)]
pub struct OpenAiCompatConfig {
    pub provider_tag: String,
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
    pub dimension: usize,
    pub timeout_ms: u64,
}

/// Embedding backend speaking the OpenAI `/embeddings` wire format
pub struct OpenAiCompatEmbedding {
    config: OpenAiCompatConfig,
    client: Client,
}

impl OpenAiCompatEmbedding {
    /// Build the handle. No network calls are made here; connectivity is
    /// checked lazily on first use.
    pub fn new(config: OpenAiCompatConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| Error::Construction(e.to_string()))?;
        Ok(Self { config, client })
    }

    fn embeddings_url(&self) -> String {
        format!("{}/embeddings", self.config.endpoint.trim_end_matches('/'))
    }

    fn map_transport(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::Transport(TransportError::Timeout(self.config.timeout_ms))
        } else {
            Error::Transport(TransportError::Connection(e.to_string()))
        }
    }

    async fn request(&self, inputs: Vec<String>) -> Result<Vec<Vec<f32>>> {
        let body = EmbeddingsRequest {
            model: self.config.model.clone(),
            input: inputs,
        };

        let mut request = self.client.post(self.embeddings_url()).json(&body);
        if let Some(ref key) = self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| self.map_transport(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Transport(TransportError::Status {
                status: status.as_u16(),
                body,
            }));
        }

        let parsed: EmbeddingsResponse = response
            .json()
            .await
            .map_err(|e| Error::Embedding(format!("malformed response: {e}")))?;

        let mut items = parsed.data;
        items.sort_by_key(|d| d.index);
        Ok(items.into_iter().map(|d| d.embedding).collect())
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiCompatEmbedding {
    async fn create_embedding(&self, text: &str) -> Result<Vec<f32>> {
        let mut vectors = self.request(vec![text.to_string()]).await?;
        vectors
            .pop()
            .ok_or_else(|| Error::Embedding("empty embedding response".to_string()))
    }

    async fn create_embeddings(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let vectors = self.request(texts.to_vec()).await?;
        if vectors.len() != texts.len() {
            return Err(Error::Embedding(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                vectors.len()
            )));
        }
        Ok(vectors)
    }

    fn model_info(&self) -> EmbeddingModelInfo {
        EmbeddingModelInfo {
            provider: self.config.provider_tag.clone(),
            model: self.config.model.clone(),
            dimension: self.config.dimension,
        }
    }

    async fn is_available(&self) -> bool {
        // The models listing is the cheapest OpenAI-compatible probe.
        let url = format!("{}/models", self.config.endpoint.trim_end_matches('/'));
        let mut request = self.client.get(url);
        if let Some(ref key) = self.config.api_key {
            request = request.bearer_auth(key);
        }
        matches!(request.send().await, Ok(resp) if resp.status().is_success())
    }
}

#[derive(Debug, Serialize)]
struct EmbeddingsRequest {
    model: String,
    input: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingItem>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingItem {
    index: usize,
    embedding: Vec<f32>,
}
