//! Embedding provider contract
//!
//! Every embedding handle exposes the same surface regardless of which
//! backend the factory selected. Constructors must not touch the network;
//! connectivity is probed lazily via `is_available`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;

/// Static description of the model behind a provider handle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingModelInfo {
    pub provider: String,
    pub model: String,
    pub dimension: usize,
}

/// Pluggable embedding backend
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single text
    async fn create_embedding(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed a batch of texts, preserving order
    async fn create_embeddings(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.create_embedding(text).await?);
        }
        Ok(out)
    }

    /// Model identity and output dimension
    fn model_info(&self) -> EmbeddingModelInfo;

    /// Output vector dimension
    fn dimension(&self) -> usize {
        self.model_info().dimension
    }

    /// Lazy connectivity probe; false means degraded, not fatal
    async fn is_available(&self) -> bool;
}
