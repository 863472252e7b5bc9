//! Embedding cache decorator
//!
//! Wraps any embedding provider with a cache keyed by the cleaned text.
//! A cache failure is never fatal: it logs and falls through to the
//! underlying provider.

use std::sync::Arc;

use async_trait::async_trait;

use vox_core::{CacheStore, EmbeddingModelInfo, EmbeddingProvider, Result};

pub struct CachedEmbedder {
    inner: Arc<dyn EmbeddingProvider>,
    cache: Arc<dyn CacheStore>,
}

impl CachedEmbedder {
    pub fn new(inner: Arc<dyn EmbeddingProvider>, cache: Arc<dyn CacheStore>) -> Self {
        Self { inner, cache }
    }

    fn cache_key(&self, text: &str) -> String {
        let info = self.inner.model_info();
        let cleaned = vox_text::clean(text).text;
        format!("emb:{}:{}:{}", info.provider, info.model, cleaned)
    }
}

#[async_trait]
impl EmbeddingProvider for CachedEmbedder {
    async fn create_embedding(&self, text: &str) -> Result<Vec<f32>> {
        let key = self.cache_key(text);

        match self.cache.get(&key).await {
            Ok(Some(stored)) => {
                if let Ok(vector) = serde_json::from_str::<Vec<f32>>(&stored) {
                    return Ok(vector);
                }
                tracing::warn!("cached embedding is unreadable, recomputing");
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "embedding cache lookup failed"),
        }

        let vector = self.inner.create_embedding(text).await?;

        if let Ok(serialized) = serde_json::to_string(&vector) {
            if let Err(e) = self.cache.set(&key, &serialized, None).await {
                tracing::warn!(error = %e, "embedding cache write failed");
            }
        }
        Ok(vector)
    }

    fn model_info(&self) -> EmbeddingModelInfo {
        self.inner.model_info()
    }

    async fn is_available(&self) -> bool {
        self.inner.is_available().await
    }
}
