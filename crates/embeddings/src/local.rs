//! Local hashing embedder
//!
//! No model, no network: characters are folded into a fixed-size bucketed
//! vector which is then L2-normalized. Retrieval quality is far below a
//! real model, but the output is deterministic and always available, which
//! is exactly what offline development and tests need.

use async_trait::async_trait;

use vox_core::{EmbeddingModelInfo, EmbeddingProvider, Result};

/// Deterministic in-process embedding backend
pub struct HashEmbedding {
    dimension: usize,
}

impl HashEmbedding {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    fn embed(&self, text: &str) -> Vec<f32> {
        let mut embedding = vec![0.0f32; self.dimension];

        for (i, c) in text.chars().enumerate() {
            let idx = (c as usize + i) % self.dimension;
            embedding[idx] += 1.0;
        }

        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut embedding {
                *v /= norm;
            }
        }

        embedding
    }
}

#[async_trait]
impl EmbeddingProvider for HashEmbedding {
    async fn create_embedding(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.embed(text))
    }

    fn model_info(&self) -> EmbeddingModelInfo {
        EmbeddingModelInfo {
            provider: "local".to_string(),
            model: "char-hash".to_string(),
            dimension: self.dimension,
        }
    }

    async fn is_available(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_deterministic_and_normalized() {
        let embedder = HashEmbedding::new(384);
        let a = embedder.create_embedding("hello world").await.unwrap();
        let b = embedder.create_embedding("hello world").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 384);

        let norm: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 0.01);
    }

    #[tokio::test]
    async fn test_empty_input_is_zero_vector() {
        let embedder = HashEmbedding::new(16);
        let v = embedder.create_embedding("").await.unwrap();
        assert!(v.iter().all(|x| *x == 0.0));
    }

    #[tokio::test]
    async fn test_always_available() {
        assert!(HashEmbedding::new(8).is_available().await);
    }
}
