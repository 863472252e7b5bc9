//! Store facade
//!
//! One `VectorStore` value; the operation families (collections, points,
//! search, monitoring) live in their own modules as separate impl blocks.

use std::sync::Arc;

use vox_config::VectorStoreConfig;
use vox_core::{EmbeddingProvider, Error, Result};

use crate::client::{QdrantHttpClient, Transport};

/// Component used for the placeholder vector substituted when the
/// embedding provider is down. Non-zero so cosine distance stays defined.
pub(crate) const PLACEHOLDER_COMPONENT: f32 = 0.1;

/// Distance metric for created collections
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Distance {
    Cosine,
    Euclid,
    Dot,
}

impl Distance {
    pub fn from_tag(tag: &str) -> Result<Self> {
        match tag.to_lowercase().as_str() {
            "cosine" => Ok(Self::Cosine),
            "euclid" | "euclidean" => Ok(Self::Euclid),
            "dot" | "dotproduct" => Ok(Self::Dot),
            other => Err(Error::Validation(format!("unknown distance metric '{other}'"))),
        }
    }

    /// Qdrant wire name
    pub fn as_wire(&self) -> &'static str {
        match self {
            Self::Cosine => "Cosine",
            Self::Euclid => "Euclid",
            Self::Dot => "Dot",
        }
    }
}

/// HTTP-backed vector store with an injected embedding provider
pub struct VectorStore {
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) embedder: Arc<dyn EmbeddingProvider>,
    pub(crate) default_collection: String,
    pub(crate) dimension: usize,
}

impl VectorStore {
    /// Build against a live Qdrant endpoint. No connection is attempted;
    /// the first real operation finds out whether the endpoint is up.
    pub fn new(config: &VectorStoreConfig, embedder: Arc<dyn EmbeddingProvider>) -> Result<Self> {
        let client =
            QdrantHttpClient::new(&config.endpoint, config.api_key.clone(), config.timeout_ms)?;
        Ok(Self::with_transport(Arc::new(client), embedder, config))
    }

    /// Build over any transport. Used by tests to substitute a double.
    pub fn with_transport(
        transport: Arc<dyn Transport>,
        embedder: Arc<dyn EmbeddingProvider>,
        config: &VectorStoreConfig,
    ) -> Self {
        Self {
            transport,
            embedder,
            default_collection: config.collection.clone(),
            dimension: config.dimension,
        }
    }

    /// Collection used when callers don't name one
    pub fn default_collection(&self) -> &str {
        &self.default_collection
    }

    pub(crate) fn placeholder_vector(&self) -> Vec<f32> {
        vec![PLACEHOLDER_COMPONENT; self.dimension]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_tags() {
        assert_eq!(Distance::from_tag("cosine").unwrap(), Distance::Cosine);
        assert_eq!(Distance::from_tag("Euclidean").unwrap(), Distance::Euclid);
        assert_eq!(Distance::from_tag("dot").unwrap(), Distance::Dot);
        assert!(Distance::from_tag("manhattan").is_err());
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(Distance::Cosine.as_wire(), "Cosine");
        assert_eq!(Distance::Euclid.as_wire(), "Euclid");
        assert_eq!(Distance::Dot.as_wire(), "Dot");
    }
}
