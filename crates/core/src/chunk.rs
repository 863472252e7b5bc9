//! Retrieval chunk and scored point types

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A unit of retrievable text plus its vector-search metadata.
///
/// The score is meaningful only relative to other chunks returned from the
/// same query; do not compare scores across queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagChunk {
    /// Unique within one collection
    pub id: String,
    /// Raw chunk text
    pub text: String,
    /// Relevance score, higher is more relevant; range depends on the
    /// backend's distance metric
    pub score: f32,
    /// Open metadata mapping
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl RagChunk {
    pub fn new(id: impl Into<String>, text: impl Into<String>, score: f32) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            score,
            metadata: HashMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

/// A raw search hit from the vector store, before payload text extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredPoint {
    pub id: String,
    pub score: f32,
    #[serde(default)]
    pub payload: HashMap<String, serde_json::Value>,
    #[serde(default)]
    pub vector: Option<Vec<f32>>,
}

/// A point to be written to the vector store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorPoint {
    pub id: String,
    pub vector: Vec<f32>,
    #[serde(default)]
    pub payload: HashMap<String, serde_json::Value>,
}

impl VectorPoint {
    pub fn new(id: impl Into<String>, vector: Vec<f32>) -> Self {
        Self {
            id: id.into(),
            vector,
            payload: HashMap::new(),
        }
    }

    pub fn with_payload(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.payload.insert(key.into(), value);
        self
    }
}
