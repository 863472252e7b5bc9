//! Knowledge base service
//!
//! Ingestion cleans the document, embeds it, and upserts a single point
//! carrying the cleaned text in its payload. Retrieval delegates to the
//! store's text search so the placeholder-vector degrade applies here too.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;

use vox_core::{EmbeddingProvider, RagChunk, Result, VectorPoint};
use vox_vector::{Distance, VectorStore};

/// A document to ingest, before cleaning
#[derive(Debug, Clone)]
pub struct Document {
    pub text: String,
    pub metadata: HashMap<String, serde_json::Value>,
}

impl Document {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            metadata: HashMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

pub struct KnowledgeBase {
    store: Arc<VectorStore>,
    embedder: Arc<dyn EmbeddingProvider>,
    collection: String,
}

impl KnowledgeBase {
    pub fn new(
        store: Arc<VectorStore>,
        embedder: Arc<dyn EmbeddingProvider>,
        collection: impl Into<String>,
    ) -> Self {
        Self {
            store,
            embedder,
            collection: collection.into(),
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Create the backing collection if it does not exist yet. A conflict
    /// from a racing creator counts as success.
    pub async fn ensure_collection(&self, distance: Distance) -> Result<()> {
        if self.store.collection_exists(&self.collection).await? {
            return Ok(());
        }
        match self
            .store
            .create_collection(&self.collection, self.embedder.dimension(), distance)
            .await
        {
            Ok(()) => Ok(()),
            Err(e) if e.is_conflict() => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Clean, embed, and upsert one document. Returns the point id.
    pub async fn add_document(&self, document: Document) -> Result<String> {
        let cleaned = vox_text::clean(&document.text);
        if cleaned.text.is_empty() {
            return Err(vox_core::Error::Validation(
                "document is empty after cleaning".to_string(),
            ));
        }

        let vector = self.embedder.create_embedding(&cleaned.text).await?;
        let id = Uuid::new_v4().to_string();
        let mut point = VectorPoint::new(id.clone(), vector)
            .with_payload("text", json!(cleaned.text));
        for (key, value) in document.metadata {
            point = point.with_payload(key, value);
        }

        self.store.upsert_points(&self.collection, &[point]).await?;
        tracing::debug!(id = %id, collection = %self.collection, "document ingested");
        Ok(id)
    }

    /// Ingest a batch. Embeddings are computed per document; the upsert is
    /// one all-or-nothing batch.
    pub async fn add_documents(&self, documents: Vec<Document>) -> Result<Vec<String>> {
        let mut points = Vec::with_capacity(documents.len());
        let mut ids = Vec::with_capacity(documents.len());

        for (index, document) in documents.into_iter().enumerate() {
            let cleaned = vox_text::clean(&document.text);
            if cleaned.text.is_empty() {
                return Err(vox_core::Error::Validation(format!(
                    "document at index {index} is empty after cleaning"
                )));
            }
            let vector = self.embedder.create_embedding(&cleaned.text).await?;
            let id = Uuid::new_v4().to_string();
            let mut point = VectorPoint::new(id.clone(), vector)
                .with_payload("text", json!(cleaned.text));
            for (key, value) in document.metadata {
                point = point.with_payload(key, value);
            }
            ids.push(id);
            points.push(point);
        }

        self.store.upsert_points(&self.collection, &points).await?;
        Ok(ids)
    }

    /// Retrieve the chunks most relevant to a query.
    pub async fn search(
        &self,
        query: &str,
        limit: usize,
        score_threshold: Option<f32>,
    ) -> Result<Vec<RagChunk>> {
        self.store
            .search_by_text(&self.collection, query, limit, score_threshold)
            .await
    }

    pub async fn delete_document(&self, id: &str) -> Result<()> {
        self.store
            .delete_points(&self.collection, &[id.to_string()])
            .await
    }

    pub async fn count(&self) -> Result<u64> {
        self.store.count_points(&self.collection).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use reqwest::Method;
    use serde_json::Value;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use vox_config::VectorStoreConfig;
    use vox_core::{EmbeddingModelInfo, Error};
    use vox_vector::Transport;

    struct RecordingTransport {
        responses: Mutex<Vec<Value>>,
        count: AtomicUsize,
        last_body: Mutex<Option<Value>>,
    }

    impl RecordingTransport {
        fn new(responses: Vec<Value>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses),
                count: AtomicUsize::new(0),
                last_body: Mutex::new(None),
            })
        }
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        async fn request(
            &self,
            _method: Method,
            _path: &str,
            body: Option<Value>,
        ) -> vox_core::Result<Value> {
            self.count.fetch_add(1, Ordering::SeqCst);
            *self.last_body.lock() = body;
            let mut responses = self.responses.lock();
            if responses.is_empty() {
                Err(Error::NotFound("exhausted".to_string()))
            } else {
                Ok(responses.remove(0))
            }
        }
    }

    struct FixedEmbedder;

    #[async_trait]
    impl EmbeddingProvider for FixedEmbedder {
        async fn create_embedding(&self, _text: &str) -> vox_core::Result<Vec<f32>> {
            Ok(vec![0.1, 0.2, 0.3, 0.4])
        }

        fn model_info(&self) -> EmbeddingModelInfo {
            EmbeddingModelInfo {
                provider: "test".to_string(),
                model: "m".to_string(),
                dimension: 4,
            }
        }

        async fn is_available(&self) -> bool {
            true
        }
    }

    fn knowledge_base(transport: Arc<RecordingTransport>) -> KnowledgeBase {
        let config = VectorStoreConfig {
            endpoint: "http://localhost:6333".to_string(),
            api_key: None,
            collection: "kb".to_string(),
            dimension: 4,
            distance: "cosine".to_string(),
            timeout_ms: 5000,
        };
        let embedder: Arc<dyn EmbeddingProvider> = Arc::new(FixedEmbedder);
        let store = Arc::new(VectorStore::with_transport(
            transport,
            embedder.clone(),
            &config,
        ));
        KnowledgeBase::new(store, embedder, "kb")
    }

    #[tokio::test]
    async fn test_add_document_cleans_payload_text() {
        let transport = RecordingTransport::new(vec![json!({"result": {}})]);
        let kb = knowledge_base(transport.clone());

        let id = kb
            .add_document(Document::new("hello 😀  world"))
            .await
            .unwrap();
        assert!(!id.is_empty());

        let body = transport.last_body.lock().clone().unwrap();
        let payload_text = body["points"][0]["payload"]["text"].as_str().unwrap();
        assert_eq!(payload_text, "hello world");
    }

    #[tokio::test]
    async fn test_empty_after_cleaning_rejected_without_network() {
        let transport = RecordingTransport::new(vec![]);
        let kb = knowledge_base(transport.clone());

        let err = kb.add_document(Document::new("😀😀")).await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(transport.count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_batch_is_one_upsert() {
        let transport = RecordingTransport::new(vec![json!({"result": {}})]);
        let kb = knowledge_base(transport.clone());

        let ids = kb
            .add_documents(vec![Document::new("one"), Document::new("two")])
            .await
            .unwrap();
        assert_eq!(ids.len(), 2);
        assert_eq!(transport.count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_search_returns_chunks() {
        let transport = RecordingTransport::new(vec![json!({
            "result": [{"id": "c1", "score": 0.9, "payload": {"text": "answer"}}]
        })]);
        let kb = knowledge_base(transport);

        let chunks = kb.search("question", 3, Some(0.5)).await.unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "answer");
    }
}
