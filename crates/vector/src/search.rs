//! Vector and text search
//!
//! Text search degrades instead of failing: when the embedding provider is
//! down the query falls back to a fixed placeholder vector, logged loudly,
//! so the caller still gets an answer shape rather than an error.

use reqwest::Method;
use serde_json::{json, Value};

use vox_core::{RagChunk, Result, ScoredPoint};

use crate::points::parse_records;
use crate::store::VectorStore;
use crate::validate;

impl VectorStore {
    /// Nearest-neighbour search over a raw vector. Hits come back sorted by
    /// score descending with `score_threshold` applied. Both are forwarded
    /// to the backend and also enforced locally, since a proxy between
    /// client and backend may ignore the search parameters.
    pub async fn search_by_vector(
        &self,
        collection: &str,
        vector: &[f32],
        limit: usize,
        score_threshold: Option<f32>,
        filter: Option<Value>,
    ) -> Result<Vec<ScoredPoint>> {
        validate::collection_name(collection)?;
        validate::limit(limit)?;
        if vector.is_empty() {
            return Err(vox_core::Error::Validation(
                "query vector is empty".to_string(),
            ));
        }
        let mut body = json!({
            "vector": vector,
            "limit": limit,
            "with_payload": true,
        });
        if let Some(threshold) = score_threshold {
            body["score_threshold"] = json!(threshold);
        }
        if let Some(filter) = filter {
            body["filter"] = filter;
        }
        let response = self
            .transport
            .request(
                Method::POST,
                &format!("/collections/{collection}/points/search"),
                Some(body),
            )
            .await?;
        let mut hits = parse_records(&response["result"]);
        // The backend applies the threshold and sorts, but a proxy in the
        // middle might not; enforce both here.
        if let Some(threshold) = score_threshold {
            hits.retain(|h| h.score >= threshold);
        }
        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        Ok(hits)
    }

    /// Embed the query text, search, and extract chunk text from payloads.
    /// An embedding failure falls back to a placeholder vector rather than
    /// failing the search.
    pub async fn search_by_text(
        &self,
        collection: &str,
        query: &str,
        limit: usize,
        score_threshold: Option<f32>,
    ) -> Result<Vec<RagChunk>> {
        validate::collection_name(collection)?;
        validate::limit(limit)?;
        if query.trim().is_empty() {
            return Err(vox_core::Error::Validation("query text is empty".to_string()));
        }

        let vector = match self.embedder.create_embedding(query).await {
            Ok(vector) => vector,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "embedding provider unavailable, searching with placeholder vector"
                );
                self.placeholder_vector()
            }
        };

        let hits = self
            .search_by_vector(collection, &vector, limit, score_threshold, None)
            .await?;
        Ok(hits
            .into_iter()
            .map(|hit| {
                let text = extract_text(&hit.payload);
                RagChunk {
                    id: hit.id,
                    text,
                    score: hit.score,
                    metadata: hit.payload,
                }
            })
            .collect())
    }
}

/// Stands in for chunk text when no known payload field matches, so the
/// caller sees that a hit carried no usable text instead of a silent blank.
pub const NO_TEXT_PLACEHOLDER: &str = "[no text payload]";

/// Chunk text lives at payload "text", or nested at "chunk.text" or
/// "document.content" depending on who wrote the point.
fn extract_text(payload: &std::collections::HashMap<String, Value>) -> String {
    if let Some(text) = payload.get("text").and_then(Value::as_str) {
        return text.to_string();
    }
    if let Some(text) = payload
        .get("chunk")
        .and_then(|c| c.get("text"))
        .and_then(Value::as_str)
    {
        return text.to_string();
    }
    if let Some(text) = payload
        .get("document")
        .and_then(|d| d.get("content"))
        .and_then(Value::as_str)
    {
        return text.to_string();
    }
    NO_TEXT_PLACEHOLDER.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::PLACEHOLDER_COMPONENT;
    use crate::test_support::{store_with, store_with_failing_embedder, CountingTransport};
    use serde_json::json;

    fn hits(scores: &[f32]) -> Value {
        json!({
            "result": scores
                .iter()
                .enumerate()
                .map(|(i, s)| json!({"id": format!("p{i}"), "score": s, "payload": {"text": "t"}}))
                .collect::<Vec<_>>()
        })
    }

    #[tokio::test]
    async fn test_results_sorted_descending() {
        let (store, _) = store_with(CountingTransport::ok(hits(&[0.95, 0.85, 0.99])));
        let results = store
            .search_by_vector("kb", &[0.1, 0.2], 10, None, None)
            .await
            .unwrap();
        let scores: Vec<f32> = results.iter().map(|r| r.score).collect();
        assert_eq!(scores, vec![0.99, 0.95, 0.85]);
    }

    #[tokio::test]
    async fn test_threshold_drops_low_scores() {
        let (store, _) = store_with(CountingTransport::ok(hits(&[0.95, 0.85, 0.99])));
        let results = store
            .search_by_vector("kb", &[0.1, 0.2], 10, Some(0.9), None)
            .await
            .unwrap();
        let scores: Vec<f32> = results.iter().map(|r| r.score).collect();
        assert_eq!(scores, vec![0.99, 0.95]);
    }

    #[tokio::test]
    async fn test_threshold_forwarded_to_backend() {
        let (store, transport) = store_with(CountingTransport::ok(hits(&[])));
        store
            .search_by_vector("kb", &[0.1], 5, Some(0.9), None)
            .await
            .unwrap();
        let (_, path, body) = transport.last_request();
        assert_eq!(path, "/collections/kb/points/search");
        assert_eq!(body.unwrap()["score_threshold"], 0.9);
    }

    #[tokio::test]
    async fn test_empty_vector_rejected_locally() {
        let (store, transport) = store_with(CountingTransport::ok(hits(&[])));
        let err = store
            .search_by_vector("kb", &[], 5, None, None)
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_text_search_yields_chunks() {
        let (store, _) = store_with(CountingTransport::ok(json!({
            "result": [
                {"id": "c1", "score": 0.9, "payload": {"text": "flat"}},
                {"id": "c2", "score": 0.8, "payload": {"chunk": {"text": "nested"}}},
                {"id": "c3", "score": 0.7, "payload": {"document": {"content": "doc"}}},
                {"id": "c4", "score": 0.6, "payload": {"other": 1}}
            ]
        })));
        let chunks = store.search_by_text("kb", "hello", 10, None).await.unwrap();
        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["flat", "nested", "doc", NO_TEXT_PLACEHOLDER]);
    }

    #[tokio::test]
    async fn test_embedding_failure_degrades_to_placeholder() {
        let (store, transport) =
            store_with_failing_embedder(CountingTransport::ok(hits(&[0.5])));
        let chunks = store.search_by_text("kb", "hello", 3, None).await.unwrap();
        assert_eq!(chunks.len(), 1);
        let (_, _, body) = transport.last_request();
        let sent: Vec<f32> = body.unwrap()["vector"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_f64().unwrap() as f32)
            .collect();
        assert!(sent.iter().all(|&v| v == PLACEHOLDER_COMPONENT));
    }

    #[tokio::test]
    async fn test_blank_query_rejected() {
        let (store, transport) = store_with(CountingTransport::ok(hits(&[])));
        assert!(store.search_by_text("kb", "   ", 3, None).await.is_err());
        assert_eq!(transport.calls(), 0);
    }
}
