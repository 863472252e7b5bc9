//! Point write and read operations
//!
//! Writes are all-or-nothing: the whole batch is validated locally first,
//! and a single request carries it to the backend with wait=true so the
//! write is durable when the call returns.

use reqwest::Method;
use serde_json::{json, Value};

use vox_core::{Result, ScoredPoint, VectorPoint};

use crate::store::VectorStore;
use crate::validate;

impl VectorStore {
    /// Upsert a batch of points. The first malformed point fails the whole
    /// batch before any request is issued.
    pub async fn upsert_points(&self, collection: &str, points: &[VectorPoint]) -> Result<u64> {
        validate::collection_name(collection)?;
        validate::points_batch(points)?;
        let body = json!({
            "points": points
                .iter()
                .map(|p| json!({
                    "id": p.id,
                    "vector": p.vector,
                    "payload": p.payload,
                }))
                .collect::<Vec<_>>()
        });
        self.transport
            .request(
                Method::PUT,
                &format!("/collections/{collection}/points?wait=true"),
                Some(body),
            )
            .await?;
        tracing::debug!(collection, count = points.len(), "upserted points");
        Ok(points.len() as u64)
    }

    /// Delete points by id.
    pub async fn delete_points(&self, collection: &str, ids: &[String]) -> Result<()> {
        validate::collection_name(collection)?;
        if ids.is_empty() {
            return Ok(());
        }
        let body = json!({ "points": ids });
        self.transport
            .request(
                Method::POST,
                &format!("/collections/{collection}/points/delete?wait=true"),
                Some(body),
            )
            .await?;
        Ok(())
    }

    /// Fetch points by id, with payloads and vectors.
    pub async fn get_points(&self, collection: &str, ids: &[String]) -> Result<Vec<ScoredPoint>> {
        validate::collection_name(collection)?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let body = json!({
            "ids": ids,
            "with_payload": true,
            "with_vector": true,
        });
        let response = self
            .transport
            .request(
                Method::POST,
                &format!("/collections/{collection}/points"),
                Some(body),
            )
            .await?;
        Ok(parse_records(&response["result"]))
    }

    /// Page through a collection's points. Returns the page plus the offset
    /// for the next page, `None` when the collection is exhausted.
    pub async fn scroll_points(
        &self,
        collection: &str,
        limit: usize,
        offset: Option<String>,
    ) -> Result<(Vec<ScoredPoint>, Option<String>)> {
        validate::collection_name(collection)?;
        validate::limit(limit)?;
        let mut body = json!({
            "limit": limit,
            "with_payload": true,
            "with_vector": false,
        });
        if let Some(offset) = offset {
            body["offset"] = json!(offset);
        }
        let response = self
            .transport
            .request(
                Method::POST,
                &format!("/collections/{collection}/points/scroll"),
                Some(body),
            )
            .await?;
        let points = parse_records(&response["result"]["points"]);
        let next = match &response["result"]["next_page_offset"] {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        };
        Ok((points, next))
    }

    /// Exact point count.
    pub async fn count_points(&self, collection: &str) -> Result<u64> {
        validate::collection_name(collection)?;
        let response = self
            .transport
            .request(
                Method::POST,
                &format!("/collections/{collection}/points/count"),
                Some(json!({"exact": true})),
            )
            .await?;
        Ok(response["result"]["count"].as_u64().unwrap_or(0))
    }
}

/// Records carry no score; hits carry one. Both shapes normalize to
/// `ScoredPoint`, records with a zero score.
pub(crate) fn parse_records(value: &Value) -> Vec<ScoredPoint> {
    value
        .as_array()
        .map(|entries| {
            entries
                .iter()
                .map(|entry| ScoredPoint {
                    id: match &entry["id"] {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    },
                    score: entry["score"].as_f64().unwrap_or(0.0) as f32,
                    payload: entry["payload"]
                        .as_object()
                        .map(|m| m.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
                        .unwrap_or_default(),
                    vector: entry["vector"].as_array().map(|v| {
                        v.iter()
                            .filter_map(|n| n.as_f64().map(|f| f as f32))
                            .collect()
                    }),
                })
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{store_with, CountingTransport};
    use serde_json::json;

    #[tokio::test]
    async fn test_invalid_batch_never_reaches_network() {
        let (store, transport) = store_with(CountingTransport::ok(json!({"result": {}})));
        let points = vec![
            VectorPoint::new("a", vec![0.1]),
            VectorPoint::new("b", vec![f32::INFINITY]),
        ];
        let err = store.upsert_points("kb", &points).await.unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("index 1"));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_upsert_waits_for_durability() {
        let (store, transport) = store_with(CountingTransport::ok(json!({"result": {}})));
        let points = vec![VectorPoint::new("a", vec![0.1, 0.2])];
        let written = store.upsert_points("kb", &points).await.unwrap();
        assert_eq!(written, 1);
        let (method, path, _) = transport.last_request();
        assert_eq!(method, Method::PUT);
        assert_eq!(path, "/collections/kb/points?wait=true");
    }

    #[tokio::test]
    async fn test_upsert_then_get_round_trip() {
        let store = crate::test_support::store_with_sequence(vec![
            json!({"result": {}}),
            json!({"result": [
                {"id": "p1", "payload": {"text": "body"}, "vector": [0.1, 0.2]}
            ]}),
        ]);
        let point = VectorPoint::new("p1", vec![0.1, 0.2])
            .with_payload("text", json!("body"));
        store.upsert_points("kb", &[point]).await.unwrap();

        let fetched = store
            .get_points("kb", &["p1".to_string()])
            .await
            .unwrap();
        assert_eq!(fetched.len(), 1);
        assert_eq!(fetched[0].id, "p1");
        assert_eq!(fetched[0].payload.get("text").unwrap(), "body");
        assert_eq!(fetched[0].vector.as_deref(), Some(&[0.1, 0.2][..]));
    }

    #[tokio::test]
    async fn test_delete_empty_ids_is_noop() {
        let (store, transport) = store_with(CountingTransport::ok(json!({"result": {}})));
        store.delete_points("kb", &[]).await.unwrap();
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_scroll_returns_next_offset() {
        let (store, _) = store_with(CountingTransport::ok(json!({
            "result": {
                "points": [
                    {"id": "p1", "payload": {"text": "hello"}},
                    {"id": 7, "payload": {}}
                ],
                "next_page_offset": "p3"
            }
        })));
        let (points, next) = store.scroll_points("kb", 2, None).await.unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].id, "p1");
        assert_eq!(points[1].id, "7");
        assert_eq!(next.as_deref(), Some("p3"));
    }

    #[tokio::test]
    async fn test_scroll_end_has_no_offset() {
        let (store, _) = store_with(CountingTransport::ok(json!({
            "result": {"points": [], "next_page_offset": null}
        })));
        let (points, next) = store.scroll_points("kb", 10, None).await.unwrap();
        assert!(points.is_empty());
        assert!(next.is_none());
    }

    #[tokio::test]
    async fn test_count_points() {
        let (store, _) = store_with(CountingTransport::ok(json!({"result": {"count": 12}})));
        assert_eq!(store.count_points("kb").await.unwrap(), 12);
    }

    #[tokio::test]
    async fn test_zero_limit_rejected_locally() {
        let (store, transport) = store_with(CountingTransport::ok(json!({"result": {}})));
        assert!(store.scroll_points("kb", 0, None).await.is_err());
        assert_eq!(transport.calls(), 0);
    }
}
