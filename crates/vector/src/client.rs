//! HTTP transport for the vector store
//!
//! The `Transport` trait is the seam the store talks through; production
//! uses `QdrantHttpClient`, tests substitute a counting double to prove
//! that validation failures never reach the network.

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use std::time::Duration;

use vox_core::{Error, Result, TransportError};

/// One JSON request/response exchange with the vector database
#[async_trait]
pub trait Transport: Send + Sync {
    async fn request(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value>;
}

/// reqwest-backed transport speaking Qdrant's REST conventions
pub struct QdrantHttpClient {
    base_url: String,
    api_key: Option<String>,
    timeout_ms: u64,
    client: Client,
}

impl QdrantHttpClient {
    /// Build the client. No connection is attempted here.
    pub fn new(endpoint: &str, api_key: Option<String>, timeout_ms: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| Error::Construction(e.to_string()))?;
        Ok(Self {
            base_url: endpoint.trim_end_matches('/').to_string(),
            api_key,
            timeout_ms,
            client,
        })
    }

    fn map_transport(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::Transport(TransportError::Timeout(self.timeout_ms))
        } else {
            Error::Transport(TransportError::Connection(e.to_string()))
        }
    }
}

#[async_trait]
impl Transport for QdrantHttpClient {
    async fn request(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        let mut builder = self.client.request(method, &url);
        if let Some(ref key) = self.api_key {
            builder = builder.header("api-key", key);
        }
        if let Some(body) = body {
            builder = builder.json(&body);
        }

        let response = builder.send().await.map_err(|e| self.map_transport(e))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| self.map_transport(e))?;

        if !status.is_success() {
            return Err(classify_status(status, &text));
        }

        if text.is_empty() {
            Ok(Value::Null)
        } else {
            serde_json::from_str(&text)
                .map_err(|e| Error::Store(format!("malformed response: {e}")))
        }
    }
}

/// Map an error status onto the taxonomy: 404 is not-found, conflicts
/// (including Qdrant's 400 "already exists") are conflicts, the rest stay
/// transport errors carrying the status.
fn classify_status(status: StatusCode, body: &str) -> Error {
    match status.as_u16() {
        404 => Error::NotFound(body.to_string()),
        409 => Error::Conflict(body.to_string()),
        400 if body.contains("already exists") => Error::Conflict(body.to_string()),
        code => Error::Transport(TransportError::Status {
            status: code,
            body: body.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_status() {
        assert!(matches!(
            classify_status(StatusCode::NOT_FOUND, "missing"),
            Error::NotFound(_)
        ));
        assert!(matches!(
            classify_status(StatusCode::CONFLICT, ""),
            Error::Conflict(_)
        ));
        assert!(matches!(
            classify_status(StatusCode::BAD_REQUEST, "collection already exists"),
            Error::Conflict(_)
        ));
        assert!(matches!(
            classify_status(StatusCode::INTERNAL_SERVER_ERROR, "boom"),
            Error::Transport(TransportError::Status { status: 500, .. })
        ));
    }

    #[test]
    fn test_base_url_trimmed() {
        let client =
            QdrantHttpClient::new("http://localhost:6333/", None, 5000).unwrap();
        assert_eq!(client.base_url, "http://localhost:6333");
    }
}
