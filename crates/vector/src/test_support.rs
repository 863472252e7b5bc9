//! Shared test doubles for the store's operation tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::Method;
use serde_json::Value;

use vox_core::{EmbeddingModelInfo, EmbeddingProvider, Error, Result};
use vox_config::VectorStoreConfig;

use crate::client::Transport;
use crate::store::VectorStore;

/// Transport double that counts requests and replays a canned outcome.
pub struct CountingTransport {
    outcome: Outcome,
    count: AtomicUsize,
    last: Mutex<Option<(Method, String, Option<Value>)>>,
}

enum Outcome {
    Ok(Value),
    NotFound,
    Fail(String),
}

impl CountingTransport {
    pub fn ok(response: Value) -> Arc<Self> {
        Arc::new(Self {
            outcome: Outcome::Ok(response),
            count: AtomicUsize::new(0),
            last: Mutex::new(None),
        })
    }

    pub fn not_found() -> Arc<Self> {
        Arc::new(Self {
            outcome: Outcome::NotFound,
            count: AtomicUsize::new(0),
            last: Mutex::new(None),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            outcome: Outcome::Fail(message.to_string()),
            count: AtomicUsize::new(0),
            last: Mutex::new(None),
        })
    }

    pub fn calls(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> (Method, String, Option<Value>) {
        self.last
            .lock()
            .clone()
            .expect("no request was recorded")
    }
}

#[async_trait]
impl Transport for CountingTransport {
    async fn request(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value> {
        self.count.fetch_add(1, Ordering::SeqCst);
        *self.last.lock() = Some((method, path.to_string(), body));
        match &self.outcome {
            Outcome::Ok(value) => Ok(value.clone()),
            Outcome::NotFound => Err(Error::NotFound("not found".to_string())),
            Outcome::Fail(message) => Err(Error::Transport(
                vox_core::TransportError::Connection(message.clone()),
            )),
        }
    }
}

/// Transport double that fails requests whose path contains a marker and
/// answers the rest with a canned response.
pub struct PathFailTransport {
    needle: String,
    response: Value,
}

impl PathFailTransport {
    pub fn new(needle: &str, response: Value) -> Arc<Self> {
        Arc::new(Self {
            needle: needle.to_string(),
            response,
        })
    }
}

#[async_trait]
impl Transport for PathFailTransport {
    async fn request(&self, _method: Method, path: &str, _body: Option<Value>) -> Result<Value> {
        if path.contains(&self.needle) {
            Err(Error::Transport(vox_core::TransportError::Connection(
                format!("{path} unreachable"),
            )))
        } else {
            Ok(self.response.clone())
        }
    }
}

/// Transport double that replays a sequence of successful responses.
pub struct SequenceTransport {
    responses: Mutex<Vec<Value>>,
}

impl SequenceTransport {
    pub fn new(responses: Vec<Value>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses),
        })
    }
}

#[async_trait]
impl Transport for SequenceTransport {
    async fn request(&self, _method: Method, _path: &str, _body: Option<Value>) -> Result<Value> {
        let mut responses = self.responses.lock();
        if responses.is_empty() {
            Err(Error::NotFound("sequence exhausted".to_string()))
        } else {
            Ok(responses.remove(0))
        }
    }
}

/// Embedder double returning a fixed vector, or failing every call.
pub struct StubEmbedder {
    pub vector: Vec<f32>,
    pub fail: bool,
}

impl StubEmbedder {
    pub fn fixed(vector: Vec<f32>) -> Arc<Self> {
        Arc::new(Self { vector, fail: false })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            vector: vec![],
            fail: true,
        })
    }
}

#[async_trait]
impl EmbeddingProvider for StubEmbedder {
    async fn create_embedding(&self, _text: &str) -> Result<Vec<f32>> {
        if self.fail {
            Err(Error::Embedding("stub embedder down".to_string()))
        } else {
            Ok(self.vector.clone())
        }
    }

    fn model_info(&self) -> EmbeddingModelInfo {
        EmbeddingModelInfo {
            provider: "stub".to_string(),
            model: "stub".to_string(),
            dimension: self.vector.len().max(4),
        }
    }

    async fn is_available(&self) -> bool {
        !self.fail
    }
}

fn test_config() -> VectorStoreConfig {
    VectorStoreConfig {
        endpoint: "http://localhost:6333".to_string(),
        api_key: None,
        collection: "kb".to_string(),
        dimension: 4,
        distance: "cosine".to_string(),
        timeout_ms: 5000,
    }
}

/// Store over a counting transport and a fixed-vector embedder.
pub fn store_with(transport: Arc<CountingTransport>) -> (VectorStore, Arc<CountingTransport>) {
    let store = VectorStore::with_transport(
        transport.clone(),
        StubEmbedder::fixed(vec![0.5, 0.5, 0.5, 0.5]),
        &test_config(),
    );
    (store, transport)
}

/// Store over a sequence-replaying transport.
pub fn store_with_sequence(responses: Vec<Value>) -> VectorStore {
    VectorStore::with_transport(
        SequenceTransport::new(responses),
        StubEmbedder::fixed(vec![0.5, 0.5, 0.5, 0.5]),
        &test_config(),
    )
}

/// Store over a transport that fails only paths containing `needle`.
pub fn store_with_path_failure(needle: &str, response: Value) -> VectorStore {
    VectorStore::with_transport(
        PathFailTransport::new(needle, response),
        StubEmbedder::fixed(vec![0.5, 0.5, 0.5, 0.5]),
        &test_config(),
    )
}

/// Store whose embedder fails every call.
pub fn store_with_failing_embedder(
    transport: Arc<CountingTransport>,
) -> (VectorStore, Arc<CountingTransport>) {
    let store =
        VectorStore::with_transport(transport.clone(), StubEmbedder::failing(), &test_config());
    (store, transport)
}
