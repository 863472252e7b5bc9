//! HTTP API server
//!
//! Composition root plus the REST surface. Domain errors cross into HTTP
//! status codes in exactly one place (`ApiError`); handlers stay on the
//! `Result` taxonomy.

pub mod chat;
pub mod error;
pub mod http;
pub mod metrics;
pub mod state;

pub use chat::ChatService;
pub use error::ApiError;
pub use http::create_router;
pub use metrics::{init_metrics, record_chat_turn, record_llm_latency};
pub use state::AppState;
