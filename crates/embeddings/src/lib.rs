//! Embedding provider backends and factory
//!
//! Backends:
//! - `lmstudio`: OpenAI-compatible `/embeddings` endpoint on a local proxy
//! - `openai`: hosted OpenAI API (bearer auth)
//! - `google`: Gemini `embedContent` API
//! - `local`: deterministic in-process hashing embedder, always offline
//!
//! The factory resolves a configured tag to one ready handle. Empty or
//! unrecognized tags fall back to the local proxy rather than erroring:
//! the deployment must stay runnable fully offline. The cache factory in
//! `vox-cache` deliberately does NOT share this policy.

mod factory;
mod google;
mod local;
mod openai_like;

pub use factory::{resolve_or_local_proxy, EmbeddingFactory, EmbeddingProviderKind};
pub use google::GoogleEmbedding;
pub use local::HashEmbedding;
pub use openai_like::OpenAiCompatEmbedding;
