//! Traits for pluggable backends

pub mod cache;
pub mod embedding;
pub mod llm;

pub use cache::{CacheEntry, CacheStats, CacheStore};
pub use embedding::{EmbeddingModelInfo, EmbeddingProvider};
pub use llm::LanguageModel;
