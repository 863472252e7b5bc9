//! Core traits and types for the vox backend
//!
//! This crate provides foundational types used across all other crates:
//! - Core traits for pluggable backends (embedding, LLM, cache)
//! - The workspace-wide error taxonomy and `Result` alias
//! - Retrieval chunk and vector point types
//! - Chat message and conversation types
//! - Composite health reporting

pub mod chunk;
pub mod conversation;
pub mod error;
pub mod health;
pub mod llm_types;
pub mod traits;

pub use chunk::{RagChunk, ScoredPoint, VectorPoint};
pub use conversation::{ConversationHistory, Turn, TurnRole};
pub use error::{Error, Result, TransportError};
pub use health::{HealthCheck, HealthReport, HealthStatus};
pub use llm_types::{FinishReason, GenerationResult, Message, Role, TokenUsage};
pub use traits::{
    CacheEntry, CacheStats, CacheStore, EmbeddingModelInfo, EmbeddingProvider, LanguageModel,
};
