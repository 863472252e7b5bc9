//! Knowledge base: document ingestion and retrieval
//!
//! Documents are cleaned, embedded, and upserted into the vector store;
//! queries come back as `RagChunk`s ready to splice into an LLM prompt.

mod cached_embedder;
mod knowledge_base;

pub use cached_embedder::CachedEmbedder;
pub use knowledge_base::{Document, KnowledgeBase};
