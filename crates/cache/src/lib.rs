//! Cache/search provider backends and factory
//!
//! Backends:
//! - `memory`: in-process map with TTL and capacity eviction
//! - `whoosh`: full-text index (tantivy) over cached entries, ranked search
//! - `redis` / `elasticsearch`: declared hosted engines, not yet built
//!
//! Unlike the embedding and LLM factories, this factory is strict: an
//! unknown tag is an unsupported-provider error, never a silent fallback.

mod factory;
mod fulltext;
mod memory;

pub use factory::{CacheFactory, CacheProviderKind};
pub use fulltext::FullTextCache;
pub use memory::MemoryCache;
