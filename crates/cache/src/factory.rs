//! Cache/search provider factory (strict, no fallback)

use std::sync::Arc;

use vox_config::CacheConfig;
use vox_core::{CacheStore, Error, Result};

use crate::fulltext::FullTextCache;
use crate::memory::MemoryCache;

/// Known cache/search backends. `Redis` and `Elasticsearch` are declared
/// but not built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheProviderKind {
    /// In-process map with TTL
    Memory,
    /// Full-text index over cached entries
    Whoosh,
    /// Hosted Redis (not yet supported)
    Redis,
    /// Hosted Elasticsearch (not yet supported)
    Elasticsearch,
}

impl CacheProviderKind {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.to_lowercase().as_str() {
            "memory" | "in_memory" => Some(Self::Memory),
            "whoosh" | "fulltext" => Some(Self::Whoosh),
            "redis" => Some(Self::Redis),
            "elasticsearch" => Some(Self::Elasticsearch),
            _ => None,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Whoosh => "whoosh",
            Self::Redis => "redis",
            Self::Elasticsearch => "elasticsearch",
        }
    }
}

/// Factory for cache/search handles.
///
/// Strict by design: an unknown tag errors instead of falling back. The
/// embedding and LLM factories deliberately behave differently (local-proxy
/// fallback); see `vox_embeddings::resolve_or_local_proxy`.
pub struct CacheFactory;

impl CacheFactory {
    pub fn create(config: &CacheConfig) -> Result<Arc<dyn CacheStore>> {
        let kind = CacheProviderKind::from_tag(&config.provider)
            .ok_or_else(|| Error::UnsupportedProvider(config.provider.clone()))?;

        match kind {
            CacheProviderKind::Memory => Ok(Arc::new(MemoryCache::new(
                config.ttl_secs,
                config.max_entries,
            ))),
            CacheProviderKind::Whoosh => {
                let cache = FullTextCache::new(config.index_path.as_deref())?;
                Ok(Arc::new(cache))
            }
            // Hosted engines are recognized tags but have no backend here;
            // they error the same way unknown tags do.
            CacheProviderKind::Redis | CacheProviderKind::Elasticsearch => {
                Err(Error::UnsupportedProvider(kind.tag().to_string()))
            }
        }
    }
}
