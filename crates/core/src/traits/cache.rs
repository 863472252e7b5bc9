//! Cache/search provider contract
//!
//! One surface over an in-memory map, a full-text index, or a hosted
//! engine. `search` is best-effort: exact-key stores return at most the
//! exact match, indexed stores return ranked hits.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::Result;

/// A cached entry returned from lookup or search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub key: String,
    pub value: String,
}

/// Aggregate counters for observability
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CacheStats {
    pub entries: u64,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Pluggable cache/search backend
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Exact-key lookup
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Insert or replace, with optional time-to-live
    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<()>;

    /// Remove one entry; Ok even if absent
    async fn delete(&self, key: &str) -> Result<()>;

    /// Drop every entry
    async fn clear(&self) -> Result<()>;

    /// Ranked text search over stored entries (exact-key stores may only
    /// return the exact match)
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<CacheEntry>>;

    /// Counter snapshot
    async fn stats(&self) -> Result<CacheStats>;

    /// Backend tag for logs and capability output
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_rate() {
        let stats = CacheStats {
            entries: 2,
            hits: 3,
            misses: 1,
            evictions: 0,
        };
        assert!((stats.hit_rate() - 0.75).abs() < f64::EPSILON);
        assert_eq!(CacheStats::default().hit_rate(), 0.0);
    }
}
