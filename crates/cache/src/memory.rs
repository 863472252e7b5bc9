//! In-process cache backend

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use vox_core::{CacheEntry, CacheStats, CacheStore, Result};

struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Instant::now() >= at)
    }
}

/// DashMap-backed cache with per-entry TTL and capacity eviction
pub struct MemoryCache {
    entries: DashMap<String, Entry>,
    default_ttl: Option<Duration>,
    max_entries: usize,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl MemoryCache {
    /// `ttl_secs` of zero disables expiry.
    pub fn new(ttl_secs: u64, max_entries: usize) -> Self {
        Self {
            entries: DashMap::new(),
            default_ttl: (ttl_secs > 0).then(|| Duration::from_secs(ttl_secs)),
            max_entries,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    /// Drop expired entries, then arbitrary ones until under capacity.
    fn evict_if_full(&self) {
        if self.entries.len() < self.max_entries {
            return;
        }

        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|e| e.value().is_expired())
            .map(|e| e.key().clone())
            .collect();
        for key in expired {
            if self.entries.remove(&key).is_some() {
                self.evictions.fetch_add(1, Ordering::Relaxed);
            }
        }

        while self.entries.len() >= self.max_entries {
            let victim = match self.entries.iter().next() {
                Some(e) => e.key().clone(),
                None => break,
            };
            if self.entries.remove(&victim).is_some() {
                self.evictions.fetch_add(1, Ordering::Relaxed);
            }
        }
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        if let Some(entry) = self.entries.get(key) {
            if !entry.is_expired() {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Ok(Some(entry.value.clone()));
            }
        }
        // Expired entries are removed on the read path.
        if self
            .entries
            .remove_if(key, |_, entry| entry.is_expired())
            .is_some()
        {
            self.evictions.fetch_add(1, Ordering::Relaxed);
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        Ok(None)
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<()> {
        self.evict_if_full();
        let expires_at = ttl.or(self.default_ttl).map(|d| Instant::now() + d);
        self.entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at,
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.entries.clear();
        Ok(())
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<CacheEntry>> {
        // Exact-key store: substring scan, no ranking.
        let needle = query.to_lowercase();
        let mut out = Vec::new();
        for entry in self.entries.iter() {
            if out.len() >= limit {
                break;
            }
            if entry.value().is_expired() {
                continue;
            }
            if entry.key().to_lowercase().contains(&needle)
                || entry.value().value.to_lowercase().contains(&needle)
            {
                out.push(CacheEntry {
                    key: entry.key().clone(),
                    value: entry.value().value.clone(),
                });
            }
        }
        Ok(out)
    }

    async fn stats(&self) -> Result<CacheStats> {
        Ok(CacheStats {
            entries: self.entries.len() as u64,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        })
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_delete() {
        let cache = MemoryCache::new(0, 100);
        cache.set("k", "v", None).await.unwrap();
        assert_eq!(cache.get("k").await.unwrap().as_deref(), Some("v"));
        cache.delete("k").await.unwrap();
        assert_eq!(cache.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_ttl_expiry() {
        let cache = MemoryCache::new(0, 100);
        cache
            .set("k", "v", Some(Duration::from_millis(10)))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(cache.get("k").await.unwrap(), None);

        let stats = cache.stats().await.unwrap();
        assert_eq!(stats.entries, 0);
        assert!(stats.evictions >= 1);
    }

    #[tokio::test]
    async fn test_capacity_eviction() {
        let cache = MemoryCache::new(0, 3);
        for i in 0..5 {
            cache
                .set(&format!("k{i}"), "v", None)
                .await
                .unwrap();
        }
        let stats = cache.stats().await.unwrap();
        assert!(stats.entries <= 3);
        assert!(stats.evictions >= 2);
    }

    #[tokio::test]
    async fn test_substring_search() {
        let cache = MemoryCache::new(0, 100);
        cache.set("greeting", "hello there", None).await.unwrap();
        cache.set("farewell", "goodbye", None).await.unwrap();

        let hits = cache.search("hello", 10).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].key, "greeting");
    }

    #[tokio::test]
    async fn test_hit_miss_counters() {
        let cache = MemoryCache::new(0, 100);
        cache.set("k", "v", None).await.unwrap();
        let _ = cache.get("k").await.unwrap();
        let _ = cache.get("absent").await.unwrap();

        let stats = cache.stats().await.unwrap();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }
}
