//! In-memory TTL caching for upstream responses.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct CacheEntry<T> {
    value: T,
    created_at: Instant,
}

#[derive(Debug)]
struct CacheInner<T> {
    map: HashMap<String, CacheEntry<T>>,
    ttl: Duration,
}

impl<T: Clone> CacheInner<T> {
    fn new(ttl: Duration) -> Self {
        Self {
            map: HashMap::new(),
            ttl,
        }
    }

    fn get(&self, key: &str) -> Option<T> {
        self.map.get(key).and_then(|entry| {
            if entry.created_at.elapsed() < self.ttl {
                Some(entry.value.clone())
            } else {
                None
            }
        })
    }

    fn put(&mut self, key: String, value: T) {
        self.map.insert(
            key,
            CacheEntry {
                value,
                created_at: Instant::now(),
            },
        );
    }
}

/// Thread-safe keyed cache with a fixed time-to-live.
///
/// Expiry is lazy: stale entries are simply ignored by `get` and replaced
/// wholesale by the next `put`. Racing puts for the same key are
/// last-write-wins; entries are idempotent snapshots of upstream state, so
/// losing a race never loses information that matters.
#[derive(Debug, Clone)]
pub struct TtlCache<T> {
    inner: Arc<tokio::sync::RwLock<CacheInner<T>>>,
}

impl<T: Clone> TtlCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(tokio::sync::RwLock::new(CacheInner::new(ttl))),
        }
    }

    /// Get a cached value for the given key if it exists and hasn't expired.
    pub async fn get(&self, key: &str) -> Option<T> {
        let store = self.inner.read().await;
        store.get(key)
    }

    /// Put a value into the cache, unconditionally replacing any previous
    /// entry and restarting its TTL window.
    pub async fn put(&self, key: impl Into<String>, value: T) {
        let mut store = self.inner.write().await;
        store.put(key.into(), value);
    }

    /// Remove expired entries.
    pub async fn clear_expired(&self) {
        let mut store = self.inner.write().await;
        let ttl = store.ttl;
        store.map.retain(|_, entry| entry.created_at.elapsed() < ttl);
    }

    /// Number of entries, including expired ones not yet cleared.
    pub async fn len(&self) -> usize {
        let store = self.inner.read().await;
        store.map.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn get_misses_then_hits_after_put() {
        let cache = TtlCache::new(Duration::from_secs(1));

        assert!(cache.get("rice_delhi_azadpur").await.is_none());

        cache.put("rice_delhi_azadpur", 3150.0).await;
        assert_eq!(cache.get("rice_delhi_azadpur").await, Some(3150.0));
    }

    #[tokio::test]
    async fn put_overwrites_and_restarts_ttl() {
        let cache = TtlCache::new(Duration::from_secs(60));

        cache.put("key", 1).await;
        cache.put("key", 2).await;
        assert_eq!(cache.get("key").await, Some(2));
    }

    #[tokio::test]
    async fn entries_expire_lazily() {
        let cache = TtlCache::new(Duration::from_millis(50));

        cache.put("key", String::from("value")).await;
        assert!(cache.get("key").await.is_some());

        tokio::time::sleep(Duration::from_millis(80)).await;
        assert!(cache.get("key").await.is_none());
        // Stale entry still occupies a slot until cleared or replaced.
        assert_eq!(cache.len().await, 1);

        cache.clear_expired().await;
        assert!(cache.is_empty().await);
    }
}
