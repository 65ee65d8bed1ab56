//! In-process render response cache
//!
//! Bounded LRU keyed by the canonical cache key (storage path plus sorted
//! modifier tokens), with a per-entry TTL. A hit returns the finished
//! response bytes without touching storage or the transform pipeline.

use bytes::Bytes;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

#[derive(Clone)]
pub struct CachedResponse {
    pub bytes: Bytes,
    pub mime_type: String,
    stored_at: Instant,
}

pub struct RenderCache {
    entries: Mutex<LruCache<String, CachedResponse>>,
    ttl: Duration,
}

impl RenderCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            ttl,
        }
    }

    /// Fetch a live entry. Expired entries are evicted on access.
    pub fn get(&self, key: &str) -> Option<CachedResponse> {
        let mut entries = self.entries.lock().unwrap();
        if let Some(entry) = entries.get(key) {
            if entry.stored_at.elapsed() <= self.ttl {
                return Some(entry.clone());
            }
        } else {
            return None;
        }
        entries.pop(key);
        None
    }

    pub fn put(&self, key: String, bytes: Bytes, mime_type: String) {
        let entry = CachedResponse {
            bytes,
            mime_type,
            stored_at: Instant::now(),
        };
        self.entries.lock().unwrap().put(key, entry);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_returns_stored_bytes() {
        let cache = RenderCache::new(4, Duration::from_secs(60));
        cache.put(
            "a.png!size:10x10".into(),
            Bytes::from_static(b"abc"),
            "image/png".into(),
        );

        let hit = cache.get("a.png!size:10x10").unwrap();
        assert_eq!(hit.bytes.as_ref(), b"abc");
        assert_eq!(hit.mime_type, "image/png");
        assert!(cache.get("other").is_none());
    }

    #[test]
    fn test_expired_entry_is_evicted() {
        let cache = RenderCache::new(4, Duration::from_millis(0));
        cache.put("k".into(), Bytes::from_static(b"x"), "image/png".into());
        std::thread::sleep(Duration::from_millis(5));

        assert!(cache.get("k").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_capacity_evicts_least_recently_used() {
        let cache = RenderCache::new(2, Duration::from_secs(60));
        cache.put("a".into(), Bytes::from_static(b"1"), "image/png".into());
        cache.put("b".into(), Bytes::from_static(b"2"), "image/png".into());
        cache.get("a");
        cache.put("c".into(), Bytes::from_static(b"3"), "image/png".into());

        assert!(cache.get("a").is_some());
        assert!(cache.get("b").is_none());
        assert!(cache.get("c").is_some());
    }

    #[test]
    fn test_zero_capacity_clamped_to_one() {
        let cache = RenderCache::new(0, Duration::from_secs(60));
        cache.put("a".into(), Bytes::from_static(b"1"), "image/png".into());
        assert!(cache.get("a").is_some());
    }
}
