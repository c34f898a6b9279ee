//! Bounded in-process cache with per-entry expiry.

use std::hash::Hash;
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

use lru::LruCache;

struct CacheEntry<V> {
    expires_at: Instant,
    value: V,
}

/// LRU map whose entries also expire `ttl` after their last write or touch.
///
/// Expired entries are dropped when read; once `capacity` is reached the
/// least recently used entry makes room for a new one.
pub struct TtlCache<K: Hash + Eq, V> {
    ttl: Duration,
    inner: LruCache<K, CacheEntry<V>>,
}

impl<K: Hash + Eq, V> TtlCache<K, V> {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            ttl,
            inner: LruCache::new(capacity),
        }
    }

    /// Mutable access to a live entry; does not extend its lifetime.
    pub fn get_mut_at(&mut self, key: &K, now: Instant) -> Option<&mut V> {
        let expired = self.inner.peek(key)?.expires_at <= now;
        if expired {
            self.inner.pop(key);
            return None;
        }
        self.inner.get_mut(key).map(|entry| &mut entry.value)
    }

    pub fn insert(&mut self, key: K, value: V) {
        self.insert_at(key, value, Instant::now());
    }

    pub fn insert_at(&mut self, key: K, value: V, now: Instant) {
        self.inner.put(
            key,
            CacheEntry {
                expires_at: now + self.ttl,
                value,
            },
        );
    }

    /// Push an entry's expiry out to `now + ttl`.
    pub fn touch_at(&mut self, key: &K, now: Instant) {
        let ttl = self.ttl;
        if let Some(entry) = self.inner.get_mut(key) {
            entry.expires_at = now + ttl;
        }
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.inner.pop(key).map(|entry| entry.value)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl<K: Hash + Eq, V: Clone> TtlCache<K, V> {
    pub fn get(&mut self, key: &K) -> Option<V> {
        self.get_at(key, Instant::now())
    }

    pub fn get_at(&mut self, key: &K, now: Instant) -> Option<V> {
        self.get_mut_at(key, now).map(|value| value.clone())
    }
}
