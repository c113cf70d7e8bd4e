//! Generic expiring cache.
//!
//! A single key -> {value, expiry} abstraction reused by every caching call
//! site, parameterized by TTL. Interior mutability lets shared references
//! cache without threading `&mut` through async call chains.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

/// Key-value cache whose entries expire after a fixed TTL.
pub struct ExpiringCache<K, V> {
    ttl: Duration,
    entries: Mutex<HashMap<K, CacheEntry<V>>>,
}

impl<K: Eq + Hash, V: Clone> ExpiringCache<K, V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the cached value if present and not expired.
    ///
    /// Expired entries are dropped on access.
    pub fn get(&self, key: &K) -> Option<V> {
        let mut entries = self.entries.lock();
        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Inserts a value, replacing any previous entry for the key.
    pub fn insert(&self, key: K, value: V) {
        let entry = CacheEntry {
            value,
            expires_at: Instant::now() + self.ttl,
        };
        self.entries.lock().insert(key, entry);
    }

    /// Drops all expired entries.
    pub fn purge_expired(&self) {
        let now = Instant::now();
        self.entries.lock().retain(|_, entry| entry.expires_at > now);
    }

    /// Number of entries, including any not yet purged.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_returns_inserted_value() {
        let cache = ExpiringCache::new(Duration::from_secs(60));
        cache.insert("ottawa", 21.5);
        assert_eq!(cache.get(&"ottawa"), Some(21.5));
    }

    #[test]
    fn test_zero_ttl_expires_immediately() {
        let cache = ExpiringCache::new(Duration::ZERO);
        cache.insert("ottawa", 21.5);
        assert_eq!(cache.get(&"ottawa"), None);
        // The expired entry was dropped on access.
        assert!(cache.is_empty());
    }

    #[test]
    fn test_insert_replaces_existing() {
        let cache = ExpiringCache::new(Duration::from_secs(60));
        cache.insert("ottawa", 1.0);
        cache.insert("ottawa", 2.0);
        assert_eq!(cache.get(&"ottawa"), Some(2.0));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_purge_expired() {
        let cache = ExpiringCache::new(Duration::ZERO);
        cache.insert("a", 1);
        cache.insert("b", 2);
        cache.purge_expired();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_clear() {
        let cache = ExpiringCache::new(Duration::from_secs(60));
        cache.insert("a", 1);
        cache.clear();
        assert!(cache.is_empty());
    }
}
