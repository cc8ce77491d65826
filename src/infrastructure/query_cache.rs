//! Small in-process request cache with a fixed freshness window.
//!
//! Keys are composed from the query parameters of the read they guard, e.g.
//! `products:category=Kitchen`. Entries older than the TTL are dropped on the
//! next lookup and the caller refetches; errors are never cached.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

struct Entry<V> {
    stored_at: Instant,
    value: V,
}

pub struct QueryCache<V> {
    ttl: Duration,
    entries: Mutex<HashMap<String, Entry<V>>>,
}

impl<V: Clone> QueryCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Fresh value for `key`, if any. A stale entry is evicted and `None` is
    /// returned so the caller revalidates.
    pub fn get(&self, key: &str) -> Option<V> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        match entries.get(key) {
            Some(entry) if entry.stored_at.elapsed() < self.ttl => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn insert(&self, key: String, value: V) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(
            key,
            Entry {
                stored_at: Instant::now(),
                value,
            },
        );
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_entries_are_returned() {
        let cache = QueryCache::new(Duration::from_secs(60));
        cache.insert("products:id=1".to_string(), 42);

        assert_eq!(cache.get("products:id=1"), Some(42));
        assert_eq!(cache.get("products:id=2"), None);
    }

    #[test]
    fn stale_entries_are_evicted_on_lookup() {
        let cache = QueryCache::new(Duration::from_millis(10));
        cache.insert("products:id=1".to_string(), 42);

        std::thread::sleep(Duration::from_millis(20));

        assert_eq!(cache.get("products:id=1"), None);
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn insert_overwrites_the_previous_value() {
        let cache = QueryCache::new(Duration::from_secs(60));
        cache.insert("k".to_string(), 1);
        cache.insert("k".to_string(), 2);

        assert_eq!(cache.get("k"), Some(2));
    }
}
