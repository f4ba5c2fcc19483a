use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Typeahead result cache keyed by the raw query text
pub struct CompletionCache {
    pub cache: Mutex<LruCache<String, Vec<Vec<String>>>>,
    pub size_limit: usize,
    pub hit_count: AtomicUsize,
    pub miss_count: AtomicUsize,
}

impl CompletionCache {
    pub fn new(size_limit: usize) -> Self {
        let cap = NonZeroUsize::new(size_limit).unwrap_or(NonZeroUsize::MIN);
        CompletionCache {
            cache: Mutex::new(LruCache::new(cap)),
            size_limit,
            hit_count: AtomicUsize::new(0),
            miss_count: AtomicUsize::new(0),
        }
    }

    pub fn get(&self, query: &str) -> Option<Vec<Vec<String>>> {
        let mut cache = self.cache.lock();
        if let Some(items) = cache.get(query) {
            self.hit_count.fetch_add(1, Ordering::Relaxed);
            Some(items.clone())
        } else {
            self.miss_count.fetch_add(1, Ordering::Relaxed);
            None
        }
    }

    pub fn put(&self, query: String, items: Vec<Vec<String>>) {
        self.cache.lock().put(query, items);
    }

    pub fn clear(&self) {
        self.cache.lock().clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hit_count: self.hit_count.load(Ordering::Relaxed),
            miss_count: self.miss_count.load(Ordering::Relaxed),
            size: self.cache.lock().len(),
            capacity: self.size_limit,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CacheStats {
    pub hit_count: usize,
    pub miss_count: usize,
    pub size: usize,
    pub capacity: usize,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hit_count + self.miss_count;
        if total == 0 {
            0.0
        } else {
            self.hit_count as f64 / total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_and_miss_accounting() {
        let cache = CompletionCache::new(2);
        assert!(cache.get("wo").is_none());

        cache.put("wo".to_string(), vec![vec!["woman".to_string()]]);
        assert_eq!(cache.get("wo").unwrap(), vec![vec!["woman".to_string()]]);

        let stats = cache.stats();
        assert_eq!(stats.hit_count, 1);
        assert_eq!(stats.miss_count, 1);
        assert_eq!(stats.hit_rate(), 0.5);
    }

    #[test]
    fn test_evicts_least_recent() {
        let cache = CompletionCache::new(1);
        cache.put("a".to_string(), vec![]);
        cache.put("b".to_string(), vec![]);
        assert!(cache.get("a").is_none());
        assert!(cache.get("b").is_some());

        cache.clear();
        assert_eq!(cache.stats().size, 0);
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let cache = CompletionCache::new(0);
        cache.put("a".to_string(), vec![]);
        assert_eq!(cache.stats().size, 1);
    }
}
