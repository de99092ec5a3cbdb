//! SharedCache: thread-safe handle around an LRU cache

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::config::CacheConfig;
use crate::error::Result;
use crate::lru::LruCache;
use crate::stats::CacheStats;

/// Clonable handle to one LRU cache shared between threads
///
/// A single mutex guards the whole cache, since `get` reorders entries and
/// is therefore a write.
pub struct SharedCache<K, V> {
    /// Cache entries
    cache: Arc<Mutex<LruCache<K, V>>>,

    /// Usage counters
    stats: Arc<CacheStats>,

    track_stats: bool,
}

impl<K, V> Clone for SharedCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
            stats: Arc::clone(&self.stats),
            track_stats: self.track_stats,
        }
    }
}

impl<K, V> SharedCache<K, V>
where
    K: Hash + Eq + Clone + fmt::Debug,
    V: Clone,
{
    /// Create a shared cache with the given capacity and statistics on
    pub fn new(capacity: usize) -> Result<Self> {
        Self::from_config(&CacheConfig::with_capacity(capacity))
    }

    /// Create a shared cache from a config
    ///
    /// # Errors
    /// * `Error::InvalidCapacity` - if the configured capacity is zero
    pub fn from_config(config: &CacheConfig) -> Result<Self> {
        let cache = LruCache::from_config(config)?;
        debug!(
            capacity = config.capacity,
            track_stats = config.track_stats,
            "shared cache created"
        );

        Ok(Self {
            cache: Arc::new(Mutex::new(cache)),
            stats: Arc::new(CacheStats::new()),
            track_stats: config.track_stats,
        })
    }

    /// Get a copy of a value and mark it as most recently used
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let value = self.cache.lock().get(key).cloned();
        if self.track_stats {
            match value {
                Some(_) => self.stats.record_hit(),
                None => self.stats.record_miss(),
            }
        }
        value
    }

    /// Insert or overwrite a value
    pub fn put(&self, key: K, value: V) {
        let mut cache = self.cache.lock();
        let existed = cache.contains(&key);
        let displaced = cache.push(key, value);
        drop(cache);

        if existed {
            if self.track_stats {
                self.stats.record_update();
            }
            return;
        }

        if self.track_stats {
            self.stats.record_insert();
        }
        if let Some((evicted, _)) = displaced {
            trace!(key = ?evicted, "evicted least recently used entry");
            if self.track_stats {
                self.stats.record_eviction();
            }
        }
    }

    /// Return the cached value for `key`, computing and storing it on a miss
    ///
    /// `init` runs without the lock held, so it may use this cache. Two
    /// threads missing on the same key may both run `init`; the later
    /// store wins.
    pub fn get_or_insert_with<F>(&self, key: K, init: F) -> V
    where
        F: FnOnce() -> V,
    {
        if let Some(value) = self.get(&key) {
            return value;
        }

        let value = init();
        self.put(key, value.clone());
        value
    }

    /// Remove a key
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.cache.lock().remove(key)
    }

    /// Check membership without touching recency
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.cache.lock().contains(key)
    }

    /// Keys from most to least recently used
    pub fn keys(&self) -> Vec<K> {
        self.cache.lock().iter().map(|(k, _)| k.clone()).collect()
    }

    /// Get current cache size
    pub fn len(&self) -> usize {
        self.cache.lock().len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.cache.lock().is_empty()
    }

    /// Get cache capacity
    pub fn capacity(&self) -> usize {
        self.cache.lock().capacity()
    }

    /// Drop every entry and reset statistics
    pub fn clear(&self) {
        let mut cache = self.cache.lock();
        let dropped = cache.len();
        cache.clear();
        self.stats.reset();
        debug!(dropped, "shared cache cleared");
    }

    /// Get cache statistics
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for SharedCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedCache")
            .field("cache", &*self.cache.lock())
            .field("stats", &self.stats)
            .finish()
    }
}
