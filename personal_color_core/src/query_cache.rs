//! Conversion caching for repeated matcher queries
//!
//! The UI tends to re-query the same skin sample or swatch several times
//! while a user flips between result tabs. This LRU keeps the Lab value of
//! recently seen sRGB inputs so repeated queries skip the conversion
//! pipeline. Conversion is deterministic, so a hit is always identical to a
//! fresh computation.

use lru::LruCache;
use std::num::NonZeroUsize;

use crate::color::{Lab, Rgb};

/// Default number of cached conversions.
pub const DEFAULT_CACHE_CAPACITY: usize = 128;

/// LRU cache of sRGB → Lab conversions
pub struct QueryCache {
    cache: LruCache<Rgb, Lab>,
    hits: u64,
    misses: u64,
}

impl QueryCache {
    /// Create a new cache holding at most `capacity` conversions.
    ///
    /// A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: LruCache::new(capacity),
            hits: 0,
            misses: 0,
        }
    }

    /// Get a cached Lab value or compute it
    ///
    /// # Arguments
    ///
    /// * `query` - sRGB input
    /// * `compute` - Conversion to run on a cache miss
    pub fn get_or_compute<F>(&mut self, query: Rgb, compute: F) -> Lab
    where
        F: FnOnce(Rgb) -> Lab,
    {
        if let Some(cached) = self.cache.get(&query) {
            self.hits += 1;
            return *cached;
        }

        self.misses += 1;
        let lab = compute(query);
        self.cache.put(query, lab);
        lab
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    /// Returns value in [0.0, 1.0] representing hit/(hit+miss)
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Clear the cache and reset statistics
    pub fn clear(&mut self) {
        self.cache.clear();
        self.hits = 0;
        self.misses = 0;
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.cache.cap().get()
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}
