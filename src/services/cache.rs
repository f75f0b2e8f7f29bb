use crate::core::route::RouteIndex;
use crate::models::{GeoPoint, RoutePath};
use lru::LruCache;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Size-bounded cache of built route indexes
///
/// Keyed by a hash of the route's coordinates. Least recently used routes
/// are evicted first; a capacity of 0 disables caching. The lock is never
/// held while an index is being built.
pub struct RouteCache {
    entries: Option<Mutex<LruCache<u64, Arc<RouteIndex>>>>,
    capacity: usize,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl RouteCache {
    /// Create a new route cache holding at most `capacity` routes
    pub fn new(capacity: usize) -> Self {
        let entries = NonZeroUsize::new(capacity).map(|cap| Mutex::new(LruCache::new(cap)));

        Self {
            entries,
            capacity,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// A cache that never stores anything
    pub fn disabled() -> Self {
        Self::new(0)
    }

    pub fn is_enabled(&self) -> bool {
        self.entries.is_some()
    }

    /// Return the index for `route`, building and storing it on a miss
    pub fn get_or_build(&self, route: &RoutePath) -> Arc<RouteIndex> {
        let Some(entries) = &self.entries else {
            return Arc::new(RouteIndex::build(route));
        };

        let key = CacheKey::route(route.points());

        if let Some(index) = lock(entries).get(&key) {
            // hash collisions fall through to a rebuild
            if index.points() == route.points() {
                self.hits.fetch_add(1, Ordering::Relaxed);
                tracing::trace!("Route cache hit: {:016x}", key);
                return Arc::clone(index);
            }
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        tracing::trace!("Route cache miss: {:016x}", key);

        let index = Arc::new(RouteIndex::build(route));
        lock(entries).put(key, Arc::clone(&index));
        index
    }

    /// Drop every cached route
    pub fn clear(&self) {
        if let Some(entries) = &self.entries {
            lock(entries).clear();
            tracing::debug!("Route cache cleared");
        }
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        let entries = self.entries.as_ref().map(|e| lock(e).len()).unwrap_or(0);
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let lookups = hits + misses;

        CacheStats {
            capacity: self.capacity,
            entries,
            hits,
            misses,
            hit_rate: if lookups > 0 { hits as f64 / lookups as f64 } else { 0.0 },
        }
    }
}

impl std::fmt::Debug for RouteCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteCache")
            .field("capacity", &self.capacity)
            .field("hits", &self.hits.load(Ordering::Relaxed))
            .field("misses", &self.misses.load(Ordering::Relaxed))
            .finish()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Cache statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheStats {
    pub capacity: usize,
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Hash the exact bit patterns of the route's coordinates
    pub fn route(points: &[GeoPoint]) -> u64 {
        let mut hasher = DefaultHasher::new();
        points.len().hash(&mut hasher);
        for p in points {
            p.latitude.to_bits().hash(&mut hasher);
            p.longitude.to_bits().hash(&mut hasher);
        }
        hasher.finish()
    }
}
