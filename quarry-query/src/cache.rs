//! Caching compiled filters by source-expression identity.
//!
//! Repeated compilation of the same predicate is wasted but harmless
//! work; [`FilterCache`] front-ends [`compile`] with a concurrent map
//! keyed on the structural identity of the source [`Expr`]. Captured
//! instances and value functions key by pointer, so two predicates
//! around the same closed-over state share an entry while look-alike
//! predicates over different captures do not.
//!
//! ```rust
//! use quarry_query::cache::FilterCache;
//! use quarry_query::expr::Expr;
//!
//! let cache = FilterCache::new(256);
//! let filter = cache.get_or_compile(&Expr::field("age").gt(21)).unwrap();
//! assert_eq!(filter.predicate_count(), 1);
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::compiler::compile;
use crate::error::QueryResult;
use crate::expr::Expr;
use crate::filter::QueryFilter;

/// A thread-safe cache of compiled filters.
///
/// Population is idempotent: racing callers may both compile, the
/// first insert wins, and both results are structurally identical.
#[derive(Debug)]
pub struct FilterCache {
    /// Maximum number of entries before eviction kicks in.
    max_size: usize,
    /// The cached filters.
    entries: RwLock<HashMap<Expr, CachedFilter>>,
    /// Statistics about cache usage.
    stats: RwLock<CacheStats>,
}

#[derive(Debug, Clone)]
struct CachedFilter {
    filter: Arc<QueryFilter>,
    access_count: u64,
}

/// Statistics about cache usage.
#[derive(Debug, Default, Clone)]
pub struct CacheStats {
    /// Number of cache hits.
    pub hits: u64,
    /// Number of cache misses.
    pub misses: u64,
    /// Number of evictions.
    pub evictions: u64,
    /// Number of insertions.
    pub insertions: u64,
}

impl CacheStats {
    /// Calculate the hit rate.
    #[inline]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

impl FilterCache {
    /// Create a cache holding at most `max_size` compiled filters.
    pub fn new(max_size: usize) -> Self {
        Self {
            max_size,
            entries: RwLock::new(HashMap::with_capacity(max_size)),
            stats: RwLock::new(CacheStats::default()),
        }
    }

    /// Fetch the compiled form of `expr`, compiling on first sight.
    ///
    /// Compilation happens outside the write lock; a racing insert of
    /// the same key keeps the first stored value.
    pub fn get_or_compile(&self, expr: &Expr) -> QueryResult<Arc<QueryFilter>> {
        if let Some(filter) = self.get(expr) {
            return Ok(filter);
        }

        let compiled = Arc::new(compile(expr)?);
        let mut entries = self.entries.write();
        let mut stats = self.stats.write();

        if entries.len() >= self.max_size && !entries.contains_key(expr) {
            let evicted = evict_cold(&mut entries);
            stats.evictions += evicted as u64;
            debug!(evicted, "filter cache evicted entries");
        }

        let entry = entries.entry(expr.clone()).or_insert_with(|| CachedFilter {
            filter: Arc::clone(&compiled),
            access_count: 0,
        });
        stats.insertions += 1;
        Ok(Arc::clone(&entry.filter))
    }

    /// Fetch a cached filter without compiling.
    pub fn get(&self, expr: &Expr) -> Option<Arc<QueryFilter>> {
        let mut entries = self.entries.write();
        if let Some(entry) = entries.get_mut(expr) {
            entry.access_count += 1;
            let filter = Arc::clone(&entry.filter);
            drop(entries);
            self.stats.write().hits += 1;
            debug!("filter cache hit");
            return Some(filter);
        }
        drop(entries);
        self.stats.write().misses += 1;
        debug!("filter cache miss");
        None
    }

    /// Whether `expr` has a cached compilation.
    pub fn contains(&self, expr: &Expr) -> bool {
        self.entries.read().contains_key(expr)
    }

    /// Drop every cached filter.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Current number of cached filters.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum cache size.
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Snapshot of the usage statistics.
    pub fn stats(&self) -> CacheStats {
        self.stats.read().clone()
    }

    /// Reset the usage statistics.
    pub fn reset_stats(&self) {
        *self.stats.write() = CacheStats::default();
    }
}

impl Default for FilterCache {
    fn default() -> Self {
        Self::new(1000)
    }
}

/// Evict the quarter of entries with the lowest access counts.
/// Returns how many were removed.
fn evict_cold(entries: &mut HashMap<Expr, CachedFilter>) -> usize {
    let to_evict = (entries.len() / 4).max(1);

    let mut ranked: Vec<_> = entries
        .iter()
        .map(|(k, v)| (k.clone(), v.access_count))
        .collect();
    ranked.sort_by_key(|(_, count)| *count);

    let mut removed = 0;
    for (key, _) in ranked.into_iter().take(to_evict) {
        if entries.remove(&key).is_some() {
            removed += 1;
        }
    }
    removed
}
