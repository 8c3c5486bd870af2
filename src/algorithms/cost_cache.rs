//! Memoized edge costs over unordered vertex pairs
//!
//! Kernighan-Lin recomputes every D-value after each pick, so the same pair
//! cost is requested many times per round. The cache stores one entry per
//! unordered pair and assumes the cost function is symmetric.

use std::collections::HashMap;
use std::hash::Hash;

/// Memoizing cost table keyed by an unordered pair
#[derive(Debug, Clone)]
pub struct CostCache<K> {
    costs: HashMap<(K, K), f64>,
    hits: u64,
    misses: u64,
}

impl<K> CostCache<K>
where
    K: Copy + Ord + Hash,
{
    pub fn new() -> Self {
        Self {
            costs: HashMap::new(),
            hits: 0,
            misses: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            costs: HashMap::with_capacity(capacity),
            hits: 0,
            misses: 0,
        }
    }

    fn key(a: K, b: K) -> (K, K) {
        if a <= b {
            (a, b)
        } else {
            (b, a)
        }
    }

    /// Cached cost of `{a, b}`, computing it with `compute` on first lookup
    pub fn get_or_insert_with<F>(&mut self, a: K, b: K, compute: F) -> f64
    where
        F: FnOnce() -> f64,
    {
        let key = Self::key(a, b);
        if let Some(&cost) = self.costs.get(&key) {
            self.hits += 1;
            return cost;
        }
        self.misses += 1;
        let cost = compute();
        self.costs.insert(key, cost);
        cost
    }

    pub fn len(&self) -> usize {
        self.costs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }

    /// Statistics for benchmarking
    pub fn stats(&self) -> CostCacheStats {
        let lookups = self.hits + self.misses;
        CostCacheStats {
            entries: self.costs.len(),
            hits: self.hits,
            misses: self.misses,
            hit_ratio: if lookups > 0 {
                self.hits as f64 / lookups as f64
            } else {
                0.0
            },
        }
    }
}

impl<K> Default for CostCache<K>
where
    K: Copy + Ord + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub struct CostCacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub hit_ratio: f64,
}
