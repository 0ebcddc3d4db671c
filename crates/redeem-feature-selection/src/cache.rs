//! Bounded memoization for subset scores.
//!
//! `LruCache` is a small least-recently-used map keyed on ordered keys.
//! `ScoreCache` wraps a [`Scorer`] with one so that repeated queries on the
//! same subset within a selection run do not call the scorer again.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::feature_set::FeatureSet;
use crate::scorer::Scorer;

#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    last_used: u64,
}

/// Least-recently-used map with a fixed capacity.
///
/// Every `get` or `insert` marks the key as most recently used. Inserting a
/// new key into a full cache evicts the least recently used entry. A cache
/// with capacity 0 stores nothing.
#[derive(Debug, Clone)]
pub struct LruCache<K: Ord + Clone, V> {
    capacity: usize,
    entries: BTreeMap<K, Entry<V>>,
    recency: BTreeMap<u64, K>,
    tick: u64,
}

impl<K: Ord + Clone, V> LruCache<K, V> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            entries: BTreeMap::new(),
            recency: BTreeMap::new(),
            tick: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Look up `key` and mark it as most recently used.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let tick = self.next_tick();
        let entry = self.entries.get_mut(key)?;
        self.recency.remove(&entry.last_used);
        entry.last_used = tick;
        self.recency.insert(tick, key.clone());
        Some(&entry.value)
    }

    /// Look up `key` without touching its recency.
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.entries.get(key).map(|entry| &entry.value)
    }

    /// Insert or overwrite `key`. Returns the entry evicted to make room, if
    /// any.
    pub fn insert(&mut self, key: K, value: V) -> Option<(K, V)> {
        if self.capacity == 0 {
            return None;
        }

        let tick = self.next_tick();
        if let Some(entry) = self.entries.get_mut(&key) {
            self.recency.remove(&entry.last_used);
            entry.value = value;
            entry.last_used = tick;
            self.recency.insert(tick, key);
            return None;
        }

        let evicted = if self.entries.len() >= self.capacity {
            self.evict_least_recent()
        } else {
            None
        };

        self.recency.insert(tick, key.clone());
        self.entries.insert(
            key,
            Entry {
                value,
                last_used: tick,
            },
        );
        evicted
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.recency.clear();
    }

    fn evict_least_recent(&mut self) -> Option<(K, V)> {
        let (_, key) = self.recency.pop_first()?;
        let entry = self.entries.remove(&key)?;
        Some((key, entry.value))
    }

    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }
}

/// Hit/miss counters for a [`ScoreCache`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub hits: usize,
    /// Number of scorer invocations.
    pub misses: usize,
    pub evictions: usize,
}

impl CacheStats {
    pub fn lookups(&self) -> usize {
        self.hits + self.misses
    }

    /// Fraction of lookups served from the cache, 0 when nothing was looked up.
    pub fn hit_rate(&self) -> f64 {
        match self.lookups() {
            0 => 0.0,
            n => self.hits as f64 / n as f64,
        }
    }
}

/// Memoizing wrapper around a scorer.
///
/// Scorer failures are returned unchanged and never cached.
pub struct ScoreCache<'s, T: Ord + Clone, S: Scorer<T> + ?Sized> {
    scorer: &'s S,
    cache: LruCache<FeatureSet<T>, f64>,
    stats: CacheStats,
}

impl<'s, T: Ord + Clone, S: Scorer<T> + ?Sized> ScoreCache<'s, T, S> {
    pub fn new(capacity: usize, scorer: &'s S) -> Self {
        Self {
            scorer,
            cache: LruCache::with_capacity(capacity),
            stats: CacheStats::default(),
        }
    }

    /// Return the score of `features`, calling the scorer only on a miss.
    ///
    /// # Parameters
    ///
    /// * `features` - The subset to score, used as the cache key.
    ///
    /// # Returns
    ///
    /// The cached or freshly computed score. A scorer error is returned as is
    /// and leaves the cache untouched, so the next lookup retries.
    pub fn get_or_compute(&mut self, features: &FeatureSet<T>) -> anyhow::Result<f64> {
        if let Some(&score) = self.cache.get(features) {
            self.stats.hits += 1;
            return Ok(score);
        }

        self.stats.misses += 1;
        let score = self.scorer.score(features)?;
        if self.cache.insert(features.clone(), score).is_some() {
            self.stats.evictions += 1;
        }
        Ok(score)
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn capacity(&self) -> usize {
        self.cache.capacity()
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}
