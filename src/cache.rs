//! Result caches for the detection and assignment pipeline.
//!
//! Each concern gets its own LRU partition inside a [`CacheRegistry`], so
//! clearing word detection never drops assignment results and vice versa.
//! The registry is an ordinary value owned by the engine; a host that shares
//! one across threads must put it behind a lock.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use rustc_hash::FxHasher;

use crate::config::CacheConfig;
use crate::types::{HintKey, HintMapping, Target};

/// Content and configuration hash used as a cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint(pub u64);

impl Fingerprint {
    pub fn of<T: Hash + ?Sized>(value: &T) -> Self {
        let mut hasher = FxHasher::default();
        value.hash(&mut hasher);
        Self(hasher.finish())
    }
}

/// Hit and miss counters of one cache partition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub inserts: u64,
    pub evictions: u64,
    pub len: usize,
    pub capacity: usize,
}

impl CacheStats {
    /// Fraction of lookups served from the cache, zero before the first lookup.
    pub fn hit_rate(&self) -> f64 {
        let lookups = self.hits + self.misses;
        if lookups == 0 {
            0.0
        } else {
            self.hits as f64 / lookups as f64
        }
    }
}

/// A bounded least-recently-used map with statistics.
///
/// `get` refreshes an entry's recency, `has` does not.
pub struct ResultCache<K: Hash + Eq, V> {
    entries: LruCache<K, V>,
    hits: u64,
    misses: u64,
    inserts: u64,
    evictions: u64,
}

impl<K: Hash + Eq, V> ResultCache<K, V> {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: LruCache::new(capacity),
            hits: 0,
            misses: 0,
            inserts: 0,
            evictions: 0,
        }
    }

    /// Builds a cache holding at least one entry.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::new(NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN))
    }

    pub fn get(&mut self, key: &K) -> Option<&V> {
        match self.entries.get(key) {
            Some(value) => {
                self.hits += 1;
                Some(value)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Inserts `value`, evicting the least recently used entry when full.
    pub fn set(&mut self, key: K, value: V) {
        self.inserts += 1;
        let replacing = self.entries.contains(&key);
        if self.entries.push(key, value).is_some() && !replacing {
            self.evictions += 1;
        }
    }

    pub fn has(&self, key: &K) -> bool {
        self.entries.contains(key)
    }

    pub fn delete(&mut self, key: &K) -> Option<V> {
        self.entries.pop(key)
    }

    /// Drops every entry. Statistics are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn reset_stats(&mut self) {
        self.hits = 0;
        self.misses = 0;
        self.inserts = 0;
        self.evictions = 0;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            inserts: self.inserts,
            evictions: self.evictions,
            len: self.entries.len(),
            capacity: self.capacity(),
        }
    }
}

impl<K: Hash + Eq, V: Clone> ResultCache<K, V> {
    /// Returns the cached value or computes, stores and returns it.
    pub fn get_or_insert_with(&mut self, key: K, compute: impl FnOnce() -> V) -> V {
        if let Some(value) = self.get(&key) {
            return value.clone();
        }
        let value = compute();
        self.set(key, value.clone());
        value
    }
}

impl<K: Hash + Eq, V> fmt::Debug for ResultCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultCache")
            .field("stats", &self.stats())
            .finish()
    }
}

/// Names of the registry partitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKind {
    WordDetection,
    HintKeys,
    HintAssignment,
}

impl CacheKind {
    pub const ALL: [CacheKind; 3] = [
        CacheKind::WordDetection,
        CacheKind::HintKeys,
        CacheKind::HintAssignment,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CacheKind::WordDetection => "word_detection",
            CacheKind::HintKeys => "hint_keys",
            CacheKind::HintAssignment => "hint_assignment",
        }
    }
}

/// The engine's cache partitions, each with its own capacity and statistics.
///
/// Assignment entries are keyed by a fingerprint that includes the anchor
/// policy, so every hint mode keeps its own results.
#[derive(Debug)]
pub struct CacheRegistry {
    pub words: ResultCache<Fingerprint, Arc<[Target]>>,
    pub hint_keys: ResultCache<Fingerprint, Arc<[HintKey]>>,
    pub assignments: ResultCache<Fingerprint, Arc<[HintMapping]>>,
}

impl CacheRegistry {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            words: ResultCache::with_capacity(config.word_detection),
            hint_keys: ResultCache::with_capacity(config.hint_keys),
            assignments: ResultCache::with_capacity(config.hint_assignment),
        }
    }

    pub fn stats(&self, kind: CacheKind) -> CacheStats {
        match kind {
            CacheKind::WordDetection => self.words.stats(),
            CacheKind::HintKeys => self.hint_keys.stats(),
            CacheKind::HintAssignment => self.assignments.stats(),
        }
    }

    pub fn all_stats(&self) -> [(CacheKind, CacheStats); 3] {
        CacheKind::ALL.map(|kind| (kind, self.stats(kind)))
    }

    pub fn clear(&mut self, kind: CacheKind) {
        log::debug!("clearing {} cache", kind.name());
        match kind {
            CacheKind::WordDetection => self.words.clear(),
            CacheKind::HintKeys => self.hint_keys.clear(),
            CacheKind::HintAssignment => self.assignments.clear(),
        }
    }

    pub fn clear_all(&mut self) {
        for kind in CacheKind::ALL {
            self.clear(kind);
        }
    }
}

impl Default for CacheRegistry {
    fn default() -> Self {
        Self::new(&CacheConfig::default())
    }
}
