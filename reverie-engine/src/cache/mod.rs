//! Content-addressable caches
//!
//! [`TtlCache`] is the shared pattern: exact-key lookup, lazy TTL expiry on
//! access, and FIFO eviction by insertion order once a size cap is reached.
//! [`AnalysisCache`] and [`ScenarioCache`] wrap it with their own key
//! derivation and settings.
//!
//! FIFO order is kept in an explicit key queue next to the lookup table, so
//! eviction never depends on hash-map iteration order. Each queue slot carries
//! the insertion sequence number of the entry it was pushed for; slots whose
//! entry has since been overwritten, expired or evicted are stale and skipped.

mod analysis_cache;
mod scenario_cache;

pub use analysis_cache::{tokenize, AnalysisCache, SIMILARITY_CONTENT_LIMIT};
pub use scenario_cache::ScenarioCache;

use chrono::{DateTime, Duration, Utc};
use reverie_common::Clock;
use sha2::{Digest, Sha256};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tracing::debug;

/// Field separator used when hashing composite keys
pub(crate) const KEY_SEPARATOR: char = '\u{1f}';

/// Stored value plus insertion bookkeeping
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    pub value: V,
    pub inserted_at: DateTime<Utc>,
    sequence: u64,
}

/// Cache counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub similar_hits: u64,
    pub expirations: u64,
    pub evictions: u64,
}

/// Time-bounded cache with optional FIFO size cap
pub struct TtlCache<V> {
    entries: HashMap<String, CacheEntry<V>>,
    order: VecDeque<(String, u64)>,
    next_sequence: u64,
    ttl: Duration,
    max_entries: Option<usize>,
    clock: Arc<dyn Clock>,
    stats: CacheStats,
}

impl<V: Clone> TtlCache<V> {
    /// Create a cache; `max_entries = None` means bounded by TTL only
    pub fn new(ttl: Duration, max_entries: Option<usize>, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            next_sequence: 0,
            ttl,
            max_entries,
            clock,
            stats: CacheStats::default(),
        }
    }

    /// Exact lookup with lazy expiry
    ///
    /// An expired entry is removed and reported as a miss.
    pub fn get(&mut self, key: &str) -> Option<V> {
        let now = self.clock.now();
        let expired = match self.entries.get(key) {
            None => {
                self.stats.misses += 1;
                return None;
            }
            Some(entry) => self.is_expired(entry, now),
        };

        if expired {
            self.entries.remove(key);
            self.stats.expirations += 1;
            self.stats.misses += 1;
            debug!(key, "Cache entry expired");
            return None;
        }

        self.stats.hits += 1;
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    /// Insert or fully replace a value, stamping it with the current time
    ///
    /// When the key is new and the cache is at capacity, the earliest-inserted
    /// entry is evicted first. Overwriting counts as a fresh insertion.
    pub fn set(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();

        if !self.entries.contains_key(&key) {
            if let Some(max) = self.max_entries {
                while self.entries.len() >= max {
                    if !self.evict_oldest() {
                        break;
                    }
                }
            }
        }

        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.order.push_back((key.clone(), sequence));
        self.entries.insert(
            key,
            CacheEntry {
                value,
                inserted_at: self.clock.now(),
                sequence,
            },
        );
        self.compact_order();
    }

    /// Live (non-expired) entries in insertion order, without touching them
    pub fn iter_live(&self) -> impl Iterator<Item = (&str, &CacheEntry<V>)> + '_ {
        let now = self.clock.now();
        self.order.iter().filter_map(move |(key, sequence)| {
            self.entries
                .get(key)
                .filter(|entry| entry.sequence == *sequence && !self.is_expired(entry, now))
                .map(|entry| (key.as_str(), entry))
        })
    }

    /// Physically drop every expired entry; returns how many were removed
    pub fn purge_expired(&mut self) -> usize {
        let now = self.clock.now();
        let ttl = self.ttl;
        let before = self.entries.len();
        self.entries.retain(|_, entry| now - entry.inserted_at < ttl);
        let removed = before - self.entries.len();
        self.stats.expirations += removed as u64;
        self.compact_order();
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub(crate) fn record_similar_hit(&mut self) {
        self.stats.similar_hits += 1;
    }

    fn is_expired(&self, entry: &CacheEntry<V>, now: DateTime<Utc>) -> bool {
        now - entry.inserted_at >= self.ttl
    }

    /// Pop queue slots until a live one is found and evict its entry
    fn evict_oldest(&mut self) -> bool {
        while let Some((key, sequence)) = self.order.pop_front() {
            let is_current = self
                .entries
                .get(&key)
                .map_or(false, |entry| entry.sequence == sequence);
            if is_current {
                self.entries.remove(&key);
                self.stats.evictions += 1;
                debug!(key = %key, "Evicted oldest cache entry");
                return true;
            }
        }
        false
    }

    /// Drop stale queue slots once they outnumber live entries
    fn compact_order(&mut self) {
        if self.order.len() <= self.entries.len() * 2 + 16 {
            return;
        }
        let entries = &self.entries;
        self.order.retain(|(key, sequence)| {
            entries
                .get(key)
                .map_or(false, |entry| entry.sequence == *sequence)
        });
    }
}

/// Lowercase, trim and collapse whitespace runs
pub(crate) fn normalize_text(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// SHA-256 hex digest of the given fields joined by [`KEY_SEPARATOR`]
pub(crate) fn hash_fields(fields: &[&str]) -> String {
    let mut hasher = Sha256::new();
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            let mut buf = [0u8; 4];
            hasher.update(KEY_SEPARATOR.encode_utf8(&mut buf).as_bytes());
        }
        hasher.update(field.as_bytes());
    }
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reverie_common::ManualClock;

    fn cache_with(max: Option<usize>) -> (TtlCache<u32>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::default());
        let cache = TtlCache::new(Duration::hours(1), max, clock.clone());
        (cache, clock)
    }

    #[test]
    fn test_set_then_get() {
        let (mut cache, _) = cache_with(Some(10));
        cache.set("a", 1);
        assert_eq!(cache.get("a"), Some(1));
        assert_eq!(cache.stats().hits, 1);
    }

    #[test]
    fn test_missing_key() {
        let (mut cache, _) = cache_with(Some(10));
        assert_eq!(cache.get("nope"), None);
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn test_expired_entry_is_removed() {
        let (mut cache, clock) = cache_with(Some(10));
        cache.set("a", 1);
        clock.advance(Duration::hours(1));

        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.len(), 0);
        assert_eq!(cache.stats().expirations, 1);

        // Second lookup is a clean miss, not another expiration
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.stats().expirations, 1);
    }

    #[test]
    fn test_not_expired_just_before_ttl() {
        let (mut cache, clock) = cache_with(Some(10));
        cache.set("a", 1);
        clock.advance(Duration::minutes(59));
        assert_eq!(cache.get("a"), Some(1));
    }

    #[test]
    fn test_fifo_eviction() {
        let (mut cache, _) = cache_with(Some(3));
        cache.set("a", 1);
        cache.set("b", 2);
        cache.set("c", 3);
        cache.set("d", 4);

        assert_eq!(cache.len(), 3);
        assert_eq!(cache.stats().evictions, 1);
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), Some(2));
        assert_eq!(cache.get("c"), Some(3));
        assert_eq!(cache.get("d"), Some(4));
    }

    #[test]
    fn test_access_does_not_protect_from_eviction() {
        let (mut cache, _) = cache_with(Some(2));
        cache.set("a", 1);
        cache.set("b", 2);
        assert_eq!(cache.get("a"), Some(1));
        cache.set("c", 3);

        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), Some(2));
    }

    #[test]
    fn test_overwrite_replaces_value_and_requeues() {
        let (mut cache, clock) = cache_with(Some(2));
        cache.set("a", 1);
        cache.set("b", 2);
        clock.advance(Duration::minutes(30));
        cache.set("a", 10);

        // Overwrite at capacity evicts nothing
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.stats().evictions, 0);

        // "b" is now the oldest insertion
        cache.set("c", 3);
        assert_eq!(cache.get("b"), None);
        assert_eq!(cache.get("a"), Some(10));

        // The overwrite reset the timestamp
        clock.advance(Duration::minutes(45));
        assert_eq!(cache.get("a"), Some(10));
    }

    #[test]
    fn test_unbounded_cache_never_evicts() {
        let (mut cache, _) = cache_with(None);
        for i in 0..500 {
            cache.set(format!("k{}", i), i);
        }
        assert_eq!(cache.len(), 500);
        assert_eq!(cache.stats().evictions, 0);
    }

    #[test]
    fn test_iter_live_skips_expired_and_keeps_order() {
        let (mut cache, clock) = cache_with(None);
        cache.set("old", 1);
        clock.advance(Duration::minutes(50));
        cache.set("mid", 2);
        cache.set("new", 3);
        clock.advance(Duration::minutes(20));

        let keys: Vec<&str> = cache.iter_live().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["mid", "new"]);
    }

    #[test]
    fn test_purge_expired() {
        let (mut cache, clock) = cache_with(None);
        cache.set("a", 1);
        cache.set("b", 2);
        clock.advance(Duration::hours(2));
        cache.set("c", 3);

        assert_eq!(cache.purge_expired(), 2);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_stale_slots_are_compacted() {
        let (mut cache, _) = cache_with(Some(4));
        for i in 0..200 {
            cache.set("same", i);
        }
        assert_eq!(cache.len(), 1);
        assert!(cache.order.len() <= 18);
        assert_eq!(cache.get("same"), Some(199));
    }

    #[test]
    fn test_hash_fields_is_stable_hex() {
        let a = hash_fields(&["title", "content"]);
        let b = hash_fields(&["title", "content"]);
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert_ne!(a, hash_fields(&["titlecontent"]));
        assert_ne!(a, hash_fields(&["title", "content", ""]));
    }

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("  Hello \n  World\t"), "hello world");
    }
}
