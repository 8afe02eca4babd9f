//! Bounded cache of per-record searchable text.
//!
//! Building the lowercase text of a record walks every content block and
//! serializes tool inputs; caching it keeps a search keystroke at one substring
//! test per record.
//!
//! Eviction is batch LRU over [`lru::LruCache`]: when an insert would exceed
//! capacity, the least recently used [`EVICTION_PERCENT`] of capacity is
//! popped at once.

use crate::model::{EntryUuid, Record};
use lru::LruCache;
use tracing::debug;

/// Default maximum number of cached entries.
pub const DEFAULT_CACHE_CAPACITY: usize = 2000;

/// Largest accepted capacity; larger requests are clamped.
pub const MAX_CACHE_CAPACITY: usize = 1_000_000;

/// Share of capacity evicted per batch.
pub const EVICTION_PERCENT: usize = 20;

// ===== CacheKey =====

/// Key for searchable-text lookup.
///
/// Records with a UUID are keyed by it. Records without one fall back to a
/// structural signature built from cheap fields (no hashing of content).
/// Two distinct identity-less records with equal role, timestamp, text length
/// and block count share a key and therefore share cached text; logs written
/// by Claude Code always carry a UUID, so this only affects hand-made input.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Record carrying an entry UUID.
    Uuid(EntryUuid),
    /// Identity-less record.
    Signature {
        /// Role name.
        role: String,
        /// Timestamp in epoch milliseconds, if any.
        timestamp_ms: Option<i64>,
        /// Byte length of the text-bearing fields.
        text_len: usize,
        /// Number of content blocks.
        block_count: usize,
    },
    /// Malformed line: line numbers are unique within one load.
    Line {
        /// 1-based input line.
        line_number: usize,
        /// Byte length of the raw line.
        raw_len: usize,
    },
}

impl CacheKey {
    /// Key under which `record`'s text is cached.
    pub fn for_record(record: &Record) -> Self {
        match record {
            Record::Valid(r) => match r.uuid() {
                Some(uuid) => CacheKey::Uuid(uuid.clone()),
                None => CacheKey::Signature {
                    role: r.role().as_str().to_string(),
                    timestamp_ms: r.timestamp().map(|t| t.timestamp_millis()),
                    text_len: r.content().text_len(),
                    block_count: r.content().block_count(),
                },
            },
            Record::Malformed(m) => CacheKey::Line {
                line_number: m.line_number(),
                raw_len: m.raw_line().len(),
            },
        }
    }
}

// ===== Stats =====

/// Counters reported by [`ContentCache::stats`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that built the text.
    pub misses: u64,
    /// Entries currently held.
    pub size: usize,
    /// Maximum entries held.
    pub capacity: usize,
    /// hits / (hits + misses), 0.0 before the first lookup.
    pub hit_rate: f64,
    /// Number of eviction batches run.
    pub eviction_batches: u64,
    /// Entries dropped across all batches.
    pub evicted_entries: u64,
}

/// Configuration for the content cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct ContentCacheConfig {
    /// Maximum number of cached entries (default: 2000).
    pub capacity: usize,
}

impl Default for ContentCacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

// ===== ContentCache =====

/// Searchable-text cache with batch LRU eviction.
///
/// All lookups take `&mut self`: the borrow checker is the single-writer
/// discipline for access-order bookkeeping. Share across threads only behind
/// a `Mutex`.
#[derive(Debug)]
pub struct ContentCache {
    /// Unbounded internally; `capacity` is enforced by batch eviction.
    entries: LruCache<CacheKey, String>,
    capacity: usize,
    hits: u64,
    misses: u64,
    eviction_batches: u64,
    evicted_entries: u64,
}

impl ContentCache {
    /// Create new cache with given capacity.
    ///
    /// If capacity is 0, uses default of 2000. Capacities above
    /// [`MAX_CACHE_CAPACITY`] are clamped.
    pub fn new(capacity: usize) -> Self {
        let capacity = match capacity {
            0 => DEFAULT_CACHE_CAPACITY,
            n => n.min(MAX_CACHE_CAPACITY),
        };
        Self {
            entries: LruCache::unbounded(),
            capacity,
            hits: 0,
            misses: 0,
            eviction_batches: 0,
            evicted_entries: 0,
        }
    }

    /// Create a cache from its config section.
    pub fn from_config(config: &ContentCacheConfig) -> Self {
        Self::new(config.capacity)
    }

    /// Lowercase searchable text of `record`, built on first lookup.
    ///
    /// Never fails. Refreshes the entry's recency; a miss may evict a batch
    /// of older entries before the new entry is inserted.
    pub fn searchable_text(&mut self, record: &Record) -> &str {
        let key = CacheKey::for_record(record);

        if self.entries.contains(&key) {
            self.hits += 1;
        } else {
            self.misses += 1;
            if self.entries.len() >= self.capacity {
                self.evict_batch();
            }
        }

        self.entries
            .get_or_insert(key, || record.searchable_text())
            .as_str()
    }

    /// Peek at a cached entry without touching recency or counters.
    pub fn peek(&self, key: &CacheKey) -> Option<&str> {
        self.entries.peek(key).map(String::as_str)
    }

    /// Remove one entry. Returns whether it was present.
    pub fn invalidate(&mut self, key: &CacheKey) -> bool {
        self.entries.pop(key).is_some()
    }

    /// Remove every entry. Counters are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of entries kept.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Snapshot of the hit, miss and eviction counters.
    pub fn stats(&self) -> CacheStats {
        let lookups = self.hits + self.misses;
        let hit_rate = if lookups == 0 {
            0.0
        } else {
            self.hits as f64 / lookups as f64
        };
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            size: self.entries.len(),
            capacity: self.capacity,
            hit_rate,
            eviction_batches: self.eviction_batches,
            evicted_entries: self.evicted_entries,
        }
    }

    /// Number of entries dropped per eviction batch.
    fn batch_size(&self) -> usize {
        self.capacity
            .saturating_mul(EVICTION_PERCENT)
            .div_ceil(100)
            .max(1)
    }

    fn evict_batch(&mut self) {
        let batch = self.batch_size().min(self.entries.len());
        if batch == 0 {
            return;
        }

        let mut evicted = 0usize;
        while evicted < batch && self.entries.pop_lru().is_some() {
            evicted += 1;
        }

        self.eviction_batches += 1;
        self.evicted_entries += evicted as u64;
        debug!(evicted, remaining = self.entries.len(), "Content cache batch eviction");
    }
}

impl Default for ContentCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}
