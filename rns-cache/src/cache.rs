//! Per-chain record cache with expiry.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use serde::Serialize;

/// Key of a cached record: the chain it was read from and the lookup input.
///
/// Input is trimmed and lowercased so `0xABC..` and `0xabc..`, or `Alice`
/// and `alice`, share an entry.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    chain_id: u64,
    input: String,
}

impl CacheKey {
    /// Builds a key for `input` on `chain_id`.
    pub fn new(chain_id: u64, input: &str) -> Self {
        Self {
            chain_id,
            input: input.trim().to_lowercase(),
        }
    }

    /// Chain of the record.
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }
}

impl fmt::Debug for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.chain_id, self.input)
    }
}

struct Entry<V> {
    value: V,
    stored_at: Instant,
}

/// Cache limits.
#[derive(Clone, Debug)]
pub struct CacheConfig {
    /// Most records kept before the oldest is evicted
    pub capacity: usize,
    /// How long a record is served
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: 1000,
            ttl: Duration::from_secs(60),
        }
    }
}

impl CacheConfig {
    /// Default capacity with the given TTL.
    pub fn with_ttl_seconds(ttl_seconds: u64) -> Self {
        Self {
            ttl: Duration::from_secs(ttl_seconds),
            ..Default::default()
        }
    }
}

/// Resolved records keyed by chain and input.
///
/// Only successful reads belong here; callers decide what to store.
pub struct RecordCache<V> {
    entries: RwLock<HashMap<CacheKey, Entry<V>>>,
    config: CacheConfig,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<V: Clone> RecordCache<V> {
    /// Creates a cache with default limits.
    pub fn new() -> Self {
        Self::with_config(CacheConfig::default())
    }

    /// Creates a cache with the given limits.
    pub fn with_config(config: CacheConfig) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            config,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    fn is_live(&self, entry: &Entry<V>) -> bool {
        entry.stored_at.elapsed() <= self.config.ttl
    }

    /// The record for `key`, unless absent or expired.
    pub fn get(&self, key: &CacheKey) -> Option<V> {
        let found = self
            .entries
            .read()
            .get(key)
            .filter(|e| self.is_live(e))
            .map(|e| e.value.clone());

        let counter = if found.is_some() { &self.hits } else { &self.misses };
        counter.fetch_add(1, Ordering::Relaxed);
        found
    }

    /// Stores a record, evicting the oldest one when full.
    pub fn insert(&self, key: CacheKey, value: V) {
        let mut entries = self.entries.write();

        if !entries.contains_key(&key) && entries.len() >= self.config.capacity {
            entries.retain(|_, e| e.stored_at.elapsed() <= self.config.ttl);
            if entries.len() >= self.config.capacity {
                let oldest = entries
                    .iter()
                    .min_by_key(|(_, e)| e.stored_at)
                    .map(|(k, _)| k.clone());
                if let Some(oldest) = oldest {
                    entries.remove(&oldest);
                }
            }
        }

        entries.insert(
            key,
            Entry {
                value,
                stored_at: Instant::now(),
            },
        );
    }

    /// Drops every record read from `chain_id`. Returns how many were dropped.
    pub fn invalidate_chain(&self, chain_id: u64) -> usize {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|k, _| k.chain_id != chain_id);
        before - entries.len()
    }

    /// Drops expired records. Returns how many were dropped.
    pub fn purge_expired(&self) -> usize {
        let ttl = self.config.ttl;
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, e| e.stored_at.elapsed() <= ttl);
        before - entries.len()
    }

    /// Drops every record.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Stored records, including expired ones not yet purged.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// True if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Hit and miss counters plus occupancy.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.len(),
            capacity: self.config.capacity,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

impl<V: Clone> Default for RecordCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Stored records
    pub entries: usize,
    /// Record limit
    pub capacity: usize,
    /// Lookups served from the cache
    pub hits: u64,
    /// Lookups that found nothing live
    pub misses: u64,
}
