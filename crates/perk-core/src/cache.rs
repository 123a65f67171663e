//! Bounded TTL cache for AI classification results
//!
//! Shared by single and batch fallback calls, and safe for concurrent
//! callers: all reads and the read-then-evict-then-insert sequence run under
//! one internal mutex, so the capacity invariant holds under racing writers.
//! Entries older than the TTL are treated as absent on read and removed
//! lazily; when the cache is full, the single globally-oldest entry (by
//! creation timestamp) is evicted before inserting.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::models::Classification;

/// Deterministic cache key over the effective classification signals.
///
/// Two calls with the same normalized name and the same provider tags (in
/// any order) hit the same slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(name: &str, provider_tags: &[String]) -> Self {
        let mut tags: Vec<String> = provider_tags
            .iter()
            .map(|t| t.trim().to_lowercase())
            .collect();
        tags.sort();
        CacheKey(format!(
            "{}|{}",
            crate::normalize::normalize(name),
            tags.join(",")
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

struct CacheEntry {
    classification: Classification,
    created_at: DateTime<Utc>,
}

pub struct ClassificationCache {
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
    capacity: usize,
    ttl: Duration,
}

impl ClassificationCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            capacity,
            ttl,
        }
    }

    /// Look up a classification; an entry older than the TTL is a miss and
    /// is removed.
    pub fn get(&self, key: &CacheKey) -> Option<Classification> {
        self.get_at(key, Utc::now())
    }

    /// Insert a classification, evicting the globally-oldest entry first if
    /// the cache is at capacity.
    pub fn put(&self, key: CacheKey, classification: Classification) {
        self.put_at(key, classification, Utc::now());
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn get_at(&self, key: &CacheKey, now: DateTime<Utc>) -> Option<Classification> {
        let mut entries = self.entries.lock().unwrap();

        let expired = match entries.get(key) {
            Some(entry) => now - entry.created_at > self.ttl,
            None => return None,
        };

        if expired {
            debug!(key = key.as_str(), "cache entry expired");
            entries.remove(key);
            return None;
        }

        entries.get(key).map(|e| e.classification.clone())
    }

    fn put_at(&self, key: CacheKey, classification: Classification, now: DateTime<Utc>) {
        if self.capacity == 0 {
            return;
        }

        let mut entries = self.entries.lock().unwrap();

        if !entries.contains_key(&key) && entries.len() >= self.capacity {
            let oldest = entries
                .iter()
                .min_by_key(|(_, entry)| entry.created_at)
                .map(|(k, _)| k.clone());
            if let Some(oldest) = oldest {
                debug!(key = oldest.as_str(), "evicting oldest cache entry");
                entries.remove(&oldest);
            }
        }

        entries.insert(
            key,
            CacheEntry {
                classification,
                created_at: now,
            },
        );
    }
}
