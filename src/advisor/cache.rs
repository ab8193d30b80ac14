//! # Score cache
//!
//! TTL cache shielding the scoring hot path from repeated advisor calls.
//! Expiry is lazy: a stale entry is dropped by the read that discovers it,
//! there is no background sweep. The key space is bounded by the cluster
//! fleet, so no capacity-based eviction is applied.

use std::time::{Duration, Instant};

use dashmap::DashMap;

/// Read/write seam over the score cache so tests can observe cache traffic.
pub trait ScoreStore: Send + Sync {
    /// Returns the cached score for `key`, if one exists and is still fresh.
    fn get(&self, key: &str) -> Option<f64>;

    /// Overwrites the entry for `key` with a freshly timestamped score.
    fn set(&self, key: &str, score: f64);
}

/// A cached score together with the moment it was recorded.
struct CacheEntry {
    score: f64,
    recorded_at: Instant,
}

/// Concurrent map from cluster name to the last known score.
pub struct ScoreCache {
    store: DashMap<String, CacheEntry>,
    ttl: Duration,
}

impl ScoreCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            store: DashMap::new(),
            ttl,
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.store.len()
    }
}

impl ScoreStore for ScoreCache {
    fn get(&self, key: &str) -> Option<f64> {
        // read the entry without holding the shard lock past the match
        let fresh = match self.store.get(key) {
            Some(entry) if entry.recorded_at.elapsed() <= self.ttl => Some(entry.score),
            Some(_) => None,
            None => return None,
        };

        if fresh.is_none() {
            // stale entry found, upgrade to a write to drop it
            self.store
                .remove_if(key, |_, e| e.recorded_at.elapsed() > self.ttl);
        }

        fresh
    }

    fn set(&self, key: &str, score: f64) {
        self.store.insert(
            key.to_string(),
            CacheEntry {
                score,
                recorded_at: Instant::now(),
            },
        );
    }
}

/// Test double recording every cache access, optionally serving a preset
/// score on reads.
#[cfg(test)]
pub struct SpyCache {
    pub preset: Option<f64>,
    pub get_calls: std::sync::Mutex<Vec<String>>,
    pub set_calls: std::sync::Mutex<Vec<(String, f64)>>,
}

#[cfg(test)]
impl SpyCache {
    pub fn new(preset: Option<f64>) -> Self {
        Self {
            preset,
            get_calls: std::sync::Mutex::new(Vec::new()),
            set_calls: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[cfg(test)]
impl ScoreStore for SpyCache {
    fn get(&self, key: &str) -> Option<f64> {
        self.get_calls.lock().unwrap().push(key.to_string());
        self.preset
    }

    fn set(&self, key: &str, score: f64) {
        self.set_calls.lock().unwrap().push((key.to_string(), score));
    }
}
