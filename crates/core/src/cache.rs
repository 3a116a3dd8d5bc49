//! Time-boxed in-memory response cache.
//!
//! Keys are the verbatim lowercased query text. Expiry is only checked at
//! lookup time: a stale entry stays in memory until it is read again or the
//! process exits. There is no size bound.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::clock::{Clock, SystemClock};

/// Default time-to-live for cached answers (10 minutes).
pub const DEFAULT_TTL_SECS: i64 = 600;

/// A cached answer and when it was stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub answer: String,
    pub created_at: DateTime<Utc>,
}

/// Answer cache shared by all request tasks.
///
/// Thread-safe via `std::sync::Mutex` (non-async, held briefly). Concurrent
/// writers on the same key leave whichever value landed last.
#[derive(Debug)]
pub struct ResponseCache {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl ResponseCache {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Cache with the default TTL on the system clock.
    pub fn with_defaults() -> Self {
        Self::new(Duration::seconds(DEFAULT_TTL_SECS), Arc::new(SystemClock))
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cached answer for `key`, if it is no older than the TTL.
    ///
    /// An expired entry is removed before reporting a miss.
    pub fn get(&self, key: &str) -> Option<String> {
        let now = self.clock.now();
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());

        let entry = entries.get(key)?;
        if now - entry.created_at > self.ttl {
            entries.remove(key);
            tracing::debug!(key_len = key.len(), "Cache entry expired");
            return None;
        }
        Some(entry.answer.clone())
    }

    /// Store or overwrite `key` with the current time.
    pub fn set(&self, key: &str, answer: &str) {
        let entry = CacheEntry {
            answer: answer.to_string(),
            created_at: self.clock.now(),
        };
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), entry);
    }

    /// Raw entry without an expiry check.
    pub fn peek(&self, key: &str) -> Option<CacheEntry> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }

    /// Number of stored entries, stale ones included.
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn cache_with_clock() -> (ResponseCache, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::default());
        let cache = ResponseCache::new(Duration::seconds(DEFAULT_TTL_SECS), clock.clone());
        (cache, clock)
    }

    #[test]
    fn miss_on_empty_cache() {
        let (cache, _) = cache_with_clock();
        assert_eq!(cache.get("breakfast"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn hit_within_ttl() {
        let (cache, clock) = cache_with_clock();
        cache.set("breakfast", "menu");
        clock.advance(Duration::seconds(300));
        assert_eq!(cache.get("breakfast").as_deref(), Some("menu"));
    }

    #[test]
    fn entry_exactly_at_ttl_is_still_fresh() {
        let (cache, clock) = cache_with_clock();
        cache.set("spa", "book ahead");
        clock.advance(Duration::seconds(DEFAULT_TTL_SECS));
        assert_eq!(cache.get("spa").as_deref(), Some("book ahead"));
    }

    #[test]
    fn expired_entry_is_evicted_on_read() {
        let (cache, clock) = cache_with_clock();
        cache.set("spa", "book ahead");
        clock.advance(Duration::seconds(DEFAULT_TTL_SECS + 1));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("spa"), None);
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn stale_entries_linger_until_read() {
        let (cache, clock) = cache_with_clock();
        cache.set("a", "1");
        cache.set("b", "2");
        clock.advance(Duration::hours(1));
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.len(), 1);
        assert!(cache.peek("b").is_some());
    }

    #[test]
    fn set_overwrites_and_refreshes_timestamp() {
        let (cache, clock) = cache_with_clock();
        cache.set("wifi", "old");
        let first = cache.peek("wifi").unwrap().created_at;

        clock.advance(Duration::seconds(700));
        cache.set("wifi", "new");

        let entry = cache.peek("wifi").unwrap();
        assert_eq!(entry.answer, "new");
        assert_eq!(entry.created_at - first, Duration::seconds(700));
    }

    #[test]
    fn keys_are_verbatim() {
        let (cache, _) = cache_with_clock();
        cache.set("wifi password", "x");
        assert_eq!(cache.get("wifi  password"), None);
        assert_eq!(cache.get("WIFI PASSWORD"), None);
    }

    #[test]
    fn shared_across_threads() {
        let cache = Arc::new(ResponseCache::with_defaults());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let cache = cache.clone();
                std::thread::spawn(move || cache.set("same", &format!("answer {i}")))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        let value = cache.get("same").unwrap();
        assert!(value.starts_with("answer "));
        assert_eq!(cache.len(), 1);
    }
}
