//! In-process TTL cache for assembled dashboard payloads.
//!
//! Entries are evicted lazily: an expired entry stays in the map until a read
//! lands on it. There is no background sweeper and no cross-process sharing.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::services::dashboard::DashboardPayload;

/// Fallback time-to-live for cached dashboards.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(15);

/// Time source for cache expiry. Injected so tests can steer it.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall-clock backed [`Clock`] used in production.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Manually advanced [`Clock`] for tests and tooling.
#[derive(Clone)]
pub struct ManualClock {
    base: Instant,
    offset: Arc<RwLock<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            base: Instant::now(),
            offset: Arc::new(RwLock::new(Duration::ZERO)),
        }
    }

    pub fn advance(&self, by: Duration) {
        *self.offset.write() += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.base + *self.offset.read()
    }
}

/// Read/write interface the dashboard assembler caches through.
pub trait DashboardCache: Send + Sync {
    /// Look up a fresh entry. Reading an expired entry removes it.
    fn get(&self, key: &str) -> Option<DashboardPayload>;

    /// Store a payload under `key` for `ttl`.
    fn set(&self, key: &str, payload: DashboardPayload, ttl: Duration);
}

#[derive(Debug, Clone)]
struct CacheEntry {
    payload: DashboardPayload,
    expires_at: Instant,
}

/// Shared in-memory [`DashboardCache`].
#[derive(Clone)]
pub struct MemoryCache {
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
    clock: Arc<dyn Clock>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            clock,
        }
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardCache for MemoryCache {
    fn get(&self, key: &str) -> Option<DashboardPayload> {
        let now = self.clock.now();
        {
            let entries = self.entries.read();
            match entries.get(key) {
                Some(entry) if entry.expires_at > now => return Some(entry.payload.clone()),
                Some(_) => {}
                None => return None,
            }
        }
        // Expired under the read lock; re-check before evicting in case a
        // writer replaced the entry in between.
        let mut entries = self.entries.write();
        if let Some(entry) = entries.get(key) {
            if entry.expires_at <= now {
                entries.remove(key);
            }
        }
        None
    }

    fn set(&self, key: &str, payload: DashboardPayload, ttl: Duration) {
        let entry = CacheEntry {
            payload,
            expires_at: self.clock.now() + ttl,
        };
        self.entries.write().insert(key.to_string(), entry);
    }
}

/// Cache TTL from the environment, falling back to [`DEFAULT_CACHE_TTL`].
///
/// `CACHE_TTL_SECONDS` accepts whole seconds; unparseable values fall back
/// silently.
pub fn cache_ttl_from_env() -> Duration {
    std::env::var("CACHE_TTL_SECONDS")
        .ok()
        .and_then(|raw| raw.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_CACHE_TTL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ClassificationThresholds;
    use crate::services::dashboard::{DashboardPayload, PeriodEcho};

    fn payload(marker: usize) -> DashboardPayload {
        DashboardPayload {
            period: PeriodEcho {
                name: "all".to_string(),
                start: None,
                end: None,
            },
            thresholds: ClassificationThresholds::default(),
            summary: crate::services::aggregation::DashboardSummary {
                total_responses: marker,
                total_submissions: marker,
                avg_rating: 0.0,
                good_count: 0,
                neutral_count: 0,
                bad_count: 0,
                bad_identified_count: 0,
                google_redirect_count: None,
            },
            trend: Vec::new(),
            low_ratings: Vec::new(),
        }
    }

    fn manual_cache() -> (MemoryCache, ManualClock) {
        let clock = ManualClock::new();
        let cache = MemoryCache::with_clock(Arc::new(clock.clone()));
        (cache, clock)
    }

    #[test]
    fn test_get_before_expiry() {
        let (cache, clock) = manual_cache();
        cache.set("k", payload(1), Duration::from_secs(15));
        clock.advance(Duration::from_secs(14));
        let hit = cache.get("k").unwrap();
        assert_eq!(hit.summary.total_submissions, 1);
    }

    #[test]
    fn test_expired_entry_misses_and_is_evicted() {
        let (cache, clock) = manual_cache();
        cache.set("k", payload(1), Duration::from_secs(15));
        clock.advance(Duration::from_secs(15));
        assert!(cache.get("k").is_none());
        // The read dropped the stale entry.
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_expired_entries_linger_until_read() {
        let (cache, clock) = manual_cache();
        cache.set("a", payload(1), Duration::from_secs(1));
        cache.set("b", payload(2), Duration::from_secs(1));
        clock.advance(Duration::from_secs(5));
        assert_eq!(cache.len(), 2);
        assert!(cache.get("a").is_none());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_set_replaces_existing_entry() {
        let (cache, _clock) = manual_cache();
        cache.set("k", payload(1), Duration::from_secs(15));
        cache.set("k", payload(2), Duration::from_secs(15));
        assert_eq!(cache.get("k").unwrap().summary.total_submissions, 2);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_keys_are_independent() {
        let (cache, _clock) = manual_cache();
        cache.set("a", payload(1), Duration::from_secs(15));
        assert!(cache.get("b").is_none());
        assert!(cache.get("a").is_some());
    }

    #[test]
    fn test_default_ttl_is_fifteen_seconds() {
        assert_eq!(DEFAULT_CACHE_TTL, Duration::from_secs(15));
    }
}
