//! Application state for the HTTP server.

use std::sync::Arc;
use std::time::Duration;

use crate::db::repository::ResponseRepository;
use crate::services::result_cache::{cache_ttl_from_env, DashboardCache, MemoryCache};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository instance for survey response reads
    pub repository: Arc<dyn ResponseRepository>,
    /// Cache for assembled dashboard payloads
    pub cache: Arc<dyn DashboardCache>,
    /// Time-to-live for cached dashboards
    pub cache_ttl: Duration,
}

impl AppState {
    /// Create a new application state with the given repository.
    ///
    /// The dashboard cache starts empty; its TTL comes from
    /// `CACHE_TTL_SECONDS` when set.
    pub fn new(repository: Arc<dyn ResponseRepository>) -> Self {
        Self {
            repository,
            cache: Arc::new(MemoryCache::new()),
            cache_ttl: cache_ttl_from_env(),
        }
    }

    /// Swap the cache and TTL. Tests use this to steer expiry.
    pub fn with_cache(mut self, cache: Arc<dyn DashboardCache>, cache_ttl: Duration) -> Self {
        self.cache = cache;
        self.cache_ttl = cache_ttl;
        self
    }
}
