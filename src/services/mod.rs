//! Service layer for business logic and orchestration.
//!
//! This module contains the analytics pipeline that sits between the
//! repositories and the outward surfaces. Scoring and aggregation are pure;
//! the dashboard module orchestrates fetching and caching around them.

pub mod aggregation;

pub mod dashboard;

pub mod fingerprint;

pub mod result_cache;

pub mod scoring;

pub mod verification;

pub use aggregation::{aggregate_responses, DashboardSummary, TrendBucket};
pub use dashboard::{
    compute_dashboard, executive_dashboard, fetch_responses_resilient, live_feed,
    DashboardPayload, DashboardRequest, LiveFeedPayload, LiveFeedRequest, PeriodEcho,
    ServiceError,
};
pub use result_cache::{
    cache_ttl_from_env, Clock, DashboardCache, ManualClock, MemoryCache, SystemClock,
    DEFAULT_CACHE_TTL,
};
pub use scoring::{normalize_response, normalize_score, NormalizedScore};
pub use verification::{diff_payloads, Mismatch};
