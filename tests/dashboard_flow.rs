//! End-to-end dashboard assembly against the in-memory repository: scoring,
//! aggregation, caching, drift fallback and the live feed.

mod support;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use cxa_rust::api::TenantId;
use cxa_rust::db::repository::{
    Projection, RepositoryError, RepositoryResult, ResponseQuery, ResponseRepository,
};
use cxa_rust::db::LocalRepository;
use cxa_rust::models::SurveyResponse;
use cxa_rust::services::dashboard::{
    compute_dashboard, executive_dashboard, live_feed, DashboardRequest, LiveFeedRequest,
};
use cxa_rust::services::result_cache::{ManualClock, MemoryCache};

use support::{identified_response, march, rated_response};

/// Repository wrapper that counts store reads.
struct CountingRepository {
    inner: LocalRepository,
    fetches: AtomicUsize,
}

impl CountingRepository {
    fn new(inner: LocalRepository) -> Self {
        Self {
            inner,
            fetches: AtomicUsize::new(0),
        }
    }

    fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ResponseRepository for CountingRepository {
    async fn fetch_responses(
        &self,
        query: &ResponseQuery,
        projection: Projection,
    ) -> RepositoryResult<Vec<SurveyResponse>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.inner.fetch_responses(query, projection).await
    }

    async fn health_check(&self) -> RepositoryResult<bool> {
        self.inner.health_check().await
    }
}

/// Repository whose reads always fail with a non-drift error.
struct FailingRepository {
    fetches: AtomicUsize,
}

impl FailingRepository {
    fn new() -> Self {
        Self {
            fetches: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ResponseRepository for FailingRepository {
    async fn fetch_responses(
        &self,
        _query: &ResponseQuery,
        _projection: Projection,
    ) -> RepositoryResult<Vec<SurveyResponse>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Err(RepositoryError::query("connection reset by peer"))
    }

    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(false)
    }
}

/// Responses across every supported rating scale, early March 2026.
fn seed_mixed_scales(repo: &LocalRepository) {
    // Five-point scale, redirected to the review page.
    let mut r1 = rated_response("r1", "acme", Some(march(1, 9)), Some(5.0));
    r1.google_redirect = Some(true);
    repo.insert(r1);

    // Ten-point scale, also redirected.
    let mut r2 = rated_response("r2", "acme", Some(march(1, 10)), Some(9.0));
    r2.google_redirect = Some(true);
    repo.insert(r2);

    // Percentage scale.
    repo.insert(rated_response("r3", "acme", Some(march(2, 9)), Some(85.0)));

    // No primary rating; the numeric answer in the custom map carries it.
    let mut r4 = rated_response("r4", "acme", Some(march(2, 10)), None);
    r4.custom_answers = Some(serde_json::json!({
        "comment_text": "friendly staff",
        "nps": 3.0,
    }));
    repo.insert(r4);

    // Detractor who left contact details.
    repo.insert(identified_response("r5", "acme", Some(march(3, 9)), Some(1.0)));

    // Submission without any rating signal.
    repo.insert(rated_response("r6", "acme", Some(march(3, 10)), None));

    // Out-of-range raw value, not scorable.
    repo.insert(rated_response("r7", "acme", Some(march(4, 9)), Some(250.0)));

    // Another tenant's row, never visible to acme.
    repo.insert(rated_response("x1", "globex", Some(march(2, 9)), Some(1.0)));
}

fn all_time_request() -> DashboardRequest {
    DashboardRequest {
        tenant_id: TenantId::new("acme"),
        period: Some("all".to_string()),
        ..Default::default()
    }
}

fn manual_cache() -> (MemoryCache, ManualClock) {
    let clock = ManualClock::new();
    let cache = MemoryCache::with_clock(Arc::new(clock.clone()));
    (cache, clock)
}

#[tokio::test]
async fn test_dashboard_figures_from_mixed_scales() {
    let repo = LocalRepository::new();
    seed_mixed_scales(&repo);

    let payload = compute_dashboard(&repo, &all_time_request(), march(15, 12))
        .await
        .unwrap();

    let summary = &payload.summary;
    assert_eq!(summary.total_submissions, 7);
    assert_eq!(summary.total_responses, 5);
    assert_eq!(summary.good_count, 3);
    assert_eq!(summary.neutral_count, 1);
    assert_eq!(summary.bad_count, 1);
    assert_eq!(summary.bad_identified_count, 1);
    assert_eq!(summary.google_redirect_count, Some(2));
    // Five-point scores: 5.0, 4.5, 4.3, 3.0, 1.0.
    assert_eq!(summary.avg_rating, 3.56);

    let dates: Vec<&str> = payload.trend.iter().map(|b| b.date.as_str()).collect();
    assert_eq!(
        dates,
        vec!["2026-03-01", "2026-03-02", "2026-03-03", "2026-03-04"]
    );
    assert_eq!(payload.trend[0].good_count, 2);
    assert_eq!(payload.trend[0].avg_rating, 4.75);
    assert_eq!(payload.trend[3].total_responses, 0);

    assert_eq!(payload.low_ratings.len(), 1);
    assert_eq!(payload.low_ratings[0].id.value(), "r5");
    // The emitted rating is the derived five-point score.
    assert_eq!(payload.low_ratings[0].rating, Some(1.0));

    assert_eq!(payload.period.name, "all");
    assert_eq!(payload.period.start, None);
    assert_eq!(payload.period.end, None);
}

#[tokio::test]
async fn test_cache_serves_repeat_requests_within_ttl() {
    let inner = LocalRepository::new();
    seed_mixed_scales(&inner);
    let repo = CountingRepository::new(inner);
    let (cache, clock) = manual_cache();
    let request = all_time_request();

    let first = executive_dashboard(&repo, &cache, Duration::from_secs(15), &request, march(15, 12))
        .await
        .unwrap();
    clock.advance(Duration::from_secs(10));
    let second = executive_dashboard(&repo, &cache, Duration::from_secs(15), &request, march(15, 12))
        .await
        .unwrap();

    assert_eq!(repo.fetch_count(), 1);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_cache_expires_after_ttl() {
    let inner = LocalRepository::new();
    seed_mixed_scales(&inner);
    let repo = CountingRepository::new(inner);
    let (cache, clock) = manual_cache();
    let request = all_time_request();

    executive_dashboard(&repo, &cache, Duration::from_secs(15), &request, march(15, 12))
        .await
        .unwrap();
    clock.advance(Duration::from_secs(16));
    executive_dashboard(&repo, &cache, Duration::from_secs(15), &request, march(15, 12))
        .await
        .unwrap();

    assert_eq!(repo.fetch_count(), 2);
}

#[tokio::test]
async fn test_rolling_period_polls_reuse_the_cached_entry() {
    let inner = LocalRepository::new();
    seed_mixed_scales(&inner);
    let repo = CountingRepository::new(inner);
    let (cache, _clock) = manual_cache();

    // A month window re-anchors its end bound on every poll's clock.
    let request = DashboardRequest {
        tenant_id: TenantId::new("acme"),
        period: Some("month".to_string()),
        ..Default::default()
    };
    let first = executive_dashboard(&repo, &cache, Duration::from_secs(15), &request, march(15, 12))
        .await
        .unwrap();
    let second = executive_dashboard(
        &repo,
        &cache,
        Duration::from_secs(15),
        &request,
        march(15, 12) + chrono::Duration::seconds(1),
    )
    .await
    .unwrap();

    assert_eq!(repo.fetch_count(), 1);
    assert_eq!(first, second);
    // Repeat polls reuse one slot instead of stacking an entry per request.
    assert_eq!(cache.len(), 1);
}

#[tokio::test]
async fn test_distinct_parameters_get_distinct_cache_entries() {
    let inner = LocalRepository::new();
    seed_mixed_scales(&inner);
    let repo = CountingRepository::new(inner);
    let (cache, _clock) = manual_cache();

    let request = all_time_request();
    executive_dashboard(&repo, &cache, Duration::from_secs(15), &request, march(15, 12))
        .await
        .unwrap();

    let stricter = DashboardRequest {
        bad_threshold: Some(3.0),
        ..all_time_request()
    };
    let payload = executive_dashboard(
        &repo,
        &cache,
        Duration::from_secs(15),
        &stricter,
        march(15, 12),
    )
    .await
    .unwrap();

    assert_eq!(repo.fetch_count(), 2);
    // r4's score of 3.0 now classifies as bad alongside r5.
    assert_eq!(payload.summary.bad_count, 2);
}

#[tokio::test]
async fn test_drifted_store_falls_back_to_base_projection() {
    let inner = LocalRepository::without_extended_columns();
    inner.insert(rated_response("r1", "acme", Some(march(1, 9)), Some(5.0)));
    let repo = CountingRepository::new(inner);
    let (cache, _clock) = manual_cache();

    let payload = executive_dashboard(
        &repo,
        &cache,
        Duration::from_secs(15),
        &all_time_request(),
        march(15, 12),
    )
    .await
    .unwrap();

    // One failed extended read, one successful base read.
    assert_eq!(repo.fetch_count(), 2);
    assert_eq!(payload.summary.total_submissions, 1);
    assert_eq!(payload.summary.google_redirect_count, None);
}

#[tokio::test]
async fn test_store_failure_is_masked_behind_generic_error() {
    let (cache, _clock) = manual_cache();
    let repo = FailingRepository::new();

    let err = executive_dashboard(
        &repo,
        &cache,
        Duration::from_secs(15),
        &all_time_request(),
        march(15, 12),
    )
    .await
    .unwrap_err();

    let message = err.to_string();
    assert_eq!(message, "failed to fetch responses");
    assert!(!message.contains("connection reset"));
    // The cause stays on the error chain for logging.
    assert!(std::error::Error::source(&err).is_some());
    // A non-drift failure is never retried with the base projection.
    assert_eq!(repo.fetches.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_thresholds_are_clamped_independently_and_echoed() {
    let repo = LocalRepository::new();
    // score10 = 6.0.
    repo.insert(rated_response("r1", "acme", Some(march(1, 9)), Some(3.0)));

    let request = DashboardRequest {
        bad_threshold: Some(9.5),
        good_threshold: Some(0.5),
        ..all_time_request()
    };
    let payload = compute_dashboard(&repo, &request, march(15, 12)).await.unwrap();

    assert_eq!(payload.thresholds.bad, 5.0);
    assert_eq!(payload.thresholds.good, 1.0);
    // With bad above good the row classifies as both; neutral saturates at zero.
    assert_eq!(payload.summary.bad_count, 1);
    assert_eq!(payload.summary.good_count, 1);
    assert_eq!(payload.summary.neutral_count, 0);
}

#[tokio::test]
async fn test_custom_period_end_reaches_end_of_day() {
    let repo = LocalRepository::new();
    repo.insert(rated_response("evening", "acme", Some(march(10, 18)), Some(4.0)));
    repo.insert(rated_response("next-day", "acme", Some(march(11, 0)), Some(4.0)));
    repo.insert(rated_response("before", "acme", Some(march(9, 23)), Some(4.0)));

    let request = DashboardRequest {
        tenant_id: TenantId::new("acme"),
        period: Some("custom".to_string()),
        start: Some("2026-03-10".to_string()),
        end: Some("2026-03-10".to_string()),
        ..Default::default()
    };
    let payload = compute_dashboard(&repo, &request, march(15, 12)).await.unwrap();

    assert_eq!(payload.summary.total_submissions, 1);
    assert_eq!(payload.trend[0].date, "2026-03-10");
}

#[tokio::test]
async fn test_unknown_period_name_falls_back_to_month() {
    let repo = LocalRepository::new();
    repo.insert(rated_response("recent", "acme", Some(march(5, 9)), Some(4.0)));
    let mut old = rated_response("old", "acme", None, Some(4.0));
    old.created_at = Some(Utc.with_ymd_and_hms(2026, 2, 20, 9, 0, 0).unwrap());
    repo.insert(old);

    let request = DashboardRequest {
        period: Some("quarterly".to_string()),
        ..all_time_request()
    };
    let payload = compute_dashboard(&repo, &request, march(15, 12)).await.unwrap();

    assert_eq!(payload.period.name, "month");
    assert_eq!(payload.summary.total_submissions, 1);
}

#[tokio::test]
async fn test_dashboard_is_deterministic_for_fixed_inputs() {
    let repo = LocalRepository::new();
    seed_mixed_scales(&repo);
    let request = all_time_request();

    let first = compute_dashboard(&repo, &request, march(15, 12)).await.unwrap();
    let second = compute_dashboard(&repo, &request, march(15, 12)).await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_live_feed_newest_first_with_capped_limit() {
    let repo = LocalRepository::new();
    for i in 0..55i64 {
        let created = march(15, 0) + chrono::Duration::minutes(i);
        repo.insert(rated_response(&format!("r{i}"), "acme", Some(created), Some(4.0)));
    }
    // Yesterday's row stays outside the default "today" window.
    repo.insert(rated_response("stale", "acme", Some(march(14, 23)), Some(4.0)));

    let request = LiveFeedRequest {
        tenant_id: TenantId::new("acme"),
        limit: Some(500),
        ..Default::default()
    };
    let payload = live_feed(&repo, &request, march(15, 12)).await.unwrap();

    assert_eq!(payload.total, 50);
    assert_eq!(payload.responses.len(), 50);
    assert_eq!(payload.responses[0].id.value(), "r54");
    assert!(payload.responses.iter().all(|r| r.id.value() != "stale"));
    assert_eq!(payload.period.name, "today");
}

#[tokio::test]
async fn test_live_feed_default_limit_is_twenty() {
    let repo = LocalRepository::new();
    for i in 0..30i64 {
        let created = march(15, 0) + chrono::Duration::minutes(i);
        repo.insert(rated_response(&format!("r{i}"), "acme", Some(created), Some(4.0)));
    }

    let request = LiveFeedRequest {
        tenant_id: TenantId::new("acme"),
        ..Default::default()
    };
    let payload = live_feed(&repo, &request, march(15, 12)).await.unwrap();

    assert_eq!(payload.responses.len(), 20);
}
