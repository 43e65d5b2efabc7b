//! Dashboard assembly.
//!
//! This is the orchestration layer shared by the HTTP handlers and the
//! offline verification tool: clamp caller parameters, resolve the period,
//! consult the cache, fetch through the repository and aggregate.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::api::{TemplateFilter, TenantId};
use crate::db::repository::{
    Projection, RepositoryError, ResponseQuery, ResponseRepository, SortOrder,
};
use crate::models::{
    resolve_live_feed_period, resolve_period, ClassificationThresholds, PeriodName, PeriodRange,
    SurveyResponse,
};
use crate::services::aggregation::{aggregate_responses, DashboardSummary, TrendBucket};
use crate::services::fingerprint::fingerprint;
use crate::services::result_cache::DashboardCache;

/// Low-rating list length when the caller does not ask for one.
pub const DEFAULT_LOW_RATINGS_LIMIT: i64 = 30;
/// Hard cap on the low-rating list length.
pub const MAX_LOW_RATINGS_LIMIT: i64 = 100;
/// Live feed page size when the caller does not ask for one.
pub const DEFAULT_LIVE_FEED_LIMIT: i64 = 20;
/// Hard cap on the live feed page size.
pub const MAX_LIVE_FEED_LIMIT: i64 = 50;

/// Errors surfaced by the assembly layer.
///
/// Store failures are collapsed into one generic condition; the underlying
/// cause is logged, not exposed.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("failed to fetch responses")]
    Fetch(#[source] RepositoryError),
}

/// Caller parameters for the executive dashboard, before clamping.
#[derive(Debug, Clone, Default)]
pub struct DashboardRequest {
    pub tenant_id: TenantId,
    pub template: TemplateFilter,
    pub period: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub bad_threshold: Option<f64>,
    pub good_threshold: Option<f64>,
    pub low_ratings_limit: Option<i64>,
}

impl DashboardRequest {
    pub fn for_tenant(tenant_id: TenantId) -> Self {
        Self {
            tenant_id,
            ..Default::default()
        }
    }
}

/// Caller parameters for the live response feed.
#[derive(Debug, Clone, Default)]
pub struct LiveFeedRequest {
    pub tenant_id: TenantId,
    pub template: TemplateFilter,
    pub period: Option<String>,
    pub limit: Option<i64>,
}

/// Resolved period bounds echoed back in payloads, in UTC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodEcho {
    pub name: String,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl PeriodEcho {
    fn from_range<Tz: TimeZone>(range: &PeriodRange<Tz>) -> Self {
        Self {
            name: range.name.to_string(),
            start: range.start_utc(),
            end: range.end_utc(),
        }
    }
}

/// Fully assembled executive dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardPayload {
    pub period: PeriodEcho,
    pub thresholds: ClassificationThresholds,
    pub summary: DashboardSummary,
    pub trend: Vec<TrendBucket>,
    pub low_ratings: Vec<SurveyResponse>,
}

/// Recent raw responses for the live feed. Never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveFeedPayload {
    pub period: PeriodEcho,
    pub total: usize,
    pub responses: Vec<SurveyResponse>,
}

/// Fetch responses, narrowing the projection once on schema drift.
///
/// The extended projection is tried first. If the store reports a missing
/// column the fetch is repeated with the base projection and the caller is
/// told which projection actually served the rows. Any other error is fatal
/// as-is, drift on the base projection included.
pub async fn fetch_responses_resilient(
    repository: &dyn ResponseRepository,
    query: &ResponseQuery,
) -> Result<(Vec<SurveyResponse>, Projection), RepositoryError> {
    match repository.fetch_responses(query, Projection::Extended).await {
        Ok(rows) => Ok((rows, Projection::Extended)),
        Err(err) if err.is_schema_drift() => {
            log::warn!(
                "store for tenant {} lacks extended response columns, retrying with base projection: {}",
                query.tenant_id,
                err
            );
            let rows = repository.fetch_responses(query, Projection::Base).await?;
            Ok((rows, Projection::Base))
        }
        Err(err) => Err(err),
    }
}

/// Assemble the executive dashboard through the cache.
///
/// `now` anchors period resolution; pass the current local time in
/// production and a pinned instant in tests. Identical parameters within
/// `cache_ttl` are served from the cache without touching the store.
pub async fn executive_dashboard<Tz>(
    repository: &dyn ResponseRepository,
    cache: &dyn DashboardCache,
    cache_ttl: Duration,
    request: &DashboardRequest,
    now: DateTime<Tz>,
) -> Result<DashboardPayload, ServiceError>
where
    Tz: TimeZone,
    Tz::Offset: Send + Sync,
{
    let tz = now.timezone();
    let thresholds =
        ClassificationThresholds::from_params(request.bad_threshold, request.good_threshold);
    let limit = clamp_low_ratings_limit(request.low_ratings_limit);
    let range = resolve_period(
        now,
        request.period.as_deref(),
        request.start.as_deref(),
        request.end.as_deref(),
    );

    let key = dashboard_cache_key(request, range.name, &thresholds, limit);
    if let Some(hit) = cache.get(&key) {
        log::debug!("dashboard cache hit for tenant {}", request.tenant_id);
        return Ok(hit);
    }

    let payload =
        build_dashboard(repository, request, thresholds, limit, &range, &tz).await?;
    cache.set(&key, payload.clone(), cache_ttl);
    Ok(payload)
}

/// Assemble the executive dashboard without the cache.
///
/// Same computation as [`executive_dashboard`]; the verification tool uses
/// this to recompute figures straight from the store.
pub async fn compute_dashboard<Tz>(
    repository: &dyn ResponseRepository,
    request: &DashboardRequest,
    now: DateTime<Tz>,
) -> Result<DashboardPayload, ServiceError>
where
    Tz: TimeZone,
    Tz::Offset: Send + Sync,
{
    let tz = now.timezone();
    let thresholds =
        ClassificationThresholds::from_params(request.bad_threshold, request.good_threshold);
    let limit = clamp_low_ratings_limit(request.low_ratings_limit);
    let range = resolve_period(
        now,
        request.period.as_deref(),
        request.start.as_deref(),
        request.end.as_deref(),
    );
    build_dashboard(repository, request, thresholds, limit, &range, &tz).await
}

/// Fetch the most recent raw responses. Bypasses cache and scoring.
pub async fn live_feed<Tz>(
    repository: &dyn ResponseRepository,
    request: &LiveFeedRequest,
    now: DateTime<Tz>,
) -> Result<LiveFeedPayload, ServiceError>
where
    Tz: TimeZone,
    Tz::Offset: Send + Sync,
{
    let range = resolve_live_feed_period(now, request.period.as_deref());
    let limit = clamp_live_feed_limit(request.limit);
    let query = ResponseQuery {
        tenant_id: request.tenant_id.clone(),
        template: request.template.clone(),
        start: range.start_utc(),
        end: range.end_utc(),
        order: SortOrder::Descending,
        limit: Some(limit),
    };
    let (responses, _projection) = fetch_responses_resilient(repository, &query)
        .await
        .map_err(|err| fetch_failed(&request.tenant_id, err))?;
    Ok(LiveFeedPayload {
        period: PeriodEcho::from_range(&range),
        total: responses.len(),
        responses,
    })
}

async fn build_dashboard<Tz>(
    repository: &dyn ResponseRepository,
    request: &DashboardRequest,
    thresholds: ClassificationThresholds,
    low_ratings_limit: i64,
    range: &PeriodRange<Tz>,
    tz: &Tz,
) -> Result<DashboardPayload, ServiceError>
where
    Tz: TimeZone,
{
    let query = ResponseQuery {
        tenant_id: request.tenant_id.clone(),
        template: request.template.clone(),
        start: range.start_utc(),
        end: range.end_utc(),
        order: SortOrder::Ascending,
        limit: None,
    };
    let (rows, projection) = fetch_responses_resilient(repository, &query)
        .await
        .map_err(|err| fetch_failed(&request.tenant_id, err))?;

    let aggregation =
        aggregate_responses(&rows, &thresholds, low_ratings_limit as usize, projection, tz);

    Ok(DashboardPayload {
        period: PeriodEcho::from_range(range),
        thresholds,
        summary: aggregation.summary,
        trend: aggregation.trend,
        low_ratings: aggregation.low_ratings,
    })
}

fn fetch_failed(tenant_id: &TenantId, err: RepositoryError) -> ServiceError {
    log::error!("response fetch failed for tenant {}: {}", tenant_id, err);
    ServiceError::Fetch(err)
}

/// Clamp the requested low-rating list length into `[0, 100]`.
pub fn clamp_low_ratings_limit(requested: Option<i64>) -> i64 {
    requested
        .unwrap_or(DEFAULT_LOW_RATINGS_LIMIT)
        .clamp(0, MAX_LOW_RATINGS_LIMIT)
}

/// Clamp the requested live feed page size into `[0, 50]`.
pub fn clamp_live_feed_limit(requested: Option<i64>) -> i64 {
    requested
        .unwrap_or(DEFAULT_LIVE_FEED_LIMIT)
        .clamp(0, MAX_LIVE_FEED_LIMIT)
}

/// Cache key over every caller parameter that shapes the payload.
///
/// Keyed on the raw request, never on the resolved bounds: rolling periods
/// re-anchor `end` at each request's clock reading, so a key containing a
/// bound would never repeat. Successive polls with the same parameters must
/// land on one slot; staleness inside a TTL window is what the cache is for.
fn dashboard_cache_key(
    request: &DashboardRequest,
    period: PeriodName,
    thresholds: &ClassificationThresholds,
    low_ratings_limit: i64,
) -> String {
    fingerprint(&[
        request.tenant_id.value(),
        request.template.as_param(),
        period.as_str(),
        request.start.as_deref().unwrap_or("open"),
        request.end.as_deref().unwrap_or("open"),
        &thresholds.bad.to_string(),
        &thresholds.good.to_string(),
        &low_ratings_limit.to_string(),
    ])
}
