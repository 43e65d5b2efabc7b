//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer for business logic. Period resolution is anchored to the
//! server's local time at the moment of the request.

use axum::{
    extract::{Path, Query, State},
    Json,
};

use super::dto::{DashboardQuery, HealthResponse, LiveFeedQuery};
use super::error::AppError;
use super::state::AppState;
use crate::api::TenantId;
use crate::services::dashboard::{
    executive_dashboard, live_feed, DashboardPayload, LiveFeedPayload,
};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and the store is
/// accessible.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match state.repository.health_check().await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Dashboard
// =============================================================================

/// GET /v1/tenants/{tenant_id}/dashboard
///
/// Executive dashboard for one tenant: KPI summary, daily trend and the
/// low-rating list, all computed over the requested period. Served from the
/// in-process cache when an identical request was assembled recently.
pub async fn get_dashboard(
    State(state): State<AppState>,
    Path(tenant_id): Path<String>,
    Query(query): Query<DashboardQuery>,
) -> HandlerResult<DashboardPayload> {
    let request = query.into_request(TenantId::new(tenant_id));
    let payload = executive_dashboard(
        state.repository.as_ref(),
        state.cache.as_ref(),
        state.cache_ttl,
        &request,
        chrono::Local::now(),
    )
    .await?;

    Ok(Json(payload))
}

// =============================================================================
// Live Feed
// =============================================================================

/// GET /v1/tenants/{tenant_id}/responses/live
///
/// Most recent raw responses for one tenant, newest first. Always computed
/// fresh; the dashboard cache is not consulted.
pub async fn get_live_feed(
    State(state): State<AppState>,
    Path(tenant_id): Path<String>,
    Query(query): Query<LiveFeedQuery>,
) -> HandlerResult<LiveFeedPayload> {
    let request = query.into_request(TenantId::new(tenant_id));
    let payload = live_feed(state.repository.as_ref(), &request, chrono::Local::now()).await?;

    Ok(Json(payload))
}
