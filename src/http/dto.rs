//! Data Transfer Objects for the HTTP API.
//!
//! Query parameters are tolerant by contract: a malformed numeric value is
//! treated as absent rather than rejected, so the numeric fields arrive as
//! raw strings and are parsed here. Response payloads are re-exported from
//! the service layer since they already derive Serialize/Deserialize.

use serde::{Deserialize, Serialize};

pub use crate::services::dashboard::{DashboardPayload, LiveFeedPayload};

use crate::api::{TemplateFilter, TenantId};
use crate::services::dashboard::{DashboardRequest, LiveFeedRequest};

/// Query parameters for the executive dashboard endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DashboardQuery {
    /// Template filter; absent or "all" selects every template
    #[serde(default)]
    pub template_id: Option<String>,
    /// Named period (today, week, month, custom, all)
    #[serde(default)]
    pub period: Option<String>,
    /// Custom period start timestamp
    #[serde(default)]
    pub start: Option<String>,
    /// Custom period end timestamp
    #[serde(default)]
    pub end: Option<String>,
    /// Bad classification threshold on the five-point scale
    #[serde(default)]
    pub bad_threshold: Option<String>,
    /// Good classification threshold on the five-point scale
    #[serde(default)]
    pub good_threshold: Option<String>,
    /// Maximum length of the low-rating list
    #[serde(default)]
    pub low_ratings_limit: Option<String>,
}

impl DashboardQuery {
    /// Convert into a typed service request for `tenant_id`.
    pub fn into_request(self, tenant_id: TenantId) -> DashboardRequest {
        DashboardRequest {
            tenant_id,
            template: TemplateFilter::from_param(self.template_id.as_deref()),
            period: self.period,
            start: self.start,
            end: self.end,
            bad_threshold: parse_f64(self.bad_threshold.as_deref()),
            good_threshold: parse_f64(self.good_threshold.as_deref()),
            low_ratings_limit: parse_i64(self.low_ratings_limit.as_deref()),
        }
    }
}

/// Query parameters for the live feed endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LiveFeedQuery {
    /// Template filter; absent or "all" selects every template
    #[serde(default)]
    pub template_id: Option<String>,
    /// Named period (today, week, month, all); defaults to today
    #[serde(default)]
    pub period: Option<String>,
    /// Page size
    #[serde(default)]
    pub limit: Option<String>,
}

impl LiveFeedQuery {
    /// Convert into a typed service request for `tenant_id`.
    pub fn into_request(self, tenant_id: TenantId) -> LiveFeedRequest {
        LiveFeedRequest {
            tenant_id,
            template: TemplateFilter::from_param(self.template_id.as_deref()),
            period: self.period,
            limit: parse_i64(self.limit.as_deref()),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the API
    pub version: String,
    /// Database connection status
    pub database: String,
}

fn parse_f64(raw: Option<&str>) -> Option<f64> {
    raw.and_then(|s| s.trim().parse().ok())
}

fn parse_i64(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|s| s.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_params_parse_leniently() {
        let query = DashboardQuery {
            bad_threshold: Some("1.5".to_string()),
            good_threshold: Some("not-a-number".to_string()),
            low_ratings_limit: Some(" 25 ".to_string()),
            ..Default::default()
        };

        let request = query.into_request(TenantId::new("acme"));
        assert_eq!(request.bad_threshold, Some(1.5));
        assert_eq!(request.good_threshold, None);
        assert_eq!(request.low_ratings_limit, Some(25));
    }

    #[test]
    fn test_template_param_maps_to_filter() {
        let all = DashboardQuery::default().into_request(TenantId::new("acme"));
        assert_eq!(all.template, TemplateFilter::All);

        let query = DashboardQuery {
            template_id: Some("post-visit".to_string()),
            ..Default::default()
        };
        let request = query.into_request(TenantId::new("acme"));
        assert_eq!(request.template.as_param(), "post-visit");
    }

    #[test]
    fn test_live_feed_limit_parses_leniently() {
        let query = LiveFeedQuery {
            limit: Some("oops".to_string()),
            ..Default::default()
        };
        let request = query.into_request(TenantId::new("acme"));
        assert_eq!(request.limit, None);
    }
}
