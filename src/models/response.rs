//! Survey response row model.
//!
//! Rows come from a loosely-typed store, so every analytic field is optional
//! and absence is handled downstream (clamping, exclusion) rather than
//! surfaced as an error.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::{ResponseId, TemplateId, TenantId};

/// A single survey response as stored.
///
/// The base fields are always present in the store schema; the follow-up
/// fields (`google_redirect`, `follow_up_*`) are only available under the
/// extended projection and stay `None` when the store does not carry them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyResponse {
    pub id: ResponseId,
    pub tenant_id: TenantId,
    pub template_id: TemplateId,
    /// Creation instant. Rows without a parseable timestamp survive fetches
    /// and KPI counts but are dropped from the daily trend.
    pub created_at: Option<DateTime<Utc>>,
    /// Overall 1-5 rating as answered. Emitted low-rating rows carry the
    /// derived five-point score here instead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    /// Per-question answers keyed by question id. Values may be numeric,
    /// boolean or text; non-object payloads are tolerated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_answers: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub would_recommend: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Collection channel tag (e.g. "qr", "whatsapp", "link").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default)]
    pub anonymous: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    /// Whether the respondent was redirected to the public review page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_redirect: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_up_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_up_note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_up_at: Option<DateTime<Utc>>,
}

impl SurveyResponse {
    /// Create a response with only the identifying fields set.
    pub fn new(
        id: ResponseId,
        tenant_id: TenantId,
        template_id: TemplateId,
        created_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            tenant_id,
            template_id,
            created_at,
            rating: None,
            custom_answers: None,
            would_recommend: None,
            comment: None,
            source: None,
            anonymous: false,
            customer_name: None,
            customer_phone: None,
            customer_email: None,
            google_redirect: None,
            follow_up_status: None,
            follow_up_note: None,
            follow_up_at: None,
        }
    }

    /// Whether any customer contact field carries a non-empty value.
    pub fn has_contact_info(&self) -> bool {
        let filled = |field: &Option<String>| {
            field
                .as_deref()
                .map(|value| !value.trim().is_empty())
                .unwrap_or(false)
        };
        filled(&self.customer_name) || filled(&self.customer_phone) || filled(&self.customer_email)
    }

    /// Drop the fields that only exist under the extended projection.
    pub fn strip_extended_fields(&mut self) {
        self.google_redirect = None;
        self.follow_up_status = None;
        self.follow_up_note = None;
        self.follow_up_at = None;
    }
}
