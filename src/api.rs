//! Public API surface for the analytics engine.
//!
//! This file consolidates the identifier newtypes and re-exports the payload
//! types the HTTP API serves. All types derive Serialize/Deserialize for
//! JSON serialization.

pub use crate::models::period::PeriodName;
pub use crate::models::response::SurveyResponse;
pub use crate::models::thresholds::ClassificationThresholds;
pub use crate::services::aggregation::DashboardSummary;
pub use crate::services::aggregation::TrendBucket;
pub use crate::services::dashboard::DashboardPayload;
pub use crate::services::dashboard::DashboardRequest;
pub use crate::services::dashboard::LiveFeedPayload;
pub use crate::services::dashboard::LiveFeedRequest;
pub use crate::services::dashboard::PeriodEcho;
pub use crate::services::scoring::NormalizedScore;
pub use crate::services::verification::Mismatch;

use serde::{Deserialize, Serialize};

/// Tenant identifier (one customer organisation).
#[derive(
    Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TenantId(pub String);

/// Survey template identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateId(pub String);

/// Survey response identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponseId(pub String);

impl TenantId {
    pub fn new(value: impl Into<String>) -> Self {
        TenantId(value.into())
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl TemplateId {
    pub fn new(value: impl Into<String>) -> Self {
        TemplateId(value.into())
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl ResponseId {
    pub fn new(value: impl Into<String>) -> Self {
        ResponseId(value.into())
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TenantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::fmt::Display for TemplateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::fmt::Display for ResponseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<TenantId> for String {
    fn from(id: TenantId) -> Self {
        id.0
    }
}

/// Template selection for a fetch or dashboard request.
///
/// The literal parameter value `"all"` means no filtering; anything else is
/// taken verbatim as a template id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TemplateFilter {
    #[default]
    All,
    Only(TemplateId),
}

impl TemplateFilter {
    /// Parse the `template_id` request parameter. Absent means all.
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            None => TemplateFilter::All,
            Some("all") => TemplateFilter::All,
            Some(id) => TemplateFilter::Only(TemplateId::new(id)),
        }
    }

    /// The parameter form of this filter, as sent over the wire.
    pub fn as_param(&self) -> &str {
        match self {
            TemplateFilter::All => "all",
            TemplateFilter::Only(id) => id.value(),
        }
    }

    pub fn matches(&self, template_id: &TemplateId) -> bool {
        match self {
            TemplateFilter::All => true,
            TemplateFilter::Only(id) => id == template_id,
        }
    }
}
