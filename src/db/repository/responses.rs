//! Response repository trait.
//!
//! This module defines the capability interface for reading survey responses
//! from a backing store. The engine only ever reads; nothing here mutates
//! the store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::RepositoryResult;
use crate::api::{TemplateFilter, TenantId};
use crate::models::SurveyResponse;

/// Column set a fetch reads from the store.
///
/// The projections are named rather than free-form so every backend offers
/// exactly the same two shapes and callers can reason about which one a
/// payload was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Projection {
    /// Columns every deployed store has carried from day one.
    Base,
    /// Base columns plus the review-redirect and follow-up columns that
    /// older deployments may lack.
    Extended,
}

impl Projection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Projection::Base => "base",
            Projection::Extended => "extended",
        }
    }
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort direction over the response creation timestamp.
///
/// Rows without a timestamp sort as the earliest in both directions: first
/// under ascending order, last under descending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Filters and shaping for a response fetch.
#[derive(Debug, Clone)]
pub struct ResponseQuery {
    pub tenant_id: TenantId,
    pub template: TemplateFilter,
    /// Inclusive lower bound on `created_at`. Rows without a timestamp are
    /// excluded whenever a bound is set.
    pub start: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `created_at`.
    pub end: Option<DateTime<Utc>>,
    pub order: SortOrder,
    /// Maximum number of rows to return. `None` fetches everything in range.
    pub limit: Option<i64>,
}

impl ResponseQuery {
    /// Unbounded ascending query over one tenant's responses.
    pub fn for_tenant(tenant_id: TenantId) -> Self {
        Self {
            tenant_id,
            template: TemplateFilter::All,
            start: None,
            end: None,
            order: SortOrder::Ascending,
            limit: None,
        }
    }

    pub fn with_template(mut self, template: TemplateFilter) -> Self {
        self.template = template;
        self
    }

    pub fn with_range(mut self, start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    pub fn descending(mut self) -> Self {
        self.order = SortOrder::Descending;
        self
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Read access to a survey response store.
///
/// Implementations must treat both projections as first-class: a store that
/// physically lacks the extended columns reports
/// [`RepositoryError::SchemaDrift`](super::error::RepositoryError::SchemaDrift)
/// for extended fetches instead of failing generically.
#[async_trait]
pub trait ResponseRepository: Send + Sync {
    /// Fetch the responses matching `query` under the given projection.
    ///
    /// # Arguments
    /// * `query` - Tenant, template and time-range filters plus ordering
    /// * `projection` - Which column set to read
    ///
    /// # Returns
    /// The matching rows, ordered per the query. Under the base projection
    /// the extended fields of every returned row are `None`.
    async fn fetch_responses(
        &self,
        query: &ResponseQuery,
        projection: Projection,
    ) -> RepositoryResult<Vec<SurveyResponse>>;

    /// Check connectivity to the backing store.
    async fn health_check(&self) -> RepositoryResult<bool>;
}
