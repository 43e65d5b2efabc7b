//! In-memory repository implementation.
//!
//! Backs unit tests and local development. Rows live in a `Vec` behind a
//! read/write lock; filtering and ordering mirror what the Postgres backend
//! asks its database for, so the two are interchangeable behind the trait.

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::db::repository::{
    ErrorContext, Projection, RepositoryError, RepositoryResult, ResponseQuery,
    ResponseRepository, SortOrder,
};
use crate::models::SurveyResponse;

/// In-memory response store.
pub struct LocalRepository {
    responses: RwLock<Vec<SurveyResponse>>,
    /// Whether the simulated schema carries the extended columns.
    extended_schema: bool,
}

impl LocalRepository {
    /// Empty store with the full, current schema.
    pub fn new() -> Self {
        Self {
            responses: RwLock::new(Vec::new()),
            extended_schema: true,
        }
    }

    /// Empty store simulating an older deployment without the extended
    /// columns. Extended fetches against it report schema drift.
    pub fn without_extended_columns() -> Self {
        Self {
            responses: RwLock::new(Vec::new()),
            extended_schema: false,
        }
    }

    pub fn insert(&self, response: SurveyResponse) {
        self.responses.write().push(response);
    }

    pub fn insert_many(&self, responses: impl IntoIterator<Item = SurveyResponse>) {
        self.responses.write().extend(responses);
    }

    pub fn clear(&self) {
        self.responses.write().clear();
    }

    pub fn len(&self) -> usize {
        self.responses.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.responses.read().is_empty()
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResponseRepository for LocalRepository {
    async fn fetch_responses(
        &self,
        query: &ResponseQuery,
        projection: Projection,
    ) -> RepositoryResult<Vec<SurveyResponse>> {
        if projection == Projection::Extended && !self.extended_schema {
            return Err(RepositoryError::schema_drift_with_context(
                "column \"google_redirect\" does not exist",
                ErrorContext::new("fetch_responses")
                    .with_entity("response")
                    .with_entity_id(query.tenant_id.value()),
            ));
        }

        let mut rows: Vec<SurveyResponse> = self
            .responses
            .read()
            .iter()
            .filter(|row| row.tenant_id == query.tenant_id)
            .filter(|row| query.template.matches(&row.template_id))
            .filter(|row| match query.start {
                // A time bound excludes rows without a timestamp.
                Some(start) => row.created_at.map(|ts| ts >= start).unwrap_or(false),
                None => true,
            })
            .filter(|row| match query.end {
                Some(end) => row.created_at.map(|ts| ts <= end).unwrap_or(false),
                None => true,
            })
            .cloned()
            .collect();

        match query.order {
            SortOrder::Ascending => rows.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
            SortOrder::Descending => rows.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        }

        if let Some(limit) = query.limit {
            rows.truncate(limit.max(0) as usize);
        }

        if projection == Projection::Base {
            for row in &mut rows {
                row.strip_extended_fields();
            }
        }

        Ok(rows)
    }

    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(true)
    }
}
