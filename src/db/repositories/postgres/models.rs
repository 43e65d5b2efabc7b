use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

use super::schema::survey_responses;
use crate::api::{ResponseId, TemplateId, TenantId};
use crate::models::SurveyResponse;

/// Columns every deployed store carries.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = survey_responses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct BaseResponseRow {
    pub id: String,
    pub tenant_id: String,
    pub template_id: String,
    pub created_at: Option<DateTime<Utc>>,
    pub rating: Option<f64>,
    pub custom_answers: Option<Value>,
    pub would_recommend: Option<bool>,
    pub comment: Option<String>,
    pub source: Option<String>,
    pub anonymous: Option<bool>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
}

/// Base columns plus the ones newer deployments added.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = survey_responses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ExtendedResponseRow {
    pub id: String,
    pub tenant_id: String,
    pub template_id: String,
    pub created_at: Option<DateTime<Utc>>,
    pub rating: Option<f64>,
    pub custom_answers: Option<Value>,
    pub would_recommend: Option<bool>,
    pub comment: Option<String>,
    pub source: Option<String>,
    pub anonymous: Option<bool>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    pub google_redirect: Option<bool>,
    pub follow_up_status: Option<String>,
    pub follow_up_note: Option<String>,
    pub follow_up_at: Option<DateTime<Utc>>,
}

impl From<BaseResponseRow> for SurveyResponse {
    fn from(row: BaseResponseRow) -> Self {
        SurveyResponse {
            id: ResponseId::new(row.id),
            tenant_id: TenantId::new(row.tenant_id),
            template_id: TemplateId::new(row.template_id),
            created_at: row.created_at,
            rating: row.rating,
            custom_answers: row.custom_answers,
            would_recommend: row.would_recommend,
            comment: row.comment,
            source: row.source,
            anonymous: row.anonymous.unwrap_or(false),
            customer_name: row.customer_name,
            customer_phone: row.customer_phone,
            customer_email: row.customer_email,
            google_redirect: None,
            follow_up_status: None,
            follow_up_note: None,
            follow_up_at: None,
        }
    }
}

impl From<ExtendedResponseRow> for SurveyResponse {
    fn from(row: ExtendedResponseRow) -> Self {
        SurveyResponse {
            id: ResponseId::new(row.id),
            tenant_id: TenantId::new(row.tenant_id),
            template_id: TemplateId::new(row.template_id),
            created_at: row.created_at,
            rating: row.rating,
            custom_answers: row.custom_answers,
            would_recommend: row.would_recommend,
            comment: row.comment,
            source: row.source,
            anonymous: row.anonymous.unwrap_or(false),
            customer_name: row.customer_name,
            customer_phone: row.customer_phone,
            customer_email: row.customer_email,
            google_redirect: row.google_redirect,
            follow_up_status: row.follow_up_status,
            follow_up_note: row.follow_up_note,
            follow_up_at: row.follow_up_at,
        }
    }
}
