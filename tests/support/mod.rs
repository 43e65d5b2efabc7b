// Shared helpers for the integration test binaries. Not every binary uses
// every helper.
#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;

use chrono::{DateTime, TimeZone, Utc};
use cxa_rust::api::{ResponseId, TemplateId, TenantId};
use cxa_rust::models::SurveyResponse;

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// This is panic-safe (restores variables on unwind) and also serializes access to
/// process-global env vars to avoid flaky tests when Rust runs tests in parallel.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().expect("ENV_LOCK poisoned");
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

/// UTC timestamp on a fixed March 2026 day.
pub fn march(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, day, hour, 0, 0).unwrap()
}

/// Minimal response for `tenant`, rated on the five-point scale.
pub fn rated_response(
    id: &str,
    tenant: &str,
    created_at: Option<DateTime<Utc>>,
    rating: Option<f64>,
) -> SurveyResponse {
    let mut response = SurveyResponse::new(
        ResponseId::new(id),
        TenantId::new(tenant),
        TemplateId::new("post-visit"),
        created_at,
    );
    response.rating = rating;
    response
}

/// Response carrying contact details, for follow-up list assertions.
pub fn identified_response(
    id: &str,
    tenant: &str,
    created_at: Option<DateTime<Utc>>,
    rating: Option<f64>,
) -> SurveyResponse {
    let mut response = rated_response(id, tenant, created_at, rating);
    response.customer_name = Some("Dana Cliente".to_string());
    response.customer_email = Some("dana@example.com".to_string());
    response
}
