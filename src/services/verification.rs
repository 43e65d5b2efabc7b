//! Payload verification.
//!
//! Compares a dashboard recomputed straight from the store against the one a
//! running server returned. Only the deterministic parts are compared: the
//! summary, the trend series and the low-rating list. Period bounds are left
//! out because they move with the clock between the two computations.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::services::aggregation::TrendBucket;
use crate::services::dashboard::DashboardPayload;

/// A single field that differs between the two payloads.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mismatch {
    /// Dotted path of the differing field, e.g. `summary.good_count`.
    pub field: String,
    /// Value recomputed from the store.
    pub expected: String,
    /// Value the server returned.
    pub actual: String,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: expected {}, got {}",
            self.field, self.expected, self.actual
        )
    }
}

/// Diff two dashboard payloads field by field.
///
/// `expected` is the recomputation, `actual` the served payload. An empty
/// result means the server agrees with the store.
pub fn diff_payloads(expected: &DashboardPayload, actual: &DashboardPayload) -> Vec<Mismatch> {
    let mut mismatches = Vec::new();

    diff_summaries(&mut mismatches, expected, actual);
    diff_trends(&mut mismatches, &expected.trend, &actual.trend);
    diff_low_ratings(&mut mismatches, expected, actual);

    mismatches
}

fn diff_summaries(out: &mut Vec<Mismatch>, expected: &DashboardPayload, actual: &DashboardPayload) {
    let e = &expected.summary;
    let a = &actual.summary;
    check(out, "summary.total_responses", &e.total_responses, &a.total_responses);
    check(out, "summary.total_submissions", &e.total_submissions, &a.total_submissions);
    check(out, "summary.avg_rating", &e.avg_rating, &a.avg_rating);
    check(out, "summary.good_count", &e.good_count, &a.good_count);
    check(out, "summary.neutral_count", &e.neutral_count, &a.neutral_count);
    check(out, "summary.bad_count", &e.bad_count, &a.bad_count);
    check(
        out,
        "summary.bad_identified_count",
        &e.bad_identified_count,
        &a.bad_identified_count,
    );
    check(
        out,
        "summary.google_redirect_count",
        &e.google_redirect_count,
        &a.google_redirect_count,
    );
}

fn diff_trends(out: &mut Vec<Mismatch>, expected: &[TrendBucket], actual: &[TrendBucket]) {
    let expected_by_date: BTreeMap<&str, &TrendBucket> =
        expected.iter().map(|b| (b.date.as_str(), b)).collect();
    let actual_by_date: BTreeMap<&str, &TrendBucket> =
        actual.iter().map(|b| (b.date.as_str(), b)).collect();

    for (date, bucket) in &expected_by_date {
        match actual_by_date.get(date) {
            None => out.push(Mismatch {
                field: format!("trend[{}]", date),
                expected: "present".to_string(),
                actual: "missing".to_string(),
            }),
            Some(other) => {
                let prefix = format!("trend[{}]", date);
                check(
                    out,
                    format!("{prefix}.total_submissions"),
                    &bucket.total_submissions,
                    &other.total_submissions,
                );
                check(
                    out,
                    format!("{prefix}.total_responses"),
                    &bucket.total_responses,
                    &other.total_responses,
                );
                check(out, format!("{prefix}.good_count"), &bucket.good_count, &other.good_count);
                check(
                    out,
                    format!("{prefix}.neutral_count"),
                    &bucket.neutral_count,
                    &other.neutral_count,
                );
                check(out, format!("{prefix}.bad_count"), &bucket.bad_count, &other.bad_count);
                check(out, format!("{prefix}.avg_rating"), &bucket.avg_rating, &other.avg_rating);
            }
        }
    }

    for date in actual_by_date.keys() {
        if !expected_by_date.contains_key(date) {
            out.push(Mismatch {
                field: format!("trend[{}]", date),
                expected: "missing".to_string(),
                actual: "present".to_string(),
            });
        }
    }
}

fn diff_low_ratings(
    out: &mut Vec<Mismatch>,
    expected: &DashboardPayload,
    actual: &DashboardPayload,
) {
    check(
        out,
        "low_ratings.len",
        &expected.low_ratings.len(),
        &actual.low_ratings.len(),
    );
    for (index, (e, a)) in expected
        .low_ratings
        .iter()
        .zip(actual.low_ratings.iter())
        .enumerate()
    {
        check(out, format!("low_ratings[{index}].id"), &e.id, &a.id);
        check(out, format!("low_ratings[{index}].rating"), &e.rating, &a.rating);
    }
}

fn check<T: PartialEq + fmt::Debug>(
    out: &mut Vec<Mismatch>,
    field: impl Into<String>,
    expected: &T,
    actual: &T,
) {
    if expected != actual {
        out.push(Mismatch {
            field: field.into(),
            expected: format!("{:?}", expected),
            actual: format!("{:?}", actual),
        });
    }
}
