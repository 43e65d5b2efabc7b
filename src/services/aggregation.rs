//! Pure aggregation of fetched responses into dashboard figures.
//!
//! Everything here is deterministic over its inputs. Both the HTTP dashboard
//! and the offline verification tool call these functions, so any change is
//! visible to both sides at once.

use chrono::TimeZone;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::db::repository::Projection;
use crate::models::{ClassificationThresholds, SurveyResponse};
use crate::services::scoring;

/// Headline figures for the selected period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    /// Submissions that carried a usable rating signal.
    pub total_responses: usize,
    /// Every fetched submission, rated or not.
    pub total_submissions: usize,
    /// Mean five-point score over rated submissions, two decimals.
    pub avg_rating: f64,
    pub good_count: usize,
    pub neutral_count: usize,
    pub bad_count: usize,
    /// Bad-rated submissions that left any contact detail.
    pub bad_identified_count: usize,
    /// Review-page redirects. `None` when the store only served the base
    /// projection and the column was never read.
    pub google_redirect_count: Option<usize>,
}

/// One local calendar day of the trend series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendBucket {
    /// Local date formatted `YYYY-MM-DD`.
    pub date: String,
    pub total_submissions: usize,
    pub total_responses: usize,
    pub good_count: usize,
    pub neutral_count: usize,
    pub bad_count: usize,
    pub avg_rating: f64,
}

/// Aggregated dashboard figures before assembly into the payload.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardAggregation {
    pub summary: DashboardSummary,
    pub trend: Vec<TrendBucket>,
    pub low_ratings: Vec<SurveyResponse>,
}

#[derive(Default)]
struct Tally {
    submissions: usize,
    rated: usize,
    good: usize,
    bad: usize,
    score5_sum: f64,
}

impl Tally {
    fn record(&mut self, score: Option<&scoring::NormalizedScore>, thresholds: &ClassificationThresholds) {
        self.submissions += 1;
        if let Some(score) = score {
            self.rated += 1;
            self.score5_sum += score.score5;
            if thresholds.is_good(score.score10) {
                self.good += 1;
            }
            if thresholds.is_bad(score.score10) {
                self.bad += 1;
            }
        }
    }

    fn neutral(&self) -> usize {
        // Overlapping thresholds can push good + bad past the rated count.
        self.rated.saturating_sub(self.good).saturating_sub(self.bad)
    }

    fn avg_rating(&self) -> f64 {
        if self.rated == 0 {
            0.0
        } else {
            round2(self.score5_sum / self.rated as f64)
        }
    }
}

/// Fold fetched rows into summary, daily trend and low-rating list.
///
/// `tz` decides which calendar day a submission belongs to. Rows without a
/// timestamp count in the summary but are dropped from the trend. The low
/// list is ordered newest first (undated rows last) and truncated to
/// `low_ratings_limit`; each emitted row has its rating replaced by the
/// derived five-point score.
pub fn aggregate_responses<Tz: TimeZone>(
    rows: &[SurveyResponse],
    thresholds: &ClassificationThresholds,
    low_ratings_limit: usize,
    projection: Projection,
    tz: &Tz,
) -> DashboardAggregation {
    let mut overall = Tally::default();
    let mut days: BTreeMap<String, Tally> = BTreeMap::new();
    let mut redirects = 0usize;
    let mut bad_identified = 0usize;
    let mut low: Vec<(&SurveyResponse, f64)> = Vec::new();

    for row in rows {
        let score = scoring::normalize_response(row);
        overall.record(score.as_ref(), thresholds);

        if row.google_redirect == Some(true) {
            redirects += 1;
        }

        if let Some(created_at) = row.created_at {
            let day = created_at.with_timezone(tz).date_naive();
            days.entry(day.format("%Y-%m-%d").to_string())
                .or_default()
                .record(score.as_ref(), thresholds);
        }

        if let Some(score) = score {
            if thresholds.is_bad(score.score10) {
                if row.has_contact_info() {
                    bad_identified += 1;
                }
                low.push((row, score.score5));
            }
        }
    }

    // Newest first; rows without a timestamp sort last.
    low.sort_by(|a, b| b.0.created_at.cmp(&a.0.created_at));
    low.truncate(low_ratings_limit);
    let low_ratings = low
        .into_iter()
        .map(|(row, score5)| {
            let mut emitted = row.clone();
            emitted.rating = Some(score5);
            emitted
        })
        .collect();

    let summary = DashboardSummary {
        total_responses: overall.rated,
        total_submissions: overall.submissions,
        avg_rating: overall.avg_rating(),
        good_count: overall.good,
        neutral_count: overall.neutral(),
        bad_count: overall.bad,
        bad_identified_count: bad_identified,
        google_redirect_count: match projection {
            Projection::Extended => Some(redirects),
            Projection::Base => None,
        },
    };

    let trend = days
        .into_iter()
        .map(|(date, tally)| TrendBucket {
            date,
            total_submissions: tally.submissions,
            total_responses: tally.rated,
            good_count: tally.good,
            neutral_count: tally.neutral(),
            bad_count: tally.bad,
            avg_rating: tally.avg_rating(),
        })
        .collect();

    DashboardAggregation {
        summary,
        trend,
        low_ratings,
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
