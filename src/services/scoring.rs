//! Score normalization.
//!
//! Responses arrive on whatever scale the survey template used (1-5 stars,
//! 0-10 NPS, 0-100 percent). Every rated response is projected onto a common
//! ten-point scale before classification, plus a derived five-point value for
//! display.

use serde::Serialize;

use crate::models::SurveyResponse;

/// A response's rating projected onto the shared scales.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NormalizedScore {
    /// Common ten-point scale used for classification.
    pub score10: f64,
    /// Five-point display value, rounded to one decimal.
    pub score5: f64,
}

/// Normalize a response's rating signal onto the ten-point scale.
///
/// The overall rating field wins when it is a finite number; otherwise the
/// custom answers are scanned in key order and the first finite numeric value
/// is used. Returns `None` when the response carries no usable signal or the
/// signal exceeds every known scale.
pub fn normalize_score(
    rating: Option<f64>,
    custom_answers: Option<&serde_json::Value>,
) -> Option<NormalizedScore> {
    let raw = raw_rating_signal(rating, custom_answers)?;
    // Negative signals clamp to zero instead of being dropped.
    let raw = raw.max(0.0);
    // Magnitude decides the source scale. A value of exactly 5 is read as
    // the top of the five-point scale and therefore doubles to 10.
    let score10 = if raw <= 5.0 {
        raw * 2.0
    } else if raw <= 10.0 {
        raw
    } else if raw <= 100.0 {
        raw / 10.0
    } else {
        return None;
    };
    Some(NormalizedScore {
        score10,
        score5: round1(score10 / 2.0),
    })
}

/// Convenience wrapper over [`normalize_score`] for a stored row.
pub fn normalize_response(response: &SurveyResponse) -> Option<NormalizedScore> {
    normalize_score(response.rating, response.custom_answers.as_ref())
}

fn raw_rating_signal(
    rating: Option<f64>,
    custom_answers: Option<&serde_json::Value>,
) -> Option<f64> {
    if let Some(value) = rating {
        if value.is_finite() {
            return Some(value);
        }
    }
    // Key order of the answer map is deterministic, so the fallback picks
    // the same question on every evaluation.
    let answers = custom_answers?.as_object()?;
    for value in answers.values() {
        if let Some(number) = value.as_f64() {
            if number.is_finite() {
                return Some(number);
            }
        }
    }
    None
}

pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
