//! Classification thresholds for the five-point rating scale.

use serde::{Deserialize, Serialize};

/// Lowest accepted threshold value on the five-point scale.
pub const MIN_THRESHOLD: f64 = 1.0;
/// Highest accepted threshold value on the five-point scale.
pub const MAX_THRESHOLD: f64 = 5.0;
/// Scores at or below twice this value count as bad.
pub const DEFAULT_BAD_THRESHOLD: f64 = 2.0;
/// Scores at or above twice this value count as good.
pub const DEFAULT_GOOD_THRESHOLD: f64 = 4.0;

/// Caller-supplied cutoffs on the five-point scale.
///
/// Both values are clamped into `[1, 5]` independently. The pair is never
/// cross-validated, so `bad > good` is accepted and simply widens both bands;
/// classification treats the two predicates independently.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassificationThresholds {
    pub bad: f64,
    pub good: f64,
}

impl ClassificationThresholds {
    pub fn new(bad: f64, good: f64) -> Self {
        Self {
            bad: clamp_threshold(bad, DEFAULT_BAD_THRESHOLD),
            good: clamp_threshold(good, DEFAULT_GOOD_THRESHOLD),
        }
    }

    /// Build from optional caller parameters, falling back to the defaults.
    pub fn from_params(bad: Option<f64>, good: Option<f64>) -> Self {
        Self::new(
            bad.unwrap_or(DEFAULT_BAD_THRESHOLD),
            good.unwrap_or(DEFAULT_GOOD_THRESHOLD),
        )
    }

    /// Bad cutoff projected onto the ten-point scale.
    pub fn bad10(&self) -> f64 {
        self.bad * 2.0
    }

    /// Good cutoff projected onto the ten-point scale.
    pub fn good10(&self) -> f64 {
        self.good * 2.0
    }

    pub fn is_bad(&self, score10: f64) -> bool {
        score10 <= self.bad10()
    }

    pub fn is_good(&self, score10: f64) -> bool {
        score10 >= self.good10()
    }
}

impl Default for ClassificationThresholds {
    fn default() -> Self {
        Self {
            bad: DEFAULT_BAD_THRESHOLD,
            good: DEFAULT_GOOD_THRESHOLD,
        }
    }
}

fn clamp_threshold(value: f64, fallback: f64) -> f64 {
    if value.is_nan() {
        fallback
    } else {
        value.clamp(MIN_THRESHOLD, MAX_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let t = ClassificationThresholds::default();
        assert_eq!(t.bad, 2.0);
        assert_eq!(t.good, 4.0);
        assert_eq!(t.bad10(), 4.0);
        assert_eq!(t.good10(), 8.0);
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let t = ClassificationThresholds::new(-3.0, 9.5);
        assert_eq!(t.bad, 1.0);
        assert_eq!(t.good, 5.0);
    }

    #[test]
    fn test_non_finite_values_fall_back_to_defaults() {
        let t = ClassificationThresholds::new(f64::NAN, f64::INFINITY);
        assert_eq!(t.bad, DEFAULT_BAD_THRESHOLD);
        // Infinity clamps to the scale maximum.
        assert_eq!(t.good, MAX_THRESHOLD);
    }

    #[test]
    fn test_inverted_pair_is_accepted() {
        let t = ClassificationThresholds::new(4.5, 2.0);
        assert_eq!(t.bad, 4.5);
        assert_eq!(t.good, 2.0);
        // A mid score lands in both bands.
        assert!(t.is_bad(8.0));
        assert!(t.is_good(8.0));
    }

    #[test]
    fn test_classification_is_inclusive_at_the_cutoffs() {
        let t = ClassificationThresholds::default();
        assert!(t.is_bad(4.0));
        assert!(!t.is_bad(4.1));
        assert!(t.is_good(8.0));
        assert!(!t.is_good(7.9));
    }

    #[test]
    fn test_from_params_partial() {
        let t = ClassificationThresholds::from_params(Some(1.5), None);
        assert_eq!(t.bad, 1.5);
        assert_eq!(t.good, DEFAULT_GOOD_THRESHOLD);
    }
}
