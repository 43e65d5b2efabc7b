//! Reporting period names and their resolution into concrete time ranges.
//!
//! Resolution is done once per request against a caller-supplied "now" so the
//! same range feeds the store query, the cache key and the payload echo.

use chrono::{
    DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Named reporting window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodName {
    Today,
    Week,
    Month,
    Custom,
    All,
}

impl PeriodName {
    /// Parse a caller-supplied period name.
    ///
    /// Absent input takes `fallback`; an unrecognised name silently resolves
    /// as [`PeriodName::Month`], never as an error.
    pub fn parse_or(value: Option<&str>, fallback: PeriodName) -> PeriodName {
        match value {
            None => fallback,
            Some("today") => PeriodName::Today,
            Some("week") => PeriodName::Week,
            Some("month") => PeriodName::Month,
            Some("custom") => PeriodName::Custom,
            Some("all") => PeriodName::All,
            Some(_) => PeriodName::Month,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodName::Today => "today",
            PeriodName::Week => "week",
            PeriodName::Month => "month",
            PeriodName::Custom => "custom",
            PeriodName::All => "all",
        }
    }
}

impl fmt::Display for PeriodName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved window in the caller's timezone. `None` bounds are open.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodRange<Tz: TimeZone> {
    pub name: PeriodName,
    pub start: Option<DateTime<Tz>>,
    pub end: Option<DateTime<Tz>>,
}

impl<Tz: TimeZone> PeriodRange<Tz> {
    pub fn start_utc(&self) -> Option<DateTime<Utc>> {
        self.start.as_ref().map(|dt| dt.with_timezone(&Utc))
    }

    pub fn end_utc(&self) -> Option<DateTime<Utc>> {
        self.end.as_ref().map(|dt| dt.with_timezone(&Utc))
    }
}

/// Resolve a dashboard period. Absent names default to `month`.
pub fn resolve_period<Tz>(
    now: DateTime<Tz>,
    period: Option<&str>,
    start: Option<&str>,
    end: Option<&str>,
) -> PeriodRange<Tz>
where
    Tz: TimeZone,
{
    resolve(now, PeriodName::parse_or(period, PeriodName::Month), start, end)
}

/// Resolve a live-feed period. Absent names default to `today` and custom
/// bounds are not accepted on this path.
pub fn resolve_live_feed_period<Tz>(now: DateTime<Tz>, period: Option<&str>) -> PeriodRange<Tz>
where
    Tz: TimeZone,
{
    resolve(now, PeriodName::parse_or(period, PeriodName::Today), None, None)
}

fn resolve<Tz>(
    now: DateTime<Tz>,
    name: PeriodName,
    start: Option<&str>,
    end: Option<&str>,
) -> PeriodRange<Tz>
where
    Tz: TimeZone,
{
    let tz = now.timezone();
    match name {
        PeriodName::All => PeriodRange {
            name,
            start: None,
            end: None,
        },
        PeriodName::Today => PeriodRange {
            name,
            start: Some(start_of_day(&now)),
            end: Some(now),
        },
        PeriodName::Week => {
            let week_ago = now.clone() - Duration::days(7);
            PeriodRange {
                name,
                start: Some(start_of_day(&week_ago)),
                end: Some(now),
            }
        }
        PeriodName::Month => PeriodRange {
            name,
            start: Some(start_of_month(&now)),
            end: Some(now),
        },
        PeriodName::Custom => {
            let start = start.and_then(|value| parse_instant(value, &tz));
            // A supplied end bound always covers its whole closing day.
            let end = match end.and_then(|value| parse_instant(value, &tz)) {
                Some(parsed) => end_of_day(&parsed),
                None => now,
            };
            PeriodRange {
                name,
                start,
                end: Some(end),
            }
        }
    }
}

/// Parse one of the accepted timestamp shapes into the target timezone.
///
/// Accepted: RFC 3339, `YYYY-MM-DDTHH:MM:SS` (read as local wall time) and
/// `YYYY-MM-DD` (read as local midnight). Anything else is treated as absent.
fn parse_instant<Tz: TimeZone>(value: &str, tz: &Tz) -> Option<DateTime<Tz>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(tz));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return from_local(tz, naive);
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return from_local(tz, date.and_time(NaiveTime::MIN));
    }
    None
}

fn from_local<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> Option<DateTime<Tz>> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        LocalResult::None => None,
    }
}

fn start_of_day<Tz: TimeZone>(dt: &DateTime<Tz>) -> DateTime<Tz> {
    match dt.with_time(NaiveTime::MIN) {
        LocalResult::Single(midnight) => midnight,
        LocalResult::Ambiguous(earliest, _) => earliest,
        // A timezone shift can skip midnight entirely; keep the instant.
        LocalResult::None => dt.clone(),
    }
}

fn start_of_month<Tz: TimeZone>(dt: &DateTime<Tz>) -> DateTime<Tz> {
    let midnight = start_of_day(dt);
    midnight.with_day(1).unwrap_or(midnight)
}

fn end_of_day<Tz: TimeZone>(dt: &DateTime<Tz>) -> DateTime<Tz> {
    let Some(closing) = NaiveTime::from_hms_milli_opt(23, 59, 59, 999) else {
        return dt.clone();
    };
    match dt.with_time(closing) {
        LocalResult::Single(end) => end,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => dt.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 15, 12, 30, 45).unwrap()
    }

    #[test]
    fn test_parse_or_known_names() {
        assert_eq!(PeriodName::parse_or(Some("today"), PeriodName::Month), PeriodName::Today);
        assert_eq!(PeriodName::parse_or(Some("week"), PeriodName::Month), PeriodName::Week);
        assert_eq!(PeriodName::parse_or(Some("all"), PeriodName::Month), PeriodName::All);
        assert_eq!(PeriodName::parse_or(Some("custom"), PeriodName::Month), PeriodName::Custom);
    }

    #[test]
    fn test_parse_or_fallback_and_unknown() {
        assert_eq!(PeriodName::parse_or(None, PeriodName::Today), PeriodName::Today);
        // Unknown names resolve as month, not as the fallback.
        assert_eq!(PeriodName::parse_or(Some("fortnight"), PeriodName::Today), PeriodName::Month);
    }

    #[test]
    fn test_all_period_is_unbounded() {
        let range = resolve_period(noon(), Some("all"), None, None);
        assert_eq!(range.name, PeriodName::All);
        assert!(range.start.is_none());
        assert!(range.end.is_none());
    }

    #[test]
    fn test_today_starts_at_midnight() {
        let range = resolve_period(noon(), Some("today"), None, None);
        let start = range.start.unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2026, 3, 15, 0, 0, 0).unwrap());
        assert_eq!(range.end.unwrap(), noon());
    }

    #[test]
    fn test_week_spans_seven_days_clamped_to_midnight() {
        let range = resolve_period(noon(), Some("week"), None, None);
        assert_eq!(
            range.start.unwrap(),
            Utc.with_ymd_and_hms(2026, 3, 8, 0, 0, 0).unwrap()
        );
        assert_eq!(range.end.unwrap(), noon());
    }

    #[test]
    fn test_month_starts_on_the_first() {
        let range = resolve_period(noon(), Some("month"), None, None);
        assert_eq!(
            range.start.unwrap(),
            Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_absent_period_defaults_to_month() {
        let range = resolve_period(noon(), None, None, None);
        assert_eq!(range.name, PeriodName::Month);
    }

    #[test]
    fn test_unknown_period_resolves_like_month() {
        let range = resolve_period(noon(), Some("quarter"), None, None);
        assert_eq!(range.name, PeriodName::Month);
        assert_eq!(
            range.start.unwrap(),
            Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_custom_end_is_forced_to_end_of_day() {
        let range = resolve_period(
            noon(),
            Some("custom"),
            Some("2026-02-01"),
            Some("2026-02-10T09:15:00"),
        );
        let end = range.end.unwrap();
        assert_eq!(end.hour(), 23);
        assert_eq!(end.minute(), 59);
        assert_eq!(end.second(), 59);
        assert_eq!(end.timestamp_subsec_millis(), 999);
        assert_eq!(
            range.start.unwrap(),
            Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_custom_without_bounds_is_open_started() {
        let range = resolve_period(noon(), Some("custom"), None, None);
        assert!(range.start.is_none());
        assert_eq!(range.end.unwrap(), noon());
    }

    #[test]
    fn test_custom_with_garbage_bounds_treats_them_as_absent() {
        let range = resolve_period(noon(), Some("custom"), Some("last tuesday"), Some("n/a"));
        assert!(range.start.is_none());
        assert_eq!(range.end.unwrap(), noon());
    }

    #[test]
    fn test_custom_accepts_rfc3339() {
        let range = resolve_period(
            noon(),
            Some("custom"),
            Some("2026-01-05T08:00:00+02:00"),
            None,
        );
        assert_eq!(
            range.start.unwrap(),
            Utc.with_ymd_and_hms(2026, 1, 5, 6, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_live_feed_defaults_to_today() {
        let range = resolve_live_feed_period(noon(), None);
        assert_eq!(range.name, PeriodName::Today);
        assert_eq!(
            range.start.unwrap(),
            Utc.with_ymd_and_hms(2026, 3, 15, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_live_feed_accepts_other_names() {
        let range = resolve_live_feed_period(noon(), Some("all"));
        assert_eq!(range.name, PeriodName::All);
        assert!(range.start.is_none() && range.end.is_none());
    }

    #[test]
    fn test_range_bounds_convert_to_utc() {
        let range = resolve_period(noon(), Some("today"), None, None);
        assert_eq!(range.start_utc(), range.start);
        assert_eq!(range.end_utc().unwrap(), noon());
    }
}
