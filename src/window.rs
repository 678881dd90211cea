//! # Date Window Evaluator
//! Decides whether a posting timestamp falls inside the selected date window.
//!
//! `now` is passed in rather than read from the clock so one filter pass
//! judges every posting against the same instant. Calendar arithmetic is UTC.

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Length of the `last10` window.
pub const RECENT_WINDOW_DAYS: i64 = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DatePreset {
    #[default]
    All,
    Last10,
    LastMonth,
    ThisYear,
    Custom,
}

impl DatePreset {
    /// Lenient parse for query strings; unknown values yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" | "" => Some(Self::All),
            "last10" => Some(Self::Last10),
            "lastmonth" => Some(Self::LastMonth),
            "thisyear" => Some(Self::ThisYear),
            "custom" => Some(Self::Custom),
            _ => None,
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            Self::All => "any time",
            Self::Last10 => "last 10 days",
            Self::LastMonth => "last month",
            Self::ThisYear => "this year",
            Self::Custom => "custom range",
        }
    }
}

/// Explicit calendar range as entered by the user (`YYYY-MM-DD`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomRange {
    pub start: Option<String>,
    pub end: Option<String>,
}

impl CustomRange {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: Some(start.into()),
            end: Some(end.into()),
        }
    }

    /// Inclusive millisecond bounds, or `None` unless both dates parse.
    /// The end bound covers the whole end day.
    pub fn bounds_ms(&self) -> Option<(i64, i64)> {
        let start = parse_calendar_date(self.start.as_deref()?)?;
        let end = parse_calendar_date(self.end.as_deref()?)?;
        let lo = start.and_hms_milli_opt(0, 0, 0, 0)?.and_utc();
        let hi = end.and_hms_milli_opt(23, 59, 59, 999)?.and_utc();
        Some((lo.timestamp_millis(), hi.timestamp_millis()))
    }
}

fn parse_calendar_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// Is `ts_ms` inside the window described by `preset` (and `custom`)?
///
/// A `custom` preset without two parseable bounds passes everything. That is
/// how the listing UI has always behaved with a half-filled range.
pub fn in_window(
    ts_ms: i64,
    preset: DatePreset,
    custom: Option<&CustomRange>,
    now: DateTime<Utc>,
) -> bool {
    match preset {
        DatePreset::All => true,
        DatePreset::Last10 => ts_ms >= (now - Duration::days(RECENT_WINDOW_DAYS)).timestamp_millis(),
        DatePreset::LastMonth => ts_ms >= one_month_before(now),
        DatePreset::ThisYear => ts_ms >= start_of_year(now),
        DatePreset::Custom => match custom.and_then(CustomRange::bounds_ms) {
            Some((lo, hi)) => lo <= ts_ms && ts_ms <= hi,
            None => true,
        },
    }
}

/// Same day-of-month one month earlier; chrono clamps days the earlier month
/// lacks (Mar 31 -> Feb 28/29).
fn one_month_before(now: DateTime<Utc>) -> i64 {
    now.checked_sub_months(Months::new(1))
        .map(|dt| dt.timestamp_millis())
        .unwrap_or(i64::MIN)
}

fn start_of_year(now: DateTime<Utc>) -> i64 {
    NaiveDate::from_ymd_opt(now.year(), 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().timestamp_millis())
        .unwrap_or(i64::MIN)
}
