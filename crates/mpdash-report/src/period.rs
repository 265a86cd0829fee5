//! Fixed reporting windows and timestamp parsing.
//!
//! A window is anchored on a calendar "today". Exact-day windows hold only
//! the records of `today - lower_bound_days`; all others hold every record
//! on or after that day, so they always include today.

use chrono::{DateTime, Days, NaiveDate, NaiveDateTime};
use mpdash_core::{NormalizedRecord, RedemptionRecord};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PeriodWindow {
    pub key: &'static str,
    pub label: &'static str,
    #[serde(skip)]
    pub lower_bound_days: u64,
    #[serde(skip)]
    pub exact_day: bool,
}

/// The five windows, in output order.
pub const WINDOWS: [PeriodWindow; 5] = [
    PeriodWindow {
        key: "today",
        label: "Сегодня",
        lower_bound_days: 0,
        exact_day: false,
    },
    PeriodWindow {
        key: "yesterday",
        label: "Вчера",
        lower_bound_days: 1,
        exact_day: true,
    },
    PeriodWindow {
        key: "days_3",
        label: "3 дня",
        lower_bound_days: 2,
        exact_day: false,
    },
    PeriodWindow {
        key: "days_7",
        label: "7 дней",
        lower_bound_days: 6,
        exact_day: false,
    },
    PeriodWindow {
        key: "days_30",
        label: "30 дней",
        lower_bound_days: 29,
        exact_day: false,
    },
];

impl PeriodWindow {
    /// First calendar day covered by the window.
    #[must_use]
    pub fn start(&self, today: NaiveDate) -> NaiveDate {
        today
            .checked_sub_days(Days::new(self.lower_bound_days))
            .unwrap_or(NaiveDate::MIN)
    }

    #[must_use]
    pub fn contains(&self, date: NaiveDate, today: NaiveDate) -> bool {
        let start = self.start(today);
        if self.exact_day {
            date == start
        } else {
            date >= start
        }
    }
}

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parses a marketplace timestamp into the calendar date it was written with.
///
/// Accepts RFC 3339 (`Z` or a numeric offset; the offset is not applied),
/// naive date-times with `T` or a space separator and optional fractional
/// seconds, and bare `YYYY-MM-DD`. Returns `None` for anything else.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local().date());
    }

    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.date())
        .or_else(|| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok())
}

/// Records that carry an optional raw timestamp.
pub trait Timestamped {
    fn occurred_at(&self) -> Option<&str>;
}

impl Timestamped for NormalizedRecord {
    fn occurred_at(&self) -> Option<&str> {
        self.occurred_at.as_deref()
    }
}

impl Timestamped for RedemptionRecord {
    fn occurred_at(&self) -> Option<&str> {
        self.occurred_at.as_deref()
    }
}

/// Returns the records dated inside `window`, preserving input order.
///
/// Records with an absent or unparsable timestamp are left out.
pub fn filter<'a, T: Timestamped>(
    records: &'a [T],
    window: &PeriodWindow,
    today: NaiveDate,
) -> Vec<&'a T> {
    records
        .iter()
        .filter(|record| {
            let Some(raw) = record.occurred_at() else {
                return false;
            };
            match parse_timestamp(raw) {
                Some(date) => window.contains(date, today),
                None => {
                    tracing::debug!(timestamp = raw, "unparsable timestamp; record skipped");
                    false
                }
            }
        })
        .collect()
}
