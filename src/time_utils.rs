// SPDX-License-Identifier: MIT

//! Shared helpers for date/time formatting and plan anchoring.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};

/// Format a local timestamp as ISO 8601 with second precision and no
/// offset, the form intervals.icu expects in `start_date_local`.
pub fn format_local_iso(dt: NaiveDateTime) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S").to_string()
}

/// Monday of the calendar week containing `date`.
pub fn monday_of_week(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// Monday of week 1 of the plan: the Monday of race week, minus
/// `plan_weeks - 1` whole weeks.
pub fn plan_start_monday(race_date: NaiveDate, plan_weeks: i64) -> NaiveDate {
    monday_of_week(race_date) - Duration::weeks(plan_weeks - 1)
}
