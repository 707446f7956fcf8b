//! Time-bucketed totals and streak computation.
//!
//! The streak walks backward from `today`, one calendar day at a time, and
//! stops at the first day with no log. A day with no log for `today` itself
//! means the streak is 0 outright, even if yesterday was studied. Duplicate
//! dates count once (set semantics).

use std::collections::BTreeSet;

use chrono::{Datelike, Duration, Local, NaiveDate};
use serde::Serialize;

use crate::types::StudyLog;

/// Totals over an inclusive date range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RangeTotals {
    /// Sum of minutes studied over matching logs
    pub total_minutes: u64,
    /// Number of matching logs
    pub count: usize,
}

/// Today/week/month totals plus the current streak.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct QuickStats {
    /// Totals for `[today, today]`
    pub today: RangeTotals,
    /// Totals for `[most recent Sunday, today]`
    pub week: RangeTotals,
    /// Totals for `[first of month, today]`
    pub month: RangeTotals,
    /// Consecutive days studied, ending today
    pub streak: u32,
}

/// Sum minutes and count logs whose date falls in `[start, end]`, inclusive
/// on both bounds.
pub fn totals_for_range(logs: &[StudyLog], start: NaiveDate, end: NaiveDate) -> RangeTotals {
    let mut totals = RangeTotals::default();
    for log in logs {
        if log.date >= start && log.date <= end {
            totals.total_minutes += u64::from(log.time_studied);
            totals.count += 1;
        }
    }
    totals
}

/// The most recent Sunday on or before `today`.
pub fn start_of_week(today: NaiveDate) -> NaiveDate {
    today - Duration::days(i64::from(today.weekday().num_days_from_sunday()))
}

/// The first day of `today`'s month.
pub fn start_of_month(today: NaiveDate) -> NaiveDate {
    today.with_day(1).expect("day 1 exists in every month")
}

/// Streak over an arbitrary collection of dates (duplicates collapse).
///
/// Returns 0 when `today` itself is absent; otherwise the number of
/// consecutive days ending at `today` that are all present.
pub fn streak_for_dates(dates: impl IntoIterator<Item = NaiveDate>, today: NaiveDate) -> u32 {
    let days: BTreeSet<NaiveDate> = dates.into_iter().collect();

    if !days.contains(&today) {
        return 0;
    }

    let mut streak = 0;
    let mut day = today;
    while days.contains(&day) {
        streak += 1;
        let Some(prev) = day.pred_opt() else {
            break;
        };
        day = prev;
    }
    streak
}

/// Consecutive-day streak over a user's logs, as of `today`.
pub fn streak_as_of(logs: &[StudyLog], today: NaiveDate) -> u32 {
    streak_for_dates(logs.iter().map(|log| log.date), today)
}

/// Compose today/week/month totals and the streak, as of `today`.
pub fn quick_stats_as_of(logs: &[StudyLog], today: NaiveDate) -> QuickStats {
    QuickStats {
        today: totals_for_range(logs, today, today),
        week: totals_for_range(logs, start_of_week(today), today),
        month: totals_for_range(logs, start_of_month(today), today),
        streak: streak_as_of(logs, today),
    }
}

/// [`quick_stats_as_of`] using the local calendar date.
pub fn quick_stats(logs: &[StudyLog]) -> QuickStats {
    quick_stats_as_of(logs, Local::now().date_naive())
}
