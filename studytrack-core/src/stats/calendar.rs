//! Month grid generation for the activity heatmap.
//!
//! A grid always spans whole weeks: leading cells come from the previous
//! month, trailing cells from the next, so the length is a multiple of 7
//! and the first column is always Sunday.

use std::collections::HashMap;

use chrono::{Datelike, Duration, Local, NaiveDate};
use serde::Serialize;

use crate::types::StudyLog;

/// A calendar month addressed by year and 1-based month number.
///
/// Construction never rejects out-of-range months; any signed 0-based
/// month index normalizes by calendar overflow, so navigating 13 months
/// forward from December lands in January two years later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarMonth {
    /// Calendar year
    pub year: i32,
    /// Month number, 1 (January) through 12 (December)
    pub month: u32,
}

impl CalendarMonth {
    /// Build from a year and a signed 0-based month index, normalizing
    /// overflow/underflow into adjacent years.
    pub fn from_offset(year: i32, month0: i64) -> Self {
        let total = i64::from(year) * 12 + month0;
        Self {
            year: total.div_euclid(12) as i32,
            month: total.rem_euclid(12) as u32 + 1,
        }
    }

    /// The month containing the local calendar date.
    pub fn current() -> Self {
        let today = Local::now().date_naive();
        Self {
            year: today.year(),
            month: today.month(),
        }
    }

    /// Shift by `n` months (negative for past months).
    pub fn offset(self, n: i64) -> Self {
        Self::from_offset(self.year, i64::from(self.month) - 1 + n)
    }

    /// First day of the month.
    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .expect("normalized month is always valid")
    }

    /// Last day of the month.
    pub fn last_day(&self) -> NaiveDate {
        self.offset(1).first_day().pred_opt().expect("month has a last day")
    }

    /// Number of days in the month.
    pub fn days_in_month(&self) -> u32 {
        self.last_day().day()
    }

    /// Whether `date` falls inside this month.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Display name, e.g. "May 2025".
    pub fn display_name(&self) -> String {
        let month_name = match self.month {
            1 => "January",
            2 => "February",
            3 => "March",
            4 => "April",
            5 => "May",
            6 => "June",
            7 => "July",
            8 => "August",
            9 => "September",
            10 => "October",
            11 => "November",
            12 => "December",
            _ => "Unknown",
        };
        format!("{} {}", month_name, self.year)
    }
}

/// One day-slot in the calendar view, possibly from an adjacent month.
#[derive(Debug, Clone, Serialize)]
pub struct DayCell {
    /// The cell's calendar date
    pub date: NaiveDate,
    /// Sum of minutes over all logs dated on this cell's date
    pub study_minutes: u64,
    /// Whether the cell belongs to the target month (leading/trailing
    /// cells from adjacent months carry `false`)
    pub in_current_month: bool,
}

/// Build the month grid: leading previous-month cells to align the first
/// weekday column (Sunday first), one cell per day of the month, then
/// next-month padding until the length is a multiple of 7.
///
/// Every cell carries the summed minutes for its date, adjacent-month
/// cells included.
pub fn build_month_grid(logs: &[StudyLog], month: CalendarMonth) -> Vec<DayCell> {
    let mut minutes_by_date: HashMap<NaiveDate, u64> = HashMap::new();
    for log in logs {
        *minutes_by_date.entry(log.date).or_insert(0) += u64::from(log.time_studied);
    }

    let first = month.first_day();
    let leading = first.weekday().num_days_from_sunday();
    let body = leading + month.days_in_month();
    // Pad the final week; none when the body already ends on Saturday
    let total = body + (7 - body % 7) % 7;

    let start = first - Duration::days(i64::from(leading));
    (0..total)
        .map(|i| {
            let date = start + Duration::days(i64::from(i));
            DayCell {
                date,
                study_minutes: minutes_by_date.get(&date).copied().unwrap_or(0),
                in_current_month: month.contains(date),
            }
        })
        .collect()
}

/// Study intensity bucket for one grid cell.
///
/// Lower bounds are half-open: exactly 30 minutes is Medium, 60 is High,
/// 120 is Max.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Intensity {
    None,
    Low,
    Medium,
    High,
    Max,
}

impl Intensity {
    /// Classify a minute count.
    pub fn from_minutes(minutes: u64) -> Self {
        match minutes {
            0 => Intensity::None,
            1..=29 => Intensity::Low,
            30..=59 => Intensity::Medium,
            60..=119 => Intensity::High,
            _ => Intensity::Max,
        }
    }

    /// Identifier used in exports and style lookups.
    pub fn as_str(&self) -> &'static str {
        match self {
            Intensity::None => "none",
            Intensity::Low => "low",
            Intensity::Medium => "medium",
            Intensity::High => "high",
            Intensity::Max => "max",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn log(date: NaiveDate, minutes: u32) -> StudyLog {
        StudyLog::new("u1", "", date, vec![], minutes, 5)
    }

    #[test]
    fn test_month_offset_normalization() {
        // 13 months forward from December rolls into January, year + 2
        let dec = CalendarMonth { year: 2025, month: 12 };
        assert_eq!(dec.offset(13), CalendarMonth { year: 2027, month: 1 });

        // Backward across the year boundary
        let jan = CalendarMonth { year: 2025, month: 1 };
        assert_eq!(jan.offset(-1), CalendarMonth { year: 2024, month: 12 });

        // Wildly out-of-range raw indexes normalize instead of erroring
        assert_eq!(
            CalendarMonth::from_offset(2025, 25),
            CalendarMonth { year: 2027, month: 2 }
        );
        assert_eq!(
            CalendarMonth::from_offset(2025, -1),
            CalendarMonth { year: 2024, month: 12 }
        );
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(CalendarMonth { year: 2025, month: 5 }.days_in_month(), 31);
        assert_eq!(CalendarMonth { year: 2025, month: 2 }.days_in_month(), 28);
        assert_eq!(CalendarMonth { year: 2024, month: 2 }.days_in_month(), 29);
    }

    #[test]
    fn test_empty_grid_for_may_2025() {
        // May 1, 2025 is a Thursday: 4 leading April cells, 31 May cells,
        // 35 total, already a multiple of 7, so no June padding.
        let grid = build_month_grid(&[], CalendarMonth { year: 2025, month: 5 });

        assert_eq!(grid.len(), 35);
        assert_eq!(grid[0].date, date(2025, 4, 27));
        assert!(!grid[0].in_current_month);
        assert_eq!(grid[4].date, date(2025, 5, 1));
        assert!(grid[4].in_current_month);
        assert_eq!(grid[34].date, date(2025, 5, 31));
        assert!(grid.iter().all(|c| c.study_minutes == 0));
    }

    #[test]
    fn test_grid_length_is_multiple_of_seven() {
        for month in 1..=12 {
            for year in [2024, 2025, 2026] {
                let grid = build_month_grid(&[], CalendarMonth { year, month });
                assert_eq!(grid.len() % 7, 0, "{}-{}", year, month);
            }
        }
    }

    #[test]
    fn test_grid_pads_with_next_month() {
        // June 1, 2025 is a Sunday; June has 30 days, so the grid needs
        // 5 trailing July cells to complete the final week.
        let grid = build_month_grid(&[], CalendarMonth { year: 2025, month: 6 });
        assert_eq!(grid.len(), 35);
        assert_eq!(grid[0].date, date(2025, 6, 1));
        assert_eq!(grid[30].date, date(2025, 7, 1));
        assert!(!grid[30].in_current_month);
    }

    #[test]
    fn test_grid_sums_minutes_per_cell() {
        let logs = vec![
            log(date(2025, 5, 10), 30),
            log(date(2025, 5, 10), 45), // same-day entries sum
            log(date(2025, 4, 28), 20), // adjacent-month cell still carries minutes
        ];
        let grid = build_month_grid(&logs, CalendarMonth { year: 2025, month: 5 });

        let tenth = grid.iter().find(|c| c.date == date(2025, 5, 10)).unwrap();
        assert_eq!(tenth.study_minutes, 75);

        let april = grid.iter().find(|c| c.date == date(2025, 4, 28)).unwrap();
        assert_eq!(april.study_minutes, 20);
        assert!(!april.in_current_month);
    }

    #[test]
    fn test_in_month_cells_account_for_all_month_minutes() {
        let month = CalendarMonth { year: 2025, month: 5 };
        let logs = vec![
            log(date(2025, 5, 3), 30),
            log(date(2025, 5, 3), 15),
            log(date(2025, 5, 21), 60),
            log(date(2025, 4, 30), 45), // outside the month
            log(date(2025, 6, 2), 10),  // outside the month
        ];

        let grid = build_month_grid(&logs, month);
        let in_month_sum: u64 = grid
            .iter()
            .filter(|c| c.in_current_month)
            .map(|c| c.study_minutes)
            .sum();
        let expected: u64 = logs
            .iter()
            .filter(|l| month.contains(l.date))
            .map(|l| u64::from(l.time_studied))
            .sum();

        assert_eq!(in_month_sum, expected);
    }

    #[test]
    fn test_intensity_boundaries() {
        assert_eq!(Intensity::from_minutes(0), Intensity::None);
        assert_eq!(Intensity::from_minutes(1), Intensity::Low);
        assert_eq!(Intensity::from_minutes(29), Intensity::Low);
        assert_eq!(Intensity::from_minutes(30), Intensity::Medium);
        assert_eq!(Intensity::from_minutes(59), Intensity::Medium);
        assert_eq!(Intensity::from_minutes(60), Intensity::High);
        assert_eq!(Intensity::from_minutes(119), Intensity::High);
        assert_eq!(Intensity::from_minutes(120), Intensity::Max);
        assert_eq!(Intensity::from_minutes(500), Intensity::Max);
    }

    #[test]
    fn test_display_name() {
        assert_eq!(
            CalendarMonth { year: 2025, month: 5 }.display_name(),
            "May 2025"
        );
    }
}
