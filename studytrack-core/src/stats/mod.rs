//! Statistics over study logs
//!
//! Three cooperating pieces of pure logic, all deterministic given their
//! inputs:
//! - [`aggregate`]: time-bucketed totals and the consecutive-day streak
//! - [`calendar`]: month grid generation for the activity heatmap
//! - [`leaderboard`]: per-user rollups and ranking within a group
//!
//! Every function here takes an explicit `&[StudyLog]` snapshot; nothing
//! in this module touches storage, holds state, or performs I/O. Callers
//! (the CLI, tests) fetch logs from [`crate::Database`] and pass them in.
//!
//! Dates are plain calendar dates in the caller's local calendar; there is
//! no timezone normalization. This is a deliberate simplification: a "day"
//! is whatever the caller's clock says it is.

pub mod aggregate;
pub mod calendar;
pub mod leaderboard;

pub use aggregate::{
    quick_stats, quick_stats_as_of, start_of_month, start_of_week, streak_as_of,
    streak_for_dates, totals_for_range, QuickStats, RangeTotals,
};
pub use calendar::{build_month_grid, CalendarMonth, DayCell, Intensity};
pub use leaderboard::{aggregate_group, distinct_topic_count, rank_of, LeaderboardEntry};
