//! Per-user rollups and ranking within a group.
//!
//! Totals are summed over the group's logs only, but each member's streak
//! is computed over their full log history: a streak is a property of the
//! user, not of the group they happen to be ranked in. Callers therefore
//! pass a log snapshot that includes every member's complete history (see
//! [`crate::Database::logs_for_group_members`]).

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use serde::Serialize;

use super::aggregate::streak_for_dates;
use crate::types::StudyLog;

/// Per-user rollup of total study minutes and streak within a group.
#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardEntry {
    /// User id
    pub user_id: String,
    /// Sum of minutes over the user's logs in the group
    pub total_minutes: u64,
    /// Consecutive-day streak over the user's full history
    pub streak: u32,
}

/// Aggregate `logs` for one group, as of `today`.
///
/// Filters by `group_id`, groups by user, sums minutes, and attaches each
/// user's global streak. Sorted by total minutes descending; ties break by
/// user id ascending so the ordering is reproducible.
pub fn aggregate_group(logs: &[StudyLog], group_id: &str, today: NaiveDate) -> Vec<LeaderboardEntry> {
    let mut totals: BTreeMap<&str, u64> = BTreeMap::new();
    for log in logs {
        if log.group_id == group_id {
            *totals.entry(log.user_id.as_str()).or_insert(0) += u64::from(log.time_studied);
        }
    }

    let mut entries: Vec<LeaderboardEntry> = totals
        .into_iter()
        .map(|(user_id, total_minutes)| LeaderboardEntry {
            user_id: user_id.to_string(),
            total_minutes,
            streak: streak_for_dates(
                logs.iter()
                    .filter(|l| l.user_id == user_id)
                    .map(|l| l.date),
                today,
            ),
        })
        .collect();

    entries.sort_by(|a, b| {
        b.total_minutes
            .cmp(&a.total_minutes)
            .then_with(|| a.user_id.cmp(&b.user_id))
    });
    entries
}

/// 1-indexed rank of `user_id` in an aggregate ordering.
///
/// A user absent from the aggregates ranks one past the known members, so
/// an empty board yields rank 1.
pub fn rank_of(entries: &[LeaderboardEntry], user_id: &str) -> usize {
    entries
        .iter()
        .position(|e| e.user_id == user_id)
        .map(|i| i + 1)
        .unwrap_or(entries.len() + 1)
}

/// Count of distinct topic strings across a user's logs.
///
/// Comparison is exact: case-sensitive, no trimming.
pub fn distinct_topic_count(logs: &[StudyLog], user_id: &str) -> usize {
    logs.iter()
        .filter(|l| l.user_id == user_id)
        .flat_map(|l| l.topics.iter())
        .collect::<HashSet<_>>()
        .len()
}
