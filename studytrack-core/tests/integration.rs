//! Integration tests for the studytrack storage and statistics flow
//!
//! These tests run the full path a frontend uses: create users and groups,
//! append logs through the store, then feed the returned snapshots to the
//! pure statistics core.

use chrono::NaiveDate;
use studytrack_core::stats::{
    aggregate_group, build_month_grid, distinct_topic_count, quick_stats_as_of, rank_of,
    CalendarMonth, Intensity,
};
use studytrack_core::{Database, Error, StudyLog};
use tempfile::TempDir;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn open_db() -> Database {
    let db = Database::open_in_memory().expect("open in-memory db");
    db.migrate().expect("migrate schema");
    db
}

fn add_log(db: &Database, user_id: &str, group_id: &str, d: NaiveDate, minutes: u32, topics: &[&str]) {
    let log = StudyLog::new(
        user_id,
        group_id,
        d,
        topics.iter().map(|t| t.to_string()).collect(),
        minutes,
        7,
    );
    db.insert_log(&log).expect("insert log");
}

// ============================================
// Storage on disk
// ============================================

#[test]
fn test_database_persists_across_reopen() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("data.db");

    {
        let db = Database::open(&path).unwrap();
        db.migrate().unwrap();
        let alice = db.create_user("alice", "Alice", None).unwrap();
        add_log(&db, &alice.id, "", date(2025, 4, 30), 45, &["Rust"]);
    }

    let db = Database::open(&path).unwrap();
    db.migrate().unwrap();
    let alice = db.user_by_username("alice").unwrap();
    let logs = db.logs_for_user(&alice.id).unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].time_studied, 45);
}

// ============================================
// Quick stats over stored logs
// ============================================

#[test]
fn test_quick_stats_from_store() {
    let db = open_db();
    let alice = db.create_user("alice", "Alice", None).unwrap();

    // Wed 2025-04-30 is "today"; the week started Sunday 2025-04-27
    let today = date(2025, 4, 30);
    add_log(&db, &alice.id, "", today, 40, &["Rust"]);
    add_log(&db, &alice.id, "", today, 20, &["Rust"]); // appended, not merged
    add_log(&db, &alice.id, "", date(2025, 4, 29), 30, &["SQL"]);
    add_log(&db, &alice.id, "", date(2025, 4, 27), 25, &[]); // exactly on week start
    add_log(&db, &alice.id, "", date(2025, 4, 2), 60, &[]);
    add_log(&db, &alice.id, "", date(2025, 3, 30), 90, &[]); // previous month

    let logs = db.logs_for_user(&alice.id).unwrap();
    let stats = quick_stats_as_of(&logs, today);

    assert_eq!(stats.today.total_minutes, 60);
    assert_eq!(stats.today.count, 2);
    assert_eq!(stats.week.total_minutes, 115); // 40 + 20 + 30 + 25
    assert_eq!(stats.month.total_minutes, 175);
    assert_eq!(stats.streak, 2); // 4/30 and 4/29, gap on 4/28
}

#[test]
fn test_quick_stats_empty_user() {
    let db = open_db();
    let alice = db.create_user("alice", "Alice", None).unwrap();

    let logs = db.logs_for_user(&alice.id).unwrap();
    let stats = quick_stats_as_of(&logs, date(2025, 4, 30));

    assert_eq!(stats.today.total_minutes, 0);
    assert_eq!(stats.week.count, 0);
    assert_eq!(stats.month.count, 0);
    assert_eq!(stats.streak, 0);
}

// ============================================
// Calendar grid over stored logs
// ============================================

#[test]
fn test_calendar_grid_from_store() {
    let db = open_db();
    let alice = db.create_user("alice", "Alice", None).unwrap();

    add_log(&db, &alice.id, "", date(2025, 5, 10), 30, &[]);
    add_log(&db, &alice.id, "", date(2025, 5, 10), 45, &[]);
    add_log(&db, &alice.id, "", date(2025, 4, 28), 20, &[]); // leading April cell

    let logs = db.logs_for_user(&alice.id).unwrap();
    let month = CalendarMonth { year: 2025, month: 5 };
    let grid = build_month_grid(&logs, month);

    assert_eq!(grid.len() % 7, 0);

    let tenth = grid.iter().find(|c| c.date == date(2025, 5, 10)).unwrap();
    assert_eq!(tenth.study_minutes, 75);
    assert_eq!(Intensity::from_minutes(tenth.study_minutes), Intensity::High);

    // The in-month total matches the month's logs exactly; the leading
    // April cell carries minutes but is excluded from that sum.
    let in_month: u64 = grid
        .iter()
        .filter(|c| c.in_current_month)
        .map(|c| c.study_minutes)
        .sum();
    assert_eq!(in_month, 75);

    let april = grid.iter().find(|c| c.date == date(2025, 4, 28)).unwrap();
    assert_eq!(april.study_minutes, 20);
    assert!(!april.in_current_month);
}

// ============================================
// Group leaderboard end to end
// ============================================

#[test]
fn test_leaderboard_flow() {
    let db = open_db();
    let today = date(2025, 4, 30);

    let alice = db.create_user("alice", "Alice", None).unwrap();
    let bob = db.create_user("bob", "Bob", None).unwrap();
    let group = db.create_group("Study Champions", &alice.id).unwrap();
    db.join_group(&group.invite_code, &bob.id, 6).unwrap();

    add_log(&db, &alice.id, &group.id, today, 100, &["Rust", "SQL"]);
    add_log(&db, &bob.id, &group.id, today, 150, &["Algebra"]);
    // Bob also studied yesterday outside the group; his streak counts it
    add_log(&db, &bob.id, "", date(2025, 4, 29), 10, &["Algebra"]);

    let logs = db.logs_for_group_members(&group.id).unwrap();
    let board = aggregate_group(&logs, &group.id, today);

    assert_eq!(board.len(), 2);
    assert_eq!(board[0].user_id, bob.id);
    assert_eq!(board[0].total_minutes, 150);
    assert_eq!(board[0].streak, 2);
    assert_eq!(board[1].user_id, alice.id);
    assert_eq!(board[1].streak, 1);

    assert_eq!(rank_of(&board, &bob.id), 1);
    assert_eq!(rank_of(&board, &alice.id), 2);
    assert_eq!(rank_of(&board, "stranger"), 3);

    assert_eq!(distinct_topic_count(&logs, &alice.id), 2);
    assert_eq!(distinct_topic_count(&logs, &bob.id), 1);
}

#[test]
fn test_leaderboard_empty_group() {
    let db = open_db();
    let alice = db.create_user("alice", "Alice", None).unwrap();
    let group = db.create_group("Quiet", &alice.id).unwrap();

    let logs = db.logs_for_group_members(&group.id).unwrap();
    let board = aggregate_group(&logs, &group.id, date(2025, 4, 30));

    assert!(board.is_empty());
    assert_eq!(rank_of(&board, &alice.id), 1);
}

// ============================================
// Group membership rules
// ============================================

#[test]
fn test_group_full_and_rejoin_rules() {
    let db = open_db();
    let owner = db.create_user("owner", "Owner", None).unwrap();
    let group = db.create_group("Capped", &owner.id).unwrap();

    // Fill the remaining five slots of a six-member group
    for i in 0..5 {
        let user = db
            .create_user(&format!("member{}", i), "Member", None)
            .unwrap();
        db.join_group(&group.invite_code, &user.id, 6).unwrap();
    }
    assert_eq!(db.group_members(&group.id).unwrap().len(), 6);

    let late = db.create_user("late", "Late", None).unwrap();
    assert!(matches!(
        db.join_group(&group.invite_code, &late.id, 6),
        Err(Error::GroupFull(_))
    ));

    // Leaving frees a slot
    db.leave_group(&owner.id).unwrap();
    db.join_group(&group.invite_code, &late.id, 6).unwrap();
    assert_eq!(db.group_members(&group.id).unwrap().len(), 6);
}
