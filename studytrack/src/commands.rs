//! Command handlers: resolve the acting user, fetch log snapshots from the
//! store, and feed them to the statistics core.

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use studytrack_core::format::format_study_time;
use studytrack_core::stats::{
    aggregate_group, build_month_grid, distinct_topic_count, quick_stats_as_of, rank_of,
    CalendarMonth,
};
use studytrack_core::{Config, Database, StudyLog, User};

use crate::cli::{Command, GroupCommand, LogCommand, UserCommand};
use crate::render::{self, LeaderboardRow};
use crate::timer;

/// Topic recorded when none is given, mirroring the manual-entry default.
const DEFAULT_TOPIC: &str = "Study Session";

/// Dispatch a parsed command.
pub fn run(db: &Database, config: &Config, command: Command) -> Result<()> {
    match command {
        Command::User { command } => match command {
            UserCommand::Add {
                username,
                name,
                color,
            } => user_add(db, &username, name.as_deref(), color.as_deref()),
            UserCommand::List => user_list(db),
        },
        Command::Log { command } => match command {
            LogCommand::Add {
                user,
                minutes,
                topics,
                confidence,
                date,
            } => log_add(db, &user, minutes, topics, confidence, date),
            LogCommand::List { user, limit } => log_list(db, &user, limit),
            LogCommand::Delete { user, log_id } => log_delete(db, &user, &log_id),
        },
        Command::Timer {
            user,
            topics,
            confidence,
        } => timer_session(db, &user, topics, confidence),
        Command::Stats { user, json } => stats(db, &user, json),
        Command::Calendar {
            user,
            offset,
            group,
            json,
        } => calendar(db, &user, offset, group, json),
        Command::Group { command } => match command {
            GroupCommand::Create { name, user } => group_create(db, &name, &user),
            GroupCommand::Join { code, user } => group_join(db, config, &code, &user),
            GroupCommand::Leave { user } => group_leave(db, &user),
            GroupCommand::Show { user } => group_show(db, &user),
        },
        Command::Leaderboard { user, json } => leaderboard(db, &user, json),
    }
}

fn acting_user(db: &Database, username: &str) -> Result<User> {
    db.user_by_username(username)
        .with_context(|| format!("unknown user '{}' (create one with: studytrack user add {})", username, username))
}

// ============================================
// Users
// ============================================

fn user_add(db: &Database, username: &str, name: Option<&str>, color: Option<&str>) -> Result<()> {
    let user = db.create_user(username, name.unwrap_or(username), color)?;
    println!("Created user '{}' ({})", user.username, user.display_name);
    Ok(())
}

fn user_list(db: &Database) -> Result<()> {
    let users = db.list_users()?;
    if users.is_empty() {
        println!("No users yet.");
        return Ok(());
    }
    for user in users {
        let color = user.color_tag.as_deref().unwrap_or("-");
        println!("{:<16} {:<20} {}", user.username, user.display_name, color);
    }
    Ok(())
}

// ============================================
// Logs
// ============================================

fn log_add(
    db: &Database,
    username: &str,
    minutes: u32,
    topics: Vec<String>,
    confidence: u8,
    date: Option<NaiveDate>,
) -> Result<()> {
    let user = acting_user(db, username)?;
    let date = date.unwrap_or_else(|| Local::now().date_naive());

    let topics = if topics.is_empty() {
        vec![DEFAULT_TOPIC.to_string()]
    } else {
        topics
    };

    // Logs written while grouped carry the group id so the leaderboard
    // can scope totals to the group
    let group_id = db
        .group_for_user(&user.id)?
        .map(|g| g.id)
        .unwrap_or_default();

    let log = StudyLog::new(user.id.clone(), group_id, date, topics, minutes, confidence);
    db.insert_log(&log)?;

    println!(
        "Recorded {} on {} for {}",
        format_study_time(u64::from(minutes)),
        date,
        user.username
    );
    Ok(())
}

fn log_list(db: &Database, username: &str, limit: Option<usize>) -> Result<()> {
    let user = acting_user(db, username)?;
    let logs = db.logs_for_user(&user.id)?;

    if logs.is_empty() {
        println!("No study sessions recorded yet.");
        return Ok(());
    }

    // Newest first for display
    let shown = logs.iter().rev().take(limit.unwrap_or(usize::MAX));
    for log in shown {
        println!(
            "{}  {:>12}  confidence {:>2}  {:<30}  {}",
            log.date,
            format_study_time(u64::from(log.time_studied)),
            log.confidence,
            log.topics.join(", "),
            log.id
        );
    }
    Ok(())
}

fn log_delete(db: &Database, username: &str, log_id: &str) -> Result<()> {
    let user = acting_user(db, username)?;
    db.delete_log(log_id, &user.id)?;
    println!("Deleted log {}", log_id);
    Ok(())
}

fn timer_session(db: &Database, username: &str, topics: Vec<String>, confidence: u8) -> Result<()> {
    // Resolve the user before starting so a typo fails fast
    let user = acting_user(db, username)?;
    println!("Timer started for {}. Press Ctrl-C to finish.", user.username);

    let minutes = timer::run_timer()?;
    if minutes == 0 {
        println!("Session shorter than a minute; nothing recorded.");
        return Ok(());
    }

    log_add(db, username, minutes, topics, confidence, None)
}

// ============================================
// Stats and calendar
// ============================================

fn stats(db: &Database, username: &str, json: bool) -> Result<()> {
    let user = acting_user(db, username)?;
    let logs = db.logs_for_user(&user.id)?;
    let stats = quick_stats_as_of(&logs, Local::now().date_naive());

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        render::print_stats(&user.display_name, &stats);
    }
    Ok(())
}

fn calendar(db: &Database, username: &str, offset: i64, group: bool, json: bool) -> Result<()> {
    let user = acting_user(db, username)?;

    let logs = if group {
        let Some(current) = db.group_for_user(&user.id)? else {
            bail!("'{}' does not belong to a group", user.username);
        };
        db.logs_for_group(&current.id)?
    } else {
        db.logs_for_user(&user.id)?
    };

    let month = CalendarMonth::current().offset(offset);
    let grid = build_month_grid(&logs, month);

    if json {
        let payload = serde_json::json!({
            "month": month.display_name(),
            "cells": grid,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        render::print_calendar(month, &grid, Local::now().date_naive());
    }
    Ok(())
}

// ============================================
// Groups
// ============================================

fn group_create(db: &Database, name: &str, username: &str) -> Result<()> {
    let user = acting_user(db, username)?;
    let group = db.create_group(name, &user.id)?;
    println!("Created group \"{}\"", group.name);
    println!("Invite code: {}", group.invite_code);
    Ok(())
}

fn group_join(db: &Database, config: &Config, code: &str, username: &str) -> Result<()> {
    let user = acting_user(db, username)?;
    let group = db.join_group(code, &user.id, config.groups.max_members)?;
    println!("Joined group \"{}\"", group.name);
    Ok(())
}

fn group_leave(db: &Database, username: &str) -> Result<()> {
    let user = acting_user(db, username)?;
    db.leave_group(&user.id)?;
    println!("Left the group.");
    Ok(())
}

fn group_show(db: &Database, username: &str) -> Result<()> {
    let user = acting_user(db, username)?;
    let Some(group) = db.group_for_user(&user.id)? else {
        println!("'{}' does not belong to a group.", user.username);
        println!("Create one with: studytrack group create <name> --user {}", user.username);
        return Ok(());
    };

    println!("Group: {}", group.name);
    println!("Invite code: {}", group.invite_code);
    println!("Members:");
    for member in db.group_members(&group.id)? {
        let color = member.color_tag.as_deref().unwrap_or("-");
        println!("  {:<20} {}", member.display_name, color);
    }
    Ok(())
}

// ============================================
// Leaderboard
// ============================================

fn leaderboard(db: &Database, username: &str, json: bool) -> Result<()> {
    let user = acting_user(db, username)?;
    let Some(group) = db.group_for_user(&user.id)? else {
        bail!("'{}' does not belong to a group", user.username);
    };

    let today = Local::now().date_naive();
    // Full member histories: totals are group-scoped, streaks are not
    let logs = db.logs_for_group_members(&group.id)?;
    let board = aggregate_group(&logs, &group.id, today);
    let own_rank = rank_of(&board, &user.id);

    let members = db.group_members(&group.id)?;
    let display_name = |user_id: &str| -> String {
        members
            .iter()
            .find(|m| m.id == user_id)
            .map(|m| m.display_name.clone())
            .unwrap_or_else(|| user_id.to_string())
    };

    let rows: Vec<LeaderboardRow> = board
        .iter()
        .enumerate()
        .map(|(i, e)| LeaderboardRow {
            rank: i + 1,
            user_id: e.user_id.clone(),
            display_name: display_name(&e.user_id),
            total_minutes: e.total_minutes,
            streak: e.streak,
            topic_count: distinct_topic_count(&logs, &e.user_id),
        })
        .collect();

    if json {
        let payload = serde_json::json!({
            "group": group.name,
            "rank": own_rank,
            "entries": rows,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        render::print_leaderboard(&group.name, &rows, own_rank);
    }
    Ok(())
}
