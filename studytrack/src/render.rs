//! Plain-text rendering for reports.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use studytrack_core::format::format_study_time;
use studytrack_core::stats::{CalendarMonth, DayCell, Intensity, QuickStats};

/// One resolved leaderboard row, ready for display or JSON export.
#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardRow {
    pub rank: usize,
    pub user_id: String,
    pub display_name: String,
    pub total_minutes: u64,
    pub streak: u32,
    pub topic_count: usize,
}

/// Print a boxed section header.
pub fn print_header(title: &str) {
    println!();
    println!("╭{}╮", "─".repeat(46));
    println!("│{:^46}│", title);
    println!("╰{}╯", "─".repeat(46));
    println!();
}

pub fn print_stats(display_name: &str, stats: &QuickStats) {
    print_header(&format!("Study stats — {}", display_name));
    println!(
        "   Today:      {:<16} ({} sessions)",
        format_study_time(stats.today.total_minutes),
        stats.today.count
    );
    println!(
        "   This week:  {:<16} ({} sessions)",
        format_study_time(stats.week.total_minutes),
        stats.week.count
    );
    println!(
        "   This month: {:<16} ({} sessions)",
        format_study_time(stats.month.total_minutes),
        stats.month.count
    );
    println!("   Streak:     {} day(s)", stats.streak);
    println!();
}

/// Glyph for a cell's study intensity.
fn intensity_glyph(intensity: Intensity) -> char {
    match intensity {
        Intensity::None => '·',
        Intensity::Low => '░',
        Intensity::Medium => '▒',
        Intensity::High => '▓',
        Intensity::Max => '█',
    }
}

pub fn print_calendar(month: CalendarMonth, grid: &[DayCell], today: NaiveDate) {
    print_header(&month.display_name());
    println!("    Su  Mo  Tu  We  Th  Fr  Sa");

    for week in grid.chunks(7) {
        let mut line = String::from("   ");
        for cell in week {
            let glyph = intensity_glyph(Intensity::from_minutes(cell.study_minutes));
            let marker = if cell.date == today { '*' } else { ' ' };
            if cell.in_current_month {
                line.push_str(&format!("{}{:2}{}", glyph, cell.date.day(), marker));
            } else {
                // Adjacent-month days are dimmed to bare glyphs
                line.push_str(&format!("{}  {}", glyph, marker));
            }
        }
        println!("{}", line);
    }

    println!();
    println!("   · none   ░ <30m   ▒ <1h   ▓ <2h   █ ≥2h   * today");

    let studied: u64 = grid
        .iter()
        .filter(|c| c.in_current_month)
        .map(|c| c.study_minutes)
        .sum();
    println!("   Total this month: {}", format_study_time(studied));
    println!();
}

pub fn print_leaderboard(group_name: &str, rows: &[LeaderboardRow], own_rank: usize) {
    print_header(&format!("Leaderboard — {}", group_name));

    if rows.is_empty() {
        println!("   No study sessions recorded in this group yet.");
        println!();
        return;
    }

    let max_minutes = rows.iter().map(|r| r.total_minutes).max().unwrap_or(0);

    for row in rows {
        println!(
            "   {:>2}. {:<16} {:>12}   {:>2} day streak   {:>2} topics",
            row.rank,
            row.display_name,
            format_study_time(row.total_minutes),
            row.streak,
            row.topic_count
        );

        // Proportional bar against the leader
        let width = if max_minutes == 0 {
            0
        } else {
            ((row.total_minutes * 24) / max_minutes) as usize
        };
        println!("       {}", "■".repeat(width.max(1)));
    }

    println!();
    println!("   Your rank: #{}", own_rank);
    println!();
}
