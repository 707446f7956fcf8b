//! Command-line interface definitions.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "studytrack")]
#[command(about = "Collaborative study tracker")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage users
    User {
        #[command(subcommand)]
        command: UserCommand,
    },

    /// Record and manage study logs
    Log {
        #[command(subcommand)]
        command: LogCommand,
    },

    /// Run an interactive study timer; Ctrl-C stops and records the session
    Timer {
        /// Acting user (username)
        #[arg(long)]
        user: String,

        /// Topics covered, comma-separated
        #[arg(long, value_delimiter = ',')]
        topics: Vec<String>,

        /// Comprehension score, 1-10
        #[arg(long, default_value_t = 5)]
        confidence: u8,
    },

    /// Show quick stats: today, this week, this month, streak
    Stats {
        /// Acting user (username)
        #[arg(long)]
        user: String,

        /// Emit JSON instead of the formatted report
        #[arg(long)]
        json: bool,
    },

    /// Show a month calendar heatmap of study activity
    Calendar {
        /// Acting user (username)
        #[arg(long)]
        user: String,

        /// Month offset from the current month (e.g. -1 for last month)
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        offset: i64,

        /// Aggregate the whole group's activity instead of just the user's
        #[arg(long)]
        group: bool,

        /// Emit JSON instead of the formatted grid
        #[arg(long)]
        json: bool,
    },

    /// Manage group membership
    Group {
        #[command(subcommand)]
        command: GroupCommand,
    },

    /// Show the group leaderboard
    Leaderboard {
        /// Acting user (username)
        #[arg(long)]
        user: String,

        /// Emit JSON instead of the formatted table
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum UserCommand {
    /// Create a user
    Add {
        /// Unique username
        username: String,

        /// Display name (defaults to the username)
        #[arg(long)]
        name: Option<String>,

        /// Presentation color tag (e.g. "teal")
        #[arg(long)]
        color: Option<String>,
    },

    /// List users
    List,
}

#[derive(Subcommand, Debug)]
pub enum LogCommand {
    /// Record a study session manually
    Add {
        /// Acting user (username)
        #[arg(long)]
        user: String,

        /// Minutes studied
        #[arg(long)]
        minutes: u32,

        /// Topics covered, comma-separated
        #[arg(long, value_delimiter = ',')]
        topics: Vec<String>,

        /// Comprehension score, 1-10
        #[arg(long, default_value_t = 5)]
        confidence: u8,

        /// Session date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// List recorded sessions, newest first
    List {
        /// Acting user (username)
        #[arg(long)]
        user: String,

        /// Show at most this many sessions
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Delete a session by id
    Delete {
        /// Acting user (username)
        #[arg(long)]
        user: String,

        /// Log id to delete
        log_id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum GroupCommand {
    /// Create a group and join it
    Create {
        /// Group name
        name: String,

        /// Acting user (username)
        #[arg(long)]
        user: String,
    },

    /// Join a group by invite code
    Join {
        /// Invite code shared by a member
        code: String,

        /// Acting user (username)
        #[arg(long)]
        user: String,
    },

    /// Leave the current group
    Leave {
        /// Acting user (username)
        #[arg(long)]
        user: String,
    },

    /// Show the current group and its members
    Show {
        /// Acting user (username)
        #[arg(long)]
        user: String,
    },
}
