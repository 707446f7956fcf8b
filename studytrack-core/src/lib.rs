//! # studytrack-core
//!
//! Core library for studytrack - a collaborative study tracker.
//!
//! This library provides:
//! - Domain types for users, groups, and study logs
//! - Database storage layer with SQLite
//! - Pure statistics over log snapshots (totals, streaks, calendar grid,
//!   leaderboard)
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Architecture
//!
//! Storage and statistics are deliberately decoupled:
//! - **Storage:** [`Database`] owns the SQLite connection and hands out
//!   owned `Vec<StudyLog>` snapshots
//! - **Statistics:** everything in [`stats`] is a pure function over an
//!   explicit log slice; no ambient state, no I/O
//!
//! ## Example
//!
//! ```rust,no_run
//! use studytrack_core::{stats, Config, Database};
//!
//! let config = Config::load().expect("failed to load config");
//! let db = Database::open(&config.database_path()).expect("failed to open database");
//! db.migrate().expect("failed to run migrations");
//!
//! let user = db.user_by_username("alice").expect("unknown user");
//! let logs = db.logs_for_user(&user.id).expect("failed to load logs");
//! let summary = stats::quick_stats(&logs);
//! println!("streak: {} days", summary.streak);
//! ```

// Re-export commonly used items at the crate root
pub use config::Config;
pub use db::Database;
pub use error::{Error, Result};
pub use types::*;

// Public modules
pub mod config;
pub mod db;
pub mod error;
pub mod format;
pub mod logging;
pub mod stats;
pub mod types;
