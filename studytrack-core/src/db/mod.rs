//! Database layer for studytrack
//!
//! This module provides the storage layer using SQLite with:
//! - Schema migrations
//! - Repository pattern for queries
//!
//! The repository hands out owned `Vec<StudyLog>` snapshots; the stats
//! core in [`crate::stats`] consumes those snapshots and never touches
//! the connection.

pub mod repo;
pub mod schema;

pub use repo::Database;
