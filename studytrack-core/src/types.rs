//! Core domain types for studytrack
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **StudyLog** | One recorded study session: date, minutes, topics, confidence |
//! | **User** | A person who records study sessions |
//! | **Group** | A small set of users comparing progress on a shared leaderboard |
//! | **Streak** | Consecutive calendar days, ending today, with at least one log |
//!
//! Logs are append-only: a second session on the same day is a new record,
//! and all aggregation sums across same-day entries. There is no
//! merge-on-write path.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================
// Study logs
// ============================================

/// Confidence is a self-reported comprehension score on a 1-10 scale.
pub const CONFIDENCE_MIN: u8 = 1;
pub const CONFIDENCE_MAX: u8 = 10;

/// One recorded study session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyLog {
    /// Unique identifier (UUID v4)
    pub id: String,
    /// Owning user
    pub user_id: String,
    /// Owning group; empty string if the user was ungrouped at write time
    pub group_id: String,
    /// Calendar date of the session (no time component)
    pub date: NaiveDate,
    /// Topics covered, in the order entered; duplicates permitted
    pub topics: Vec<String>,
    /// Minutes studied
    pub time_studied: u32,
    /// Self-reported comprehension score, clamped to [1,10] on write
    pub confidence: u8,
    /// When the record was created
    pub created_at: DateTime<Utc>,
}

impl StudyLog {
    /// Create a new log record with a generated id.
    ///
    /// Confidence is clamped here, at the write boundary; the aggregation
    /// core never inspects or corrects it.
    pub fn new(
        user_id: impl Into<String>,
        group_id: impl Into<String>,
        date: NaiveDate,
        topics: Vec<String>,
        time_studied: u32,
        confidence: u8,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            group_id: group_id.into(),
            date,
            topics,
            time_studied,
            confidence: confidence.clamp(CONFIDENCE_MIN, CONFIDENCE_MAX),
            created_at: Utc::now(),
        }
    }

    /// Whether this log was written while the user belonged to a group.
    pub fn is_grouped(&self) -> bool {
        !self.group_id.is_empty()
    }
}

// ============================================
// Users
// ============================================

/// A person who records study sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier (UUID v4)
    pub id: String,
    /// Login/handle, unique across the store
    pub username: String,
    /// Human-friendly name shown in reports
    pub display_name: String,
    /// Presentation hint for UIs that color-code members
    pub color_tag: Option<String>,
    /// When the user was created
    pub created_at: DateTime<Utc>,
}

/// Member record handed to presentation layers.
///
/// Deliberately small: the stats core only ever sees `StudyLog` inputs,
/// so group member identity travels separately.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupMember {
    /// User id
    pub id: String,
    /// Human-friendly name
    pub display_name: String,
    /// Presentation hint
    pub color_tag: Option<String>,
}

// ============================================
// Groups
// ============================================

/// Alphabet for invite codes. Skips 0/O and 1/I to keep codes readable
/// when shared verbally.
const INVITE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Length of generated invite codes.
pub const INVITE_CODE_LEN: usize = 6;

/// A study group: a named set of users sharing a leaderboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    /// Unique identifier (UUID v4)
    pub id: String,
    /// Group name
    pub name: String,
    /// Code other users present to join
    pub invite_code: String,
    /// When the group was created
    pub created_at: DateTime<Utc>,
}

impl Group {
    /// Create a new group with a generated id and invite code.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            invite_code: Self::generate_invite_code(),
            created_at: Utc::now(),
        }
    }

    /// Generate a short invite code from UUID randomness.
    ///
    /// Uniqueness is best-effort: the store enforces a UNIQUE column and
    /// callers retry on collision.
    pub fn generate_invite_code() -> String {
        let raw = Uuid::new_v4();
        raw.as_bytes()
            .iter()
            .take(INVITE_CODE_LEN)
            .map(|b| INVITE_ALPHABET[(*b as usize) % INVITE_ALPHABET.len()] as char)
            .collect()
    }
}
