//! Database repository layer
//!
//! Provides query and insert operations for users, groups, and study logs.

use crate::error::{Error, Result};
use crate::types::{Group, GroupMember, StudyLog, User};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::PathBuf;
use std::sync::Mutex;

/// How many invite-code collisions to tolerate before giving up.
const INVITE_CODE_RETRIES: usize = 4;

/// Database handle (single connection behind a mutex)
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open or create a database at the given path
    pub fn open(path: &PathBuf) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        // Enable foreign keys and WAL mode for better concurrency
        conn.execute_batch(
            "
            PRAGMA foreign_keys = ON;
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            ",
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute("PRAGMA foreign_keys = ON", [])?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run migrations on this database
    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        super::schema::run_migrations(&conn)
    }

    // ============================================
    // Row mappers
    // ============================================

    fn parse_timestamp(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now())
    }

    fn row_to_user(row: &Row) -> rusqlite::Result<User> {
        let created_at_str: String = row.get("created_at")?;
        Ok(User {
            id: row.get("id")?,
            username: row.get("username")?,
            display_name: row.get("display_name")?,
            color_tag: row.get("color_tag")?,
            created_at: Self::parse_timestamp(&created_at_str),
        })
    }

    fn row_to_group(row: &Row) -> rusqlite::Result<Group> {
        let created_at_str: String = row.get("created_at")?;
        Ok(Group {
            id: row.get("id")?,
            name: row.get("name")?,
            invite_code: row.get("invite_code")?,
            created_at: Self::parse_timestamp(&created_at_str),
        })
    }

    fn row_to_log(row: &Row) -> rusqlite::Result<StudyLog> {
        let date_str: String = row.get("date")?;
        let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                0,
                rusqlite::types::Type::Text,
                Box::new(e),
            )
        })?;

        let topics_str: String = row.get("topics")?;
        let topics: Vec<String> = serde_json::from_str(&topics_str).unwrap_or_default();

        let time_studied: i64 = row.get("time_studied")?;
        let confidence: i64 = row.get("confidence")?;
        let created_at_str: String = row.get("created_at")?;

        Ok(StudyLog {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            group_id: row.get("group_id")?,
            date,
            topics,
            time_studied: time_studied as u32,
            confidence: confidence as u8,
            created_at: Self::parse_timestamp(&created_at_str),
        })
    }

    // ============================================
    // Internal lookups (callers hold the lock)
    // ============================================

    fn user_exists(conn: &Connection, user_id: &str) -> Result<bool> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM users WHERE id = ?",
            [user_id],
            |r| r.get(0),
        )?;
        Ok(count > 0)
    }

    /// Group id the user currently belongs to, if any.
    fn membership_of(conn: &Connection, user_id: &str) -> Result<Option<String>> {
        conn.query_row(
            "SELECT group_id FROM group_members WHERE user_id = ?",
            [user_id],
            |r| r.get(0),
        )
        .optional()
        .map_err(Error::from)
    }

    fn member_count(conn: &Connection, group_id: &str) -> Result<usize> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM group_members WHERE group_id = ?",
            [group_id],
            |r| r.get(0),
        )?;
        Ok(count as usize)
    }

    // ============================================
    // User operations
    // ============================================

    /// Create a user with a unique username
    pub fn create_user(
        &self,
        username: &str,
        display_name: &str,
        color_tag: Option<&str>,
    ) -> Result<User> {
        if username.trim().is_empty() {
            return Err(Error::Validation("username must not be empty".to_string()));
        }

        let conn = self.conn.lock().unwrap();

        let taken: i64 = conn.query_row(
            "SELECT COUNT(*) FROM users WHERE username = ?",
            [username],
            |r| r.get(0),
        )?;
        if taken > 0 {
            return Err(Error::UsernameTaken(username.to_string()));
        }

        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            username: username.to_string(),
            display_name: display_name.to_string(),
            color_tag: color_tag.map(|c| c.to_string()),
            created_at: Utc::now(),
        };

        conn.execute(
            "INSERT INTO users (id, username, display_name, color_tag, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                user.id,
                user.username,
                user.display_name,
                user.color_tag,
                user.created_at.to_rfc3339(),
            ],
        )?;

        tracing::info!(user_id = %user.id, username = %user.username, "Created user");
        Ok(user)
    }

    /// Get a user by id
    pub fn get_user(&self, id: &str) -> Result<Option<User>> {
        let conn = self.conn.lock().unwrap();
        conn.query_row("SELECT * FROM users WHERE id = ?", [id], Self::row_to_user)
            .optional()
            .map_err(Error::from)
    }

    /// Get a user by username, failing if absent
    pub fn user_by_username(&self, username: &str) -> Result<User> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT * FROM users WHERE username = ?",
            [username],
            Self::row_to_user,
        )
        .optional()?
        .ok_or_else(|| Error::UserNotFound(username.to_string()))
    }

    /// List all users, ordered by username
    pub fn list_users(&self) -> Result<Vec<User>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT * FROM users ORDER BY username")?;
        let users = stmt
            .query_map([], Self::row_to_user)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(users)
    }

    // ============================================
    // Group operations
    // ============================================

    /// Create a group; the creator joins it immediately.
    ///
    /// A user can belong to at most one group at a time.
    pub fn create_group(&self, name: &str, owner_id: &str) -> Result<Group> {
        if name.trim().is_empty() {
            return Err(Error::Validation("group name must not be empty".to_string()));
        }

        let conn = self.conn.lock().unwrap();

        if !Self::user_exists(&conn, owner_id)? {
            return Err(Error::UserNotFound(owner_id.to_string()));
        }
        if Self::membership_of(&conn, owner_id)?.is_some() {
            return Err(Error::AlreadyInGroup(owner_id.to_string()));
        }

        let mut group = Group::new(name);
        for _ in 0..INVITE_CODE_RETRIES {
            let exists: i64 = conn.query_row(
                "SELECT COUNT(*) FROM groups WHERE invite_code = ?",
                [&group.invite_code],
                |r| r.get(0),
            )?;
            if exists == 0 {
                break;
            }
            group.invite_code = Group::generate_invite_code();
        }

        conn.execute(
            "INSERT INTO groups (id, name, invite_code, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                group.id,
                group.name,
                group.invite_code,
                group.created_at.to_rfc3339(),
            ],
        )?;
        conn.execute(
            "INSERT INTO group_members (group_id, user_id, joined_at) VALUES (?1, ?2, ?3)",
            params![group.id, owner_id, Utc::now().to_rfc3339()],
        )?;

        tracing::info!(group_id = %group.id, name = %group.name, "Created group");
        Ok(group)
    }

    /// Join a group by invite code.
    ///
    /// Rejects unknown codes, full groups (per `max_members`), and users
    /// who already belong to a group.
    pub fn join_group(&self, invite_code: &str, user_id: &str, max_members: usize) -> Result<Group> {
        let conn = self.conn.lock().unwrap();

        if !Self::user_exists(&conn, user_id)? {
            return Err(Error::UserNotFound(user_id.to_string()));
        }

        let group = conn
            .query_row(
                "SELECT * FROM groups WHERE invite_code = ?",
                [invite_code],
                Self::row_to_group,
            )
            .optional()?
            .ok_or_else(|| Error::GroupNotFound(invite_code.to_string()))?;

        if Self::membership_of(&conn, user_id)?.is_some() {
            return Err(Error::AlreadyInGroup(user_id.to_string()));
        }
        if Self::member_count(&conn, &group.id)? >= max_members {
            return Err(Error::GroupFull(group.name.clone()));
        }

        conn.execute(
            "INSERT INTO group_members (group_id, user_id, joined_at) VALUES (?1, ?2, ?3)",
            params![group.id, user_id, Utc::now().to_rfc3339()],
        )?;

        tracing::info!(group_id = %group.id, user_id, "User joined group");
        Ok(group)
    }

    /// Leave the current group
    pub fn leave_group(&self, user_id: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();

        let removed = conn.execute(
            "DELETE FROM group_members WHERE user_id = ?",
            [user_id],
        )?;
        if removed == 0 {
            return Err(Error::NotInGroup(user_id.to_string()));
        }

        tracing::info!(user_id, "User left group");
        Ok(())
    }

    /// The group a user belongs to, if any
    pub fn group_for_user(&self, user_id: &str) -> Result<Option<Group>> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT g.* FROM groups g
             JOIN group_members m ON m.group_id = g.id
             WHERE m.user_id = ?",
            [user_id],
            Self::row_to_group,
        )
        .optional()
        .map_err(Error::from)
    }

    /// Member records for a group, in join order
    pub fn group_members(&self, group_id: &str) -> Result<Vec<GroupMember>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT u.id, u.display_name, u.color_tag
             FROM group_members m
             JOIN users u ON u.id = m.user_id
             WHERE m.group_id = ?
             ORDER BY m.joined_at",
        )?;
        let members = stmt
            .query_map([group_id], |row| {
                Ok(GroupMember {
                    id: row.get(0)?,
                    display_name: row.get(1)?,
                    color_tag: row.get(2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(members)
    }

    // ============================================
    // Study log operations
    // ============================================

    /// Append a study log.
    ///
    /// Logs are append-only: a second entry for the same (user, date) is a
    /// new record, and aggregation sums across same-day entries.
    pub fn insert_log(&self, log: &StudyLog) -> Result<()> {
        if log.user_id.trim().is_empty() {
            return Err(Error::Validation("log user_id must not be empty".to_string()));
        }

        let conn = self.conn.lock().unwrap();

        if !Self::user_exists(&conn, &log.user_id)? {
            return Err(Error::UserNotFound(log.user_id.clone()));
        }

        conn.execute(
            "INSERT INTO study_logs (id, user_id, group_id, date, topics, time_studied, confidence, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                log.id,
                log.user_id,
                log.group_id,
                log.date.format("%Y-%m-%d").to_string(),
                serde_json::to_string(&log.topics)?,
                log.time_studied,
                log.confidence,
                log.created_at.to_rfc3339(),
            ],
        )?;

        tracing::debug!(
            log_id = %log.id,
            user_id = %log.user_id,
            minutes = log.time_studied,
            "Appended study log"
        );
        Ok(())
    }

    /// Delete a log by id, owner-checked
    pub fn delete_log(&self, log_id: &str, user_id: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let removed = conn.execute(
            "DELETE FROM study_logs WHERE id = ? AND user_id = ?",
            params![log_id, user_id],
        )?;
        if removed == 0 {
            return Err(Error::LogNotFound(log_id.to_string()));
        }
        Ok(())
    }

    /// All logs for a user, oldest first
    pub fn logs_for_user(&self, user_id: &str) -> Result<Vec<StudyLog>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT * FROM study_logs WHERE user_id = ? ORDER BY date, created_at",
        )?;
        let logs = stmt
            .query_map([user_id], Self::row_to_log)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(logs)
    }

    /// All logs written under a group, oldest first
    pub fn logs_for_group(&self, group_id: &str) -> Result<Vec<StudyLog>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT * FROM study_logs WHERE group_id = ? ORDER BY date, created_at",
        )?;
        let logs = stmt
            .query_map([group_id], Self::row_to_log)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(logs)
    }

    /// Complete log history of every current member of a group.
    ///
    /// The leaderboard sums group-scoped logs but computes streaks over a
    /// member's full history, so this returns logs from any group (and
    /// ungrouped ones) as long as the author is currently a member.
    pub fn logs_for_group_members(&self, group_id: &str) -> Result<Vec<StudyLog>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT * FROM study_logs
             WHERE user_id IN (SELECT user_id FROM group_members WHERE group_id = ?)
             ORDER BY date, created_at",
        )?;
        let logs = stmt
            .query_map([group_id], Self::row_to_log)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(logs)
    }

    /// A user's logs on one calendar date
    pub fn logs_for_user_on_date(&self, user_id: &str, date: NaiveDate) -> Result<Vec<StudyLog>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT * FROM study_logs WHERE user_id = ? AND date = ? ORDER BY created_at",
        )?;
        let logs = stmt
            .query_map(
                params![user_id, date.format("%Y-%m-%d").to_string()],
                Self::row_to_log,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(logs)
    }

    /// Total number of stored logs
    pub fn count_logs(&self) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM study_logs", [], |r| r.get(0))?;
        Ok(count)
    }
}
