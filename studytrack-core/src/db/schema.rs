//! Database schema and migrations
//!
//! Uses SQLite with embedded migrations managed via PRAGMA user_version.

use rusqlite::Connection;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 2;

/// SQL migrations, indexed by version number
const MIGRATIONS: &[&str] = &[
    // Version 1: Initial schema
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id            TEXT PRIMARY KEY,
        username      TEXT NOT NULL UNIQUE,
        display_name  TEXT NOT NULL,
        created_at    DATETIME NOT NULL
    );

    CREATE TABLE IF NOT EXISTS groups (
        id            TEXT PRIMARY KEY,
        name          TEXT NOT NULL,
        invite_code   TEXT NOT NULL UNIQUE,
        created_at    DATETIME NOT NULL
    );

    CREATE TABLE IF NOT EXISTS group_members (
        group_id      TEXT NOT NULL REFERENCES groups(id),
        user_id       TEXT NOT NULL REFERENCES users(id),
        joined_at     DATETIME NOT NULL,

        PRIMARY KEY (group_id, user_id)
    );

    CREATE TABLE IF NOT EXISTS study_logs (
        id            TEXT PRIMARY KEY,
        user_id       TEXT NOT NULL REFERENCES users(id),
        -- Empty string means the user was ungrouped at write time
        group_id      TEXT NOT NULL DEFAULT '',
        date          TEXT NOT NULL,      -- ISO YYYY-MM-DD
        topics        JSON NOT NULL,      -- ordered array of strings
        time_studied  INTEGER NOT NULL CHECK (time_studied >= 0),
        confidence    INTEGER NOT NULL CHECK (confidence BETWEEN 1 AND 10),
        created_at    DATETIME NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_logs_user ON study_logs(user_id);
    CREATE INDEX IF NOT EXISTS idx_logs_group ON study_logs(group_id);
    CREATE INDEX IF NOT EXISTS idx_members_user ON group_members(user_id);
    "#,
    // Version 2: color tags for member display, date index for range scans
    r#"
    ALTER TABLE users ADD COLUMN color_tag TEXT;

    CREATE INDEX IF NOT EXISTS idx_logs_date ON study_logs(date);
    "#,
];

/// Run all pending migrations
pub fn run_migrations(conn: &Connection) -> crate::error::Result<()> {
    let current_version: i32 = conn
        .query_row("PRAGMA user_version", [], |r| r.get(0))
        .unwrap_or(0);

    tracing::info!(
        current_version,
        target_version = SCHEMA_VERSION,
        "Checking database migrations"
    );

    for (i, migration) in MIGRATIONS.iter().enumerate() {
        let version = (i + 1) as i32;
        if version > current_version {
            tracing::info!(version, "Running migration");
            conn.execute_batch(migration)?;
            conn.execute(&format!("PRAGMA user_version = {}", version), [])?;
        }
    }

    if current_version < SCHEMA_VERSION {
        tracing::info!(
            from = current_version,
            to = SCHEMA_VERSION,
            "Migrations complete"
        );
    }

    Ok(())
}

/// Get the current schema version from the database
pub fn get_schema_version(conn: &Connection) -> crate::error::Result<i32> {
    let version: i32 = conn.query_row("PRAGMA user_version", [], |r| r.get(0))?;
    Ok(version)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_idempotent() {
        let conn = Connection::open_in_memory().unwrap();

        // Run migrations twice - should be idempotent
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();

        let version = get_schema_version(&conn).unwrap();
        assert_eq!(version, SCHEMA_VERSION);
    }

    #[test]
    fn test_tables_created() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        let tables = ["users", "groups", "group_members", "study_logs"];

        for table in tables {
            let exists: i32 = conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?",
                    [table],
                    |r| r.get(0),
                )
                .unwrap();
            assert_eq!(exists, 1, "Table {} should exist", table);
        }
    }

    #[test]
    fn test_username_unique() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        conn.execute(
            "INSERT INTO users (id, username, display_name, created_at) VALUES ('a', 'sam', 'Sam', '2025-01-01T00:00:00Z')",
            [],
        )
        .unwrap();

        let dup = conn.execute(
            "INSERT INTO users (id, username, display_name, created_at) VALUES ('b', 'sam', 'Other Sam', '2025-01-01T00:00:00Z')",
            [],
        );
        assert!(dup.is_err(), "duplicate username should be rejected");
    }

    #[test]
    fn test_time_studied_check_constraint() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        conn.execute(
            "INSERT INTO users (id, username, display_name, created_at) VALUES ('u1', 'sam', 'Sam', '2025-01-01T00:00:00Z')",
            [],
        )
        .unwrap();

        let negative = conn.execute(
            "INSERT INTO study_logs (id, user_id, group_id, date, topics, time_studied, confidence, created_at)
             VALUES ('l1', 'u1', '', '2025-04-30', '[]', -5, 5, '2025-04-30T00:00:00Z')",
            [],
        );
        assert!(negative.is_err(), "negative minutes should be rejected");
    }
}
