//! Database migrations for mythly.
//!
//! Each migration is a function that upgrades the schema by one version.
//! Migrations are run automatically when the database is opened.

use rusqlite::Connection;

use crate::error::MythlyError;

/// Current schema version.
const CURRENT_VERSION: i32 = 1;

/// Get the current schema version from the database.
///
/// Returns 0 if no version has been set (new database).
pub fn get_version(conn: &Connection) -> Result<i32, MythlyError> {
    conn.query_row("PRAGMA user_version", [], |row| row.get(0))
        .map_err(|e| MythlyError::database("Failed to get schema version", &e))
}

/// Set the schema version in the database.
fn set_version(conn: &Connection, version: i32) -> Result<(), MythlyError> {
    conn.execute_batch(&format!("PRAGMA user_version = {version};"))
        .map_err(|e| MythlyError::database("Failed to set schema version", &e))
}

/// Run all pending migrations.
pub fn run(conn: &Connection) -> Result<(), MythlyError> {
    let current = get_version(conn)?;

    if current >= CURRENT_VERSION {
        return Ok(());
    }

    for version in (current + 1)..=CURRENT_VERSION {
        tracing::debug!("Applying schema migration v{version}");
        run_migration(conn, version)?;
        set_version(conn, version)?;
    }

    Ok(())
}

/// Run a specific migration.
fn run_migration(conn: &Connection, version: i32) -> Result<(), MythlyError> {
    match version {
        1 => migrate_v1(conn),
        _ => Err(MythlyError::Database(format!(
            "Unknown migration version: {version}"
        ))),
    }
}

/// Migration v1: Initial schema.
///
/// Creates tables for:
/// - `stories`: story content plus per-user read/favorite flags
/// - `user_stats`: the single statistics row (id is always 1)
/// - `reading_sessions`: append-only reading history
fn migrate_v1(conn: &Connection) -> Result<(), MythlyError> {
    conn.execute_batch(
        r"
        CREATE TABLE IF NOT EXISTS stories (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            content TEXT NOT NULL,
            moral_lesson TEXT NOT NULL,
            deities TEXT NOT NULL,
            epic TEXT NOT NULL,
            story_values TEXT NOT NULL,
            image_url TEXT NOT NULL,
            audio_url TEXT,
            sanskrit_title TEXT,
            related_story_ids TEXT NOT NULL DEFAULT '[]',
            read_time_minutes INTEGER NOT NULL,
            date_published TEXT NOT NULL,
            is_read INTEGER NOT NULL DEFAULT 0,
            is_favorite INTEGER NOT NULL DEFAULT 0,
            last_read_at TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_stories_published
        ON stories(date_published);

        CREATE INDEX IF NOT EXISTS idx_stories_epic
        ON stories(epic);

        CREATE TABLE IF NOT EXISTS user_stats (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            current_streak INTEGER NOT NULL DEFAULT 0,
            longest_streak INTEGER NOT NULL DEFAULT 0,
            total_stories_read INTEGER NOT NULL DEFAULT 0,
            last_read_date TEXT,
            favorite_deity TEXT,
            streak_7_day INTEGER NOT NULL DEFAULT 0,
            streak_30_day INTEGER NOT NULL DEFAULT 0,
            streak_100_day INTEGER NOT NULL DEFAULT 0,
            total_reading_minutes INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS reading_sessions (
            id TEXT PRIMARY KEY,
            story_id TEXT NOT NULL,
            started_at TEXT NOT NULL,
            completed_at TEXT,
            reading_seconds INTEGER NOT NULL DEFAULT 0,
            used_audio INTEGER NOT NULL DEFAULT 0
        );

        CREATE INDEX IF NOT EXISTS idx_reading_sessions_started
        ON reading_sessions(started_at);

        CREATE INDEX IF NOT EXISTS idx_reading_sessions_story
        ON reading_sessions(story_id);
        ",
    )
    .map_err(|e| MythlyError::database("Migration v1 failed", &e))
}
