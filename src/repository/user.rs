//! User statistics and reading session storage.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::content::Deity;
use crate::core::{Feed, Subscription};
use crate::error::MythlyError;
use crate::progress::{advance_streak, ReadingSession, UserStats};
use crate::storage::{format_timestamp, parse_timestamp, Database};

/// Result pushed to statistics subscribers.
pub type StatsUpdate = Result<UserStats, MythlyError>;

/// Result pushed to session subscribers.
pub type SessionsUpdate = Result<Vec<ReadingSession>, MythlyError>;

/// Which sessions a subscriber wants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionQuery {
    /// The most recent `n` sessions by start time.
    Recent(usize),
    /// Every session for one story, newest first.
    ForStory(String),
}

/// Access to the statistics record and the session log.
pub trait UserRepository: Send + Sync {
    /// Current statistics, or defaults if nothing has been recorded yet.
    fn user_stats(&self) -> Result<UserStats, MythlyError>;

    /// Watch the statistics record.
    fn subscribe_stats(&self) -> Subscription<StatsUpdate>;

    /// Apply a completed read at `now` to the streak and store the result.
    fn update_streak(&self, now: DateTime<Utc>) -> Result<UserStats, MythlyError>;

    /// Add one to the stories-read counter.
    fn increment_stories_read(&self) -> Result<(), MythlyError>;

    /// Add `minutes` to the total reading time.
    fn add_reading_minutes(&self, minutes: u32) -> Result<(), MythlyError>;

    /// Record the reader's favorite deity.
    fn set_favorite_deity(&self, deity: Option<Deity>) -> Result<(), MythlyError>;

    /// Append a reading session.
    fn save_reading_session(&self, session: &ReadingSession) -> Result<(), MythlyError>;

    /// Run a session query once.
    fn sessions(&self, query: &SessionQuery) -> Result<Vec<ReadingSession>, MythlyError>;

    /// Watch a session query.
    fn subscribe_sessions(&self, query: SessionQuery) -> Subscription<SessionsUpdate>;

    fn recent_sessions(&self, limit: usize) -> Result<Vec<ReadingSession>, MythlyError> {
        self.sessions(&SessionQuery::Recent(limit))
    }

    fn sessions_for_story(&self, story_id: &str) -> Result<Vec<ReadingSession>, MythlyError> {
        self.sessions(&SessionQuery::ForStory(story_id.to_string()))
    }
}

/// `SQLite`-backed user repository.
pub struct LocalUserRepository {
    db: Arc<Database>,
    stats_feed: Feed<(), StatsUpdate>,
    sessions_feed: Feed<SessionQuery, SessionsUpdate>,
}

const STATS_COLUMNS: &str = "current_streak, longest_streak, total_stories_read, last_read_date, \
     favorite_deity, streak_7_day, streak_30_day, streak_100_day, total_reading_minutes";

const SESSION_COLUMNS: &str =
    "id, story_id, started_at, completed_at, reading_seconds, used_audio";

impl LocalUserRepository {
    /// Create a repository over a shared database.
    #[must_use]
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            db,
            stats_feed: Feed::new(),
            sessions_feed: Feed::new(),
        }
    }

    fn publish_stats(&self) {
        self.stats_feed.publish_with(|_| self.user_stats());
    }

    fn publish_sessions(&self) {
        self.sessions_feed.publish_with(|query| self.sessions(query));
    }

    /// Run a single-field update against the statistics row, creating it first.
    fn update_stats_field(&self, sql: &str, value: &dyn rusqlite::ToSql) -> Result<(), MythlyError> {
        {
            let conn = self.db.connection()?;
            ensure_stats_row(&conn)?;
            conn.execute(sql, [value])
                .map_err(|e| MythlyError::database("Failed to update statistics", &e))?;
        }

        self.publish_stats();
        Ok(())
    }
}

impl UserRepository for LocalUserRepository {
    fn user_stats(&self) -> Result<UserStats, MythlyError> {
        let conn = self.db.connection()?;
        read_stats(&conn).map(Option::unwrap_or_default)
    }

    fn subscribe_stats(&self) -> Subscription<StatsUpdate> {
        self.stats_feed.subscribe((), |_| self.user_stats())
    }

    fn update_streak(&self, now: DateTime<Utc>) -> Result<UserStats, MythlyError> {
        let updated = {
            let mut conn = self.db.connection()?;
            let tx = conn
                .transaction()
                .map_err(|e| MythlyError::database("Failed to begin transaction", &e))?;

            let current = read_stats(&tx)?.unwrap_or_default();
            let updated = advance_streak(&current, now);
            tracing::debug!(
                "Updating streak: old={}, new={}",
                current.current_streak,
                updated.current_streak
            );

            write_stats(&tx, &updated)?;
            tx.commit()
                .map_err(|e| MythlyError::database("Failed to commit streak", &e))?;
            updated
        };

        tracing::info!(
            "Streak updated. Current: {}, Longest: {}",
            updated.current_streak,
            updated.longest_streak
        );
        self.publish_stats();
        Ok(updated)
    }

    fn increment_stories_read(&self) -> Result<(), MythlyError> {
        self.update_stats_field(
            "UPDATE user_stats SET total_stories_read = total_stories_read + ?1 WHERE id = 1",
            &1_i64,
        )
    }

    fn add_reading_minutes(&self, minutes: u32) -> Result<(), MythlyError> {
        self.update_stats_field(
            "UPDATE user_stats SET total_reading_minutes = total_reading_minutes + ?1 WHERE id = 1",
            &minutes,
        )
    }

    fn set_favorite_deity(&self, deity: Option<Deity>) -> Result<(), MythlyError> {
        self.update_stats_field(
            "UPDATE user_stats SET favorite_deity = ?1 WHERE id = 1",
            &deity.map(Deity::code),
        )
    }

    fn save_reading_session(&self, session: &ReadingSession) -> Result<(), MythlyError> {
        tracing::debug!(
            "Saving reading session for story: {}, time: {}s",
            session.story_id,
            session.reading_seconds
        );

        {
            let conn = self.db.connection()?;
            conn.execute(
                r"INSERT INTO reading_sessions
                  (id, story_id, started_at, completed_at, reading_seconds, used_audio)
                  VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    session.id,
                    session.story_id,
                    format_timestamp(session.started_at),
                    session.completed_at.map(format_timestamp),
                    session.reading_seconds,
                    session.used_audio,
                ],
            )
            .map_err(|e| MythlyError::database("Failed to insert session", &e))?;
        }

        self.publish_sessions();
        Ok(())
    }

    fn sessions(&self, query: &SessionQuery) -> Result<Vec<ReadingSession>, MythlyError> {
        let conn = self.db.connection()?;

        let (sql, param): (String, Box<dyn rusqlite::ToSql>) = match query {
            SessionQuery::Recent(limit) => (
                format!(
                    "SELECT {SESSION_COLUMNS} FROM reading_sessions
                     ORDER BY started_at DESC, id ASC LIMIT ?1"
                ),
                Box::new(i64::try_from(*limit).unwrap_or(i64::MAX)),
            ),
            SessionQuery::ForStory(story_id) => (
                format!(
                    "SELECT {SESSION_COLUMNS} FROM reading_sessions
                     WHERE story_id = ?1 ORDER BY started_at DESC, id ASC"
                ),
                Box::new(story_id.clone()),
            ),
        };

        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| MythlyError::database("Failed to prepare query", &e))?;

        let rows = stmt
            .query_map([param], row_to_session)
            .map_err(|e| MythlyError::database("Failed to query sessions", &e))?;

        let mut sessions = Vec::new();
        for row in rows {
            sessions.push(row.map_err(|e| MythlyError::database("Failed to read session", &e))?);
        }

        Ok(sessions)
    }

    fn subscribe_sessions(&self, query: SessionQuery) -> Subscription<SessionsUpdate> {
        self.sessions_feed.subscribe(query, |query| self.sessions(query))
    }
}

fn ensure_stats_row(conn: &Connection) -> Result<(), MythlyError> {
    conn.execute("INSERT OR IGNORE INTO user_stats (id) VALUES (1)", [])
        .map_err(|e| MythlyError::database("Failed to create statistics row", &e))?;
    Ok(())
}

fn read_stats(conn: &Connection) -> Result<Option<UserStats>, MythlyError> {
    conn.query_row(
        &format!("SELECT {STATS_COLUMNS} FROM user_stats WHERE id = 1"),
        [],
        row_to_stats,
    )
    .optional()
    .map_err(|e| MythlyError::database("Failed to query statistics", &e))
}

/// Replace the statistics row with `stats`.
fn write_stats(conn: &Connection, stats: &UserStats) -> Result<(), MythlyError> {
    conn.execute(
        &format!(
            "INSERT OR REPLACE INTO user_stats (id, {STATS_COLUMNS})
             VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"
        ),
        params![
            stats.current_streak,
            stats.longest_streak,
            stats.total_stories_read,
            stats.last_read_date.map(format_timestamp),
            stats.favorite_deity.map(Deity::code),
            stats.streak_7_day,
            stats.streak_30_day,
            stats.streak_100_day,
            stats.total_reading_minutes,
        ],
    )
    .map_err(|e| MythlyError::database("Failed to write statistics", &e))?;
    Ok(())
}

/// Convert a database row to `UserStats`.
fn row_to_stats(row: &Row<'_>) -> rusqlite::Result<UserStats> {
    let last_read_date: Option<String> = row.get(3)?;
    let favorite_deity: Option<String> = row.get(4)?;

    Ok(UserStats {
        current_streak: row.get(0)?,
        longest_streak: row.get(1)?,
        total_stories_read: row.get(2)?,
        last_read_date: last_read_date
            .map(|s| parse_timestamp(3, &s))
            .transpose()?,
        // An unrecognized stored name is treated as no favorite
        favorite_deity: favorite_deity.and_then(|s| s.parse().ok()),
        streak_7_day: row.get(5)?,
        streak_30_day: row.get(6)?,
        streak_100_day: row.get(7)?,
        total_reading_minutes: row.get(8)?,
    })
}

/// Convert a database row to a `ReadingSession`.
fn row_to_session(row: &Row<'_>) -> rusqlite::Result<ReadingSession> {
    let started_at: String = row.get(2)?;
    let completed_at: Option<String> = row.get(3)?;

    Ok(ReadingSession {
        id: row.get(0)?,
        story_id: row.get(1)?,
        started_at: parse_timestamp(2, &started_at)?,
        completed_at: completed_at.map(|s| parse_timestamp(3, &s)).transpose()?,
        reading_seconds: row.get(4)?,
        used_audio: row.get(5)?,
    })
}
