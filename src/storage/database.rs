//! `SQLite` database connection.
//!
//! The database is stored at `~/.mythly/mythly.db` and contains tables for:
//! - Stories and their read/favorite flags
//! - The singleton user statistics row
//! - Reading session history

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::Connection;

use crate::config::Paths;
use crate::error::MythlyError;

use super::migrations;

/// Database connection wrapper.
///
/// The connection sits behind a mutex so a single `Database` can be shared
/// through an `Arc` by the story and user repositories. `SQLite` serializes
/// writers internally; the mutex only keeps the `Connection` itself exclusive.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open the database at the default location.
    ///
    /// Creates the database file and runs migrations if necessary.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrations fail.
    pub fn open() -> Result<Self, MythlyError> {
        let paths = Paths::new()?;
        paths.ensure_dirs()?;
        Self::open_at(&paths.database)
    }

    /// Open the database at a specific path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrations fail.
    pub fn open_at(path: &Path) -> Result<Self, MythlyError> {
        let conn = Connection::open(path).map_err(|e| {
            MythlyError::Database(format!("Failed to open database {}: {e}", path.display()))
        })?;
        tracing::debug!("Opened database at {}", path.display());
        Self::from_connection(conn)
    }

    /// Open an in-memory database (useful for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrations fail.
    pub fn open_in_memory() -> Result<Self, MythlyError> {
        let conn = Connection::open_in_memory().map_err(|e| {
            MythlyError::Database(format!("Failed to open in-memory database: {e}"))
        })?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, MythlyError> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(|e| MythlyError::database("Failed to enable foreign keys", &e))?;

        migrations::run(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Get the current schema version.
    ///
    /// # Errors
    ///
    /// Returns an error if the version cannot be read.
    pub fn schema_version(&self) -> Result<i32, MythlyError> {
        let conn = self.connection()?;
        migrations::get_version(&conn)
    }

    /// Lock and return the underlying connection.
    ///
    /// Hold the guard only for the duration of one operation; publishing to
    /// subscribers must happen after it is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if a previous holder panicked with the lock held.
    pub fn connection(&self) -> Result<MutexGuard<'_, Connection>, MythlyError> {
        self.conn
            .lock()
            .map_err(|_| MythlyError::Database("Database connection lock poisoned".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_in_memory() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.schema_version().unwrap() > 0);
    }

    #[test]
    fn test_open_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");

        let db = Database::open_at(&db_path).unwrap();
        assert!(db.schema_version().unwrap() > 0);
        assert!(db_path.exists());
    }

    #[test]
    fn test_reopen_keeps_data() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");

        {
            let db = Database::open_at(&db_path).unwrap();
            db.connection()
                .unwrap()
                .execute("INSERT INTO user_stats (id, current_streak) VALUES (1, 4)", [])
                .unwrap();
        }

        let db = Database::open_at(&db_path).unwrap();
        let streak: i64 = db
            .connection()
            .unwrap()
            .query_row("SELECT current_streak FROM user_stats WHERE id = 1", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(streak, 4);
    }
}
