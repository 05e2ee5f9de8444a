//! Story storage.
//!
//! Persists stories and their read/favorite flags to the local database and
//! keeps subscribed queries up to date.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use serde::de::DeserializeOwned;

use crate::content::{Deity, Epic, Story, StoryQuery, StoryView};
use crate::core::{Feed, Subscription};
use crate::error::MythlyError;
use crate::storage::{format_timestamp, parse_timestamp, Database};

/// Result pushed to story subscribers.
pub type StoryUpdate = Result<Vec<StoryView>, MythlyError>;

/// Access to the story collection.
pub trait StoryRepository: Send + Sync {
    /// Run `query` once.
    fn query(&self, query: &StoryQuery) -> Result<Vec<StoryView>, MythlyError>;

    /// Watch `query`: the current result arrives immediately, then a fresh one
    /// after every story mutation.
    fn subscribe(&self, query: StoryQuery) -> Subscription<StoryUpdate>;

    /// Point lookup.
    fn story_by_id(&self, id: &str) -> Result<Option<StoryView>, MythlyError>;

    /// Uniformly random story, `None` when the store is empty.
    fn random_story(&self) -> Result<Option<StoryView>, MythlyError>;

    /// Number of stories in the store.
    fn count_stories(&self) -> Result<usize, MythlyError>;

    /// Number of stories marked read.
    fn read_count(&self) -> Result<usize, MythlyError>;

    /// Set the read flag and last-read time. Unknown ids are ignored.
    fn mark_as_read(&self, id: &str, at: DateTime<Utc>) -> Result<(), MythlyError>;

    /// Set or clear the favorite flag. Unknown ids are ignored.
    fn set_favorite(&self, id: &str, favorite: bool) -> Result<(), MythlyError>;

    /// Insert or replace `stories` in one transaction, returning the count.
    fn insert_stories(&self, stories: &[Story]) -> Result<usize, MythlyError>;

    fn all_stories(&self) -> Result<Vec<StoryView>, MythlyError> {
        self.query(&StoryQuery::All)
    }

    fn stories_by_deity(&self, deity: Deity) -> Result<Vec<StoryView>, MythlyError> {
        self.query(&StoryQuery::ByDeity(deity))
    }

    fn stories_by_epic(&self, epic: Epic) -> Result<Vec<StoryView>, MythlyError> {
        self.query(&StoryQuery::ByEpic(epic))
    }

    fn search_stories(&self, text: &str) -> Result<Vec<StoryView>, MythlyError> {
        self.query(&StoryQuery::Search(text.to_string()))
    }

    fn read_stories(&self) -> Result<Vec<StoryView>, MythlyError> {
        self.query(&StoryQuery::Read)
    }

    fn favorite_stories(&self) -> Result<Vec<StoryView>, MythlyError> {
        self.query(&StoryQuery::Favorites)
    }
}

/// `SQLite`-backed story repository.
pub struct LocalStoryRepository {
    db: Arc<Database>,
    feed: Feed<StoryQuery, StoryUpdate>,
}

const STORY_COLUMNS: &str = "id, title, content, moral_lesson, deities, epic, story_values, \
     image_url, audio_url, sanskrit_title, related_story_ids, read_time_minutes, \
     date_published, is_read, is_favorite, last_read_at";

impl LocalStoryRepository {
    /// Create a repository over a shared database.
    #[must_use]
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            db,
            feed: Feed::new(),
        }
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.feed.subscriber_count()
    }

    fn publish(&self) {
        self.feed.publish_with(|query| self.query(query));
    }
}

impl StoryRepository for LocalStoryRepository {
    fn query(&self, query: &StoryQuery) -> Result<Vec<StoryView>, MythlyError> {
        let conn = self.db.connection()?;
        run_query(&conn, query)
    }

    fn subscribe(&self, query: StoryQuery) -> Subscription<StoryUpdate> {
        self.feed.subscribe(query, |query| self.query(query))
    }

    fn story_by_id(&self, id: &str) -> Result<Option<StoryView>, MythlyError> {
        let conn = self.db.connection()?;

        conn.query_row(
            &format!("SELECT {STORY_COLUMNS} FROM stories WHERE id = ?1"),
            [id],
            row_to_story_view,
        )
        .optional()
        .map_err(|e| MythlyError::database("Failed to query story", &e))
    }

    fn random_story(&self) -> Result<Option<StoryView>, MythlyError> {
        let conn = self.db.connection()?;

        conn.query_row(
            &format!("SELECT {STORY_COLUMNS} FROM stories ORDER BY RANDOM() LIMIT 1"),
            [],
            row_to_story_view,
        )
        .optional()
        .map_err(|e| MythlyError::database("Failed to pick a random story", &e))
    }

    fn count_stories(&self) -> Result<usize, MythlyError> {
        let conn = self.db.connection()?;
        count(&conn, "SELECT COUNT(*) FROM stories")
    }

    fn read_count(&self) -> Result<usize, MythlyError> {
        let conn = self.db.connection()?;
        count(&conn, "SELECT COUNT(*) FROM stories WHERE is_read = 1")
    }

    fn mark_as_read(&self, id: &str, at: DateTime<Utc>) -> Result<(), MythlyError> {
        let rows = {
            let conn = self.db.connection()?;
            conn.execute(
                "UPDATE stories SET is_read = 1, last_read_at = ?2 WHERE id = ?1",
                params![id, format_timestamp(at)],
            )
            .map_err(|e| MythlyError::database("Failed to mark story as read", &e))?
        };

        if rows == 0 {
            tracing::debug!("mark_as_read: no story with id {id}");
        }
        self.publish();
        Ok(())
    }

    fn set_favorite(&self, id: &str, favorite: bool) -> Result<(), MythlyError> {
        {
            let conn = self.db.connection()?;
            conn.execute(
                "UPDATE stories SET is_favorite = ?2 WHERE id = ?1",
                params![id, favorite],
            )
            .map_err(|e| MythlyError::database("Failed to update favorite", &e))?;
        }

        self.publish();
        Ok(())
    }

    fn insert_stories(&self, stories: &[Story]) -> Result<usize, MythlyError> {
        {
            let mut conn = self.db.connection()?;
            let tx = conn
                .transaction()
                .map_err(|e| MythlyError::database("Failed to begin transaction", &e))?;

            {
                let mut stmt = tx
                    .prepare(
                        r"INSERT OR REPLACE INTO stories
                          (id, title, content, moral_lesson, deities, epic, story_values,
                           image_url, audio_url, sanskrit_title, related_story_ids,
                           read_time_minutes, date_published)
                          VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
                    )
                    .map_err(|e| MythlyError::database("Failed to prepare insert", &e))?;

                for story in stories {
                    stmt.execute(params![
                        story.id,
                        story.title,
                        story.content,
                        story.moral_lesson,
                        to_json_text(&story.deities)?,
                        story.epic.code(),
                        to_json_text(&story.values)?,
                        story.image_url,
                        story.audio_url,
                        story.sanskrit_title,
                        to_json_text(&story.related_story_ids)?,
                        story.read_time_minutes,
                        format_timestamp(story.date_published),
                    ])
                    .map_err(|e| {
                        MythlyError::database(&format!("Failed to insert story '{}'", story.id), &e)
                    })?;
                }
            }

            tx.commit()
                .map_err(|e| MythlyError::database("Failed to commit stories", &e))?;
        }

        self.publish();
        Ok(stories.len())
    }
}

fn run_query(conn: &Connection, query: &StoryQuery) -> Result<Vec<StoryView>, MythlyError> {
    let (filter, order, param): (&str, &str, Option<String>) = match query {
        StoryQuery::All => ("", "date_published DESC", None),
        StoryQuery::ByDeity(deity) => (
            "WHERE EXISTS (SELECT 1 FROM json_each(stories.deities) WHERE json_each.value = ?1)",
            "date_published DESC",
            Some(deity.code().to_string()),
        ),
        StoryQuery::ByEpic(epic) => (
            "WHERE epic = ?1",
            "date_published DESC",
            Some(epic.code().to_string()),
        ),
        StoryQuery::Search(text) => (
            r"WHERE title LIKE ?1 ESCAPE '\' OR content LIKE ?1 ESCAPE '\'",
            "date_published DESC",
            Some(like_pattern(text)),
        ),
        StoryQuery::Read => ("WHERE is_read = 1", "last_read_at DESC", None),
        StoryQuery::Favorites => ("WHERE is_favorite = 1", "date_published DESC", None),
    };

    let sql = format!("SELECT {STORY_COLUMNS} FROM stories {filter} ORDER BY {order}, id ASC");
    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| MythlyError::database("Failed to prepare query", &e))?;

    let rows = stmt
        .query_map(params_from_iter(param.iter()), row_to_story_view)
        .map_err(|e| MythlyError::database("Failed to query stories", &e))?;

    let mut stories = Vec::new();
    for row in rows {
        stories.push(row.map_err(|e| MythlyError::database("Failed to read story", &e))?);
    }

    Ok(stories)
}

/// Build a `LIKE` pattern matching `text` anywhere, with wildcards escaped.
fn like_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn count(conn: &Connection, sql: &str) -> Result<usize, MythlyError> {
    let n: i64 = conn
        .query_row(sql, [], |row| row.get(0))
        .map_err(|e| MythlyError::database("Failed to count stories", &e))?;
    Ok(usize::try_from(n).unwrap_or(0))
}

fn to_json_text<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, MythlyError> {
    Ok(serde_json::to_string(value)?)
}

fn from_json_column<T: DeserializeOwned>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T> {
    let text: String = row.get(idx)?;
    serde_json::from_str(&text)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Convert a database row to a `StoryView`.
fn row_to_story_view(row: &Row<'_>) -> rusqlite::Result<StoryView> {
    let epic_code: String = row.get(5)?;
    let epic = epic_code
        .parse::<Epic>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, e.into()))?;

    let date_published: String = row.get(12)?;
    let last_read_at: Option<String> = row.get(15)?;

    Ok(StoryView {
        story: Story {
            id: row.get(0)?,
            title: row.get(1)?,
            content: row.get(2)?,
            moral_lesson: row.get(3)?,
            deities: from_json_column(row, 4)?,
            epic,
            values: from_json_column(row, 6)?,
            image_url: row.get(7)?,
            audio_url: row.get(8)?,
            sanskrit_title: row.get(9)?,
            related_story_ids: from_json_column(row, 10)?,
            read_time_minutes: row.get(11)?,
            date_published: parse_timestamp(12, &date_published)?,
        },
        is_read: row.get(13)?,
        is_favorite: row.get(14)?,
        last_read_at: last_read_at
            .map(|s| parse_timestamp(15, &s))
            .transpose()?,
    })
}
