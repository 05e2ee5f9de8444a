//! Reading sessions.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// One completed read of a story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingSession {
    /// Unique identifier (UUID v4)
    pub id: String,
    /// Story that was read
    pub story_id: String,
    /// When reading began
    pub started_at: DateTime<Utc>,
    /// When the story was marked read
    pub completed_at: Option<DateTime<Utc>>,
    /// Time spent reading in seconds
    pub reading_seconds: u32,
    /// Whether the audio narration was used
    pub used_audio: bool,
}

impl ReadingSession {
    /// A session that finished at `completed_at` after `reading_seconds`.
    #[must_use]
    pub fn completed(
        story_id: impl Into<String>,
        completed_at: DateTime<Utc>,
        reading_seconds: u32,
        used_audio: bool,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            story_id: story_id.into(),
            started_at: completed_at - Duration::seconds(i64::from(reading_seconds)),
            completed_at: Some(completed_at),
            reading_seconds,
            used_audio,
        }
    }

    /// Whole minutes spent reading; partial minutes are dropped.
    #[must_use]
    pub const fn reading_minutes(&self) -> u32 {
        self.reading_seconds / 60
    }
}

/// Format a number of seconds as a short string (e.g., "45s", "4m 10s").
#[must_use]
pub fn format_reading_time(seconds: u32) -> String {
    let minutes = seconds / 60;
    let rest = seconds % 60;

    if minutes > 0 {
        format!("{minutes}m {rest}s")
    } else {
        format!("{rest}s")
    }
}
