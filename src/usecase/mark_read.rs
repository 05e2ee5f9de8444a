//! Recording a completed read.

use std::sync::Arc;

use crate::content::StoryQuery;
use crate::core::Clock;
use crate::error::MythlyError;
use crate::progress::{favorite_deity, ReadingSession};
use crate::repository::{StoryRepository, UserRepository};

/// Marks a story read and updates everything that depends on it.
///
/// In order: the story's read flag, the streak, the stories-read counter, the
/// reading time (whole minutes, only when time was recorded), the favorite
/// deity, and finally a new reading session. The story id is not checked; an
/// unknown id still counts toward statistics, matching the store's no-op
/// update semantics.
pub struct MarkStoryRead {
    stories: Arc<dyn StoryRepository>,
    users: Arc<dyn UserRepository>,
    clock: Arc<dyn Clock>,
}

impl MarkStoryRead {
    #[must_use]
    pub fn new(
        stories: Arc<dyn StoryRepository>,
        users: Arc<dyn UserRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            stories,
            users,
            clock,
        }
    }

    /// Record that `story_id` was read for `reading_seconds`.
    ///
    /// # Errors
    ///
    /// Returns the first store failure; steps already applied are not undone.
    pub fn execute(
        &self,
        story_id: &str,
        reading_seconds: u32,
        used_audio: bool,
    ) -> Result<ReadingSession, MythlyError> {
        tracing::debug!(
            "Marking story as read: {story_id}, readingTime: {reading_seconds}s, audio: {used_audio}"
        );

        self.record(story_id, reading_seconds, used_audio)
            .inspect(|_| tracing::info!("Story marked as read successfully: {story_id}"))
            .inspect_err(|e| tracing::error!("Failed to mark story as read: {story_id} - {e}"))
    }

    fn record(
        &self,
        story_id: &str,
        reading_seconds: u32,
        used_audio: bool,
    ) -> Result<ReadingSession, MythlyError> {
        let now = self.clock.now();

        self.stories.mark_as_read(story_id, now)?;
        self.users.update_streak(now)?;
        self.users.increment_stories_read()?;

        let session = ReadingSession::completed(story_id, now, reading_seconds, used_audio);
        if reading_seconds > 0 {
            let minutes = session.reading_minutes();
            self.users.add_reading_minutes(minutes)?;
            tracing::debug!("Updated reading time: {minutes} minutes");
        }

        let read = self.stories.query(&StoryQuery::Read)?;
        self.users.set_favorite_deity(favorite_deity(&read))?;

        self.users.save_reading_session(&session)?;
        Ok(session)
    }
}
