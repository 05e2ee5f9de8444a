//! The reader screen for a single story.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::content::StoryView;
use crate::core::Clock;
use crate::error::MythlyError;
use crate::progress::ReadingSession;
use crate::repository::{StoryRepository, UserRepository};
use crate::usecase::{MarkStoryRead, ToggleFavorite};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReaderState {
    pub is_loading: bool,
    pub story: Option<StoryView>,
    pub error: Option<String>,
    pub is_marking_as_read: bool,
    pub reading_started_at: Option<DateTime<Utc>>,
}

pub struct ReaderModel {
    stories: Arc<dyn StoryRepository>,
    mark_read: MarkStoryRead,
    toggle_favorite: ToggleFavorite,
    clock: Arc<dyn Clock>,
    story_id: Option<String>,
    state: ReaderState,
}

impl ReaderModel {
    #[must_use]
    pub fn new(
        stories: Arc<dyn StoryRepository>,
        users: Arc<dyn UserRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            mark_read: MarkStoryRead::new(Arc::clone(&stories), users, Arc::clone(&clock)),
            toggle_favorite: ToggleFavorite::new(Arc::clone(&stories)),
            stories,
            clock,
            story_id: None,
            state: ReaderState::default(),
        }
    }

    #[must_use]
    pub const fn state(&self) -> &ReaderState {
        &self.state
    }

    /// Open a story and start the reading timer.
    pub fn load_story(&mut self, story_id: &str) {
        self.story_id = Some(story_id.to_string());
        self.state.is_loading = true;
        self.state.error = None;

        match self.fetch(story_id) {
            Ok(story) => {
                self.state.story = Some(story);
                self.state.reading_started_at = Some(self.clock.now());
            }
            Err(e) => {
                tracing::error!("Failed to load story {story_id}: {e}");
                self.state.story = None;
                self.state.error = Some(e.to_string());
            }
        }
        self.state.is_loading = false;
    }

    /// Seconds since the story was opened.
    #[must_use]
    pub fn elapsed_seconds(&self) -> u32 {
        self.state.reading_started_at.map_or(0, |started| {
            let secs = (self.clock.now() - started).num_seconds().max(0);
            u32::try_from(secs).unwrap_or(u32::MAX)
        })
    }

    /// Record the open story as read using the time since it was opened.
    pub fn mark_as_read(&mut self, used_audio: bool) -> Option<ReadingSession> {
        let story_id = self.state.story.as_ref()?.id().to_string();
        let reading_seconds = self.elapsed_seconds();

        self.state.is_marking_as_read = true;
        let result = self.mark_read.execute(&story_id, reading_seconds, used_audio);
        self.state.is_marking_as_read = false;

        match result {
            Ok(session) => {
                self.reload(&story_id);
                Some(session)
            }
            Err(e) => {
                self.state.error = Some(e.to_string());
                None
            }
        }
    }

    /// Flip the favorite flag of the open story.
    pub fn toggle_favorite(&mut self) -> Option<bool> {
        let story_id = self.state.story.as_ref()?.id().to_string();

        match self.toggle_favorite.execute(&story_id) {
            Ok(favorite) => {
                self.reload(&story_id);
                Some(favorite)
            }
            Err(e) => {
                self.state.error = Some(e.to_string());
                None
            }
        }
    }

    /// Load the last requested story again.
    pub fn retry(&mut self) {
        if let Some(story_id) = self.story_id.clone() {
            self.load_story(&story_id);
        }
    }

    fn fetch(&self, story_id: &str) -> Result<StoryView, MythlyError> {
        self.stories
            .story_by_id(story_id)?
            .ok_or_else(|| MythlyError::NotFound(format!("Story not found: {story_id}")))
    }

    /// Refresh the story after a mutation without restarting the timer.
    fn reload(&mut self, story_id: &str) {
        match self.fetch(story_id) {
            Ok(story) => self.state.story = Some(story),
            Err(e) => self.state.error = Some(e.to_string()),
        }
    }
}
