//! Reading and curating the story library.

use std::path::PathBuf;
use std::sync::Arc;

use crate::content::{load_initial_content, LoadOutcome, StoryView};
use crate::error::MythlyError;
use crate::repository::StoryRepository;

/// Where the seed document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentSource {
    /// Document text already in memory.
    Text(String),
    /// A JSON file on disk.
    File(PathBuf),
    /// No document was named; loading into an empty store fails.
    Unconfigured,
}

impl ContentSource {
    fn read(&self) -> Result<String, MythlyError> {
        match self {
            Self::Text(text) => Ok(text.clone()),
            Self::File(path) => std::fs::read_to_string(path).map_err(|e| {
                MythlyError::Content(format!("Failed to read {}: {e}", path.display()))
            }),
            Self::Unconfigured => Err(MythlyError::Config(
                "No content document configured; pass --file or set content.path".to_string(),
            )),
        }
    }
}

/// Seeds the store on first run.
pub struct LoadInitialContent {
    stories: Arc<dyn StoryRepository>,
    source: ContentSource,
}

impl LoadInitialContent {
    #[must_use]
    pub fn new(stories: Arc<dyn StoryRepository>, source: ContentSource) -> Self {
        Self { stories, source }
    }

    /// Load the document unless the store already has stories.
    ///
    /// The source is not read at all when the store is populated.
    ///
    /// # Errors
    ///
    /// Returns `MythlyError::Content` if the source cannot be read or parsed.
    pub fn execute(&self) -> Result<LoadOutcome, MythlyError> {
        let existing = self.stories.count_stories()?;
        if existing > 0 {
            tracing::info!("Stories already loaded. Count: {existing}");
            return Ok(LoadOutcome::AlreadyLoaded { existing });
        }

        let json = self.source.read()?;
        load_initial_content(self.stories.as_ref(), &json)
    }
}

/// Picks the story to feature today.
pub struct GetTodayStory {
    stories: Arc<dyn StoryRepository>,
}

impl GetTodayStory {
    #[must_use]
    pub fn new(stories: Arc<dyn StoryRepository>) -> Self {
        Self { stories }
    }

    /// A uniformly random story from the library.
    ///
    /// # Errors
    ///
    /// Returns `MythlyError::NotFound` when the library is empty.
    pub fn execute(&self) -> Result<StoryView, MythlyError> {
        tracing::debug!("Getting today's story");

        let story = self
            .stories
            .random_story()?
            .ok_or_else(|| MythlyError::NotFound("No stories available".to_string()))
            .inspect_err(|e| tracing::error!("Failed to get today's story: {e}"))?;

        tracing::info!("Today's story: {}", story.story.title);
        Ok(story)
    }
}

/// Flips the favorite flag of a story.
pub struct ToggleFavorite {
    stories: Arc<dyn StoryRepository>,
}

impl ToggleFavorite {
    #[must_use]
    pub fn new(stories: Arc<dyn StoryRepository>) -> Self {
        Self { stories }
    }

    /// Toggle and return the new favorite state.
    ///
    /// # Errors
    ///
    /// Returns `MythlyError::NotFound` for an unknown story id.
    pub fn execute(&self, story_id: &str) -> Result<bool, MythlyError> {
        let story = self
            .stories
            .story_by_id(story_id)?
            .ok_or_else(|| MythlyError::NotFound(format!("Story not found: {story_id}")))?;

        let favorite = !story.is_favorite;
        self.stories.set_favorite(story_id, favorite)?;
        tracing::info!("Favorite toggled for {story_id}: {favorite}");
        Ok(favorite)
    }
}
