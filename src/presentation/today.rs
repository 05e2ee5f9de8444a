//! The "today" screen: content seeding, the featured story and a stats summary.

use std::sync::Arc;

use serde::Serialize;

use super::{drain_into, settle, Drained};
use crate::content::StoryView;
use crate::core::Subscription;
use crate::progress::UserStats;
use crate::repository::{StatsUpdate, StoryRepository, UserRepository};
use crate::usecase::{ContentSource, GetTodayStory, LoadInitialContent};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TodayState {
    pub is_loading: bool,
    pub today_story: Option<StoryView>,
    pub user_stats: UserStats,
    pub error: Option<String>,
}

pub struct TodayModel {
    load_content: LoadInitialContent,
    today_story: GetTodayStory,
    users: Arc<dyn UserRepository>,
    stats: Option<Subscription<StatsUpdate>>,
    state: TodayState,
}

impl TodayModel {
    /// Seed the store if needed, then pick today's story.
    #[must_use]
    pub fn new(
        stories: Arc<dyn StoryRepository>,
        users: Arc<dyn UserRepository>,
        source: ContentSource,
    ) -> Self {
        let mut model = Self {
            load_content: LoadInitialContent::new(Arc::clone(&stories), source),
            today_story: GetTodayStory::new(stories),
            users,
            stats: None,
            state: TodayState::default(),
        };
        model.load();
        model
    }

    #[must_use]
    pub const fn state(&self) -> &TodayState {
        &self.state
    }

    /// Pull in any pushed statistics changes.
    pub fn refresh(&mut self) {
        let stats = drain_into(self.stats.as_ref(), &mut self.state.user_stats);
        // A failed load keeps its message until retry().
        if self.state.today_story.is_some() || matches!(stats, Drained::Failed(_)) {
            settle(&mut self.state.error, [stats]);
        }
    }

    pub fn retry(&mut self) {
        self.load();
    }

    fn load(&mut self) {
        self.state.is_loading = true;
        self.state.error = None;

        if let Err(e) = self.load_content.execute() {
            tracing::error!("Failed to load content: {e}");
            self.state.error = Some(e.to_string());
            self.state.today_story = None;
            self.state.is_loading = false;
            return;
        }

        if self.stats.is_none() {
            self.stats = Some(self.users.subscribe_stats());
        }
        self.refresh();

        self.state.today_story = match self.today_story.execute() {
            Ok(story) => Some(story),
            Err(e) => {
                self.state.error = Some(e.to_string());
                None
            }
        };
        self.state.is_loading = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::loader::fixtures::SAMPLE_DOCUMENT;
    use crate::repository::{LocalStoryRepository, LocalUserRepository};
    use crate::storage::Database;
    use chrono::Utc;

    fn repos() -> (Arc<LocalStoryRepository>, Arc<LocalUserRepository>) {
        let db = Arc::new(Database::open_in_memory().unwrap());
        (
            Arc::new(LocalStoryRepository::new(Arc::clone(&db))),
            Arc::new(LocalUserRepository::new(db)),
        )
    }

    #[test]
    fn test_loads_content_and_picks_story() {
        let (stories, users) = repos();
        let model = TodayModel::new(
            stories.clone(),
            users,
            ContentSource::Text(SAMPLE_DOCUMENT.to_string()),
        );

        let state = model.state();
        assert!(!state.is_loading);
        assert_eq!(state.error, None);
        assert!(state.today_story.is_some());
        assert_eq!(state.user_stats, UserStats::default());
        assert_eq!(stories.count_stories().unwrap(), 3);
    }

    #[test]
    fn test_refresh_picks_up_stats_changes() {
        let (stories, users) = repos();
        let mut model = TodayModel::new(
            stories,
            users.clone(),
            ContentSource::Text(SAMPLE_DOCUMENT.to_string()),
        );

        users.update_streak(Utc::now()).unwrap();
        model.refresh();

        assert_eq!(model.state().user_stats.current_streak, 1);
    }

    #[test]
    fn test_bad_content_sets_error_and_retry_recovers() {
        let (stories, users) = repos();
        let mut model = TodayModel::new(
            stories.clone(),
            users,
            ContentSource::Text("not json".to_string()),
        );

        assert!(model.state().error.is_some());
        assert!(model.state().today_story.is_none());
        assert!(!model.state().is_loading);

        stories
            .insert_stories(&crate::content::parse_stories(SAMPLE_DOCUMENT).unwrap())
            .unwrap();
        model.retry();

        assert_eq!(model.state().error, None);
        assert!(model.state().today_story.is_some());
    }

    #[test]
    fn test_empty_document_reports_no_story() {
        let (stories, users) = repos();
        let model = TodayModel::new(stories, users, ContentSource::Text("[]".to_string()));

        assert!(model.state().today_story.is_none());
        assert_eq!(
            model.state().error.as_deref(),
            Some("Not found: No stories available")
        );
    }
}
