//! The library screen: every story plus a filtered or searched view.

use std::sync::Arc;

use serde::Serialize;

use super::{drain_into, settle};
use crate::content::{LibraryFilter, StoryQuery, StoryView};
use crate::core::Subscription;
use crate::repository::{StoryRepository, StoryUpdate};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LibraryState {
    pub is_loading: bool,
    pub stories: Vec<StoryView>,
    pub filtered_stories: Vec<StoryView>,
    pub search_query: String,
    pub current_filter: LibraryFilter,
    pub error: Option<String>,
}

impl LibraryState {
    /// The trimmed search text, `None` when blank.
    #[must_use]
    pub fn active_search(&self) -> Option<&str> {
        Some(self.search_query.trim()).filter(|q| !q.is_empty())
    }
}

/// Holds every story and derives the visible list from it.
///
/// The filter is applied in memory, so filtered lists keep the newest-first
/// publish order. A non-blank search replaces the filter and is answered by
/// its own store subscription.
pub struct LibraryModel {
    stories: Arc<dyn StoryRepository>,
    all: Option<Subscription<StoryUpdate>>,
    search: Option<Subscription<StoryUpdate>>,
    state: LibraryState,
}

impl LibraryModel {
    #[must_use]
    pub fn new(stories: Arc<dyn StoryRepository>) -> Self {
        let mut model = Self {
            stories,
            all: None,
            search: None,
            state: LibraryState::default(),
        };
        model.load();
        model
    }

    #[must_use]
    pub const fn state(&self) -> &LibraryState {
        &self.state
    }

    /// Search titles and bodies. A blank query goes back to the filter.
    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.state.search_query = query.into();
        self.resubscribe_search();
    }

    pub fn set_filter(&mut self, filter: LibraryFilter) {
        self.state.current_filter = filter;
        self.apply_filter();
    }

    /// Pull in any pushed store changes.
    pub fn refresh(&mut self) {
        let all = drain_into(self.all.as_ref(), &mut self.state.stories);
        let search = drain_into(self.search.as_ref(), &mut self.state.filtered_stories);
        settle(&mut self.state.error, [all, search]);
        self.apply_filter();
    }

    pub fn retry(&mut self) {
        self.load();
    }

    fn load(&mut self) {
        self.state.is_loading = true;
        self.state.error = None;
        self.all = Some(self.stories.subscribe(StoryQuery::All));
        self.resubscribe_search();
        self.state.is_loading = false;
    }

    fn resubscribe_search(&mut self) {
        // Drop the old subscription first so it stops receiving pushes.
        self.search = None;
        if let Some(text) = self.state.active_search() {
            tracing::debug!("Library search: {text}");
            self.search = Some(self.stories.subscribe(StoryQuery::Search(text.to_string())));
        }
        self.refresh();
    }

    fn apply_filter(&mut self) {
        if self.search.is_none() {
            self.state.filtered_stories = self.state.current_filter.apply(&self.state.stories);
        }
    }
}
