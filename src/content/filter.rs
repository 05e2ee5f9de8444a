//! Story selection: the in-memory library filter and the store queries.

use serde::{Deserialize, Serialize};

use super::types::{Deity, Epic, StoryView};

/// Library filter chosen by the reader.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum LibraryFilter {
    #[default]
    All,
    ByDeity(Deity),
    ByEpic(Epic),
    Read,
    Favorites,
}

impl LibraryFilter {
    /// Whether `story` passes the filter.
    #[must_use]
    pub fn matches(self, story: &StoryView) -> bool {
        match self {
            Self::All => true,
            Self::ByDeity(deity) => story.story.features(deity),
            Self::ByEpic(epic) => story.story.epic == epic,
            Self::Read => story.is_read,
            Self::Favorites => story.is_favorite,
        }
    }

    /// Keep the stories that pass, preserving order.
    #[must_use]
    pub fn apply(self, stories: &[StoryView]) -> Vec<StoryView> {
        stories
            .iter()
            .filter(|s| self.matches(s))
            .cloned()
            .collect()
    }
}

impl std::fmt::Display for LibraryFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "All Stories"),
            Self::ByDeity(deity) => write!(f, "{deity}"),
            Self::ByEpic(epic) => write!(f, "{epic}"),
            Self::Read => write!(f, "Read"),
            Self::Favorites => write!(f, "Favorites"),
        }
    }
}

/// A query the story store can answer and keep answering.
///
/// Ordering: `Read` is most recently read first, everything else is newest
/// publish date first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoryQuery {
    All,
    ByDeity(Deity),
    ByEpic(Epic),
    /// Substring of title or body, ASCII case-insensitive.
    Search(String),
    Read,
    Favorites,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::loader::{fixtures::SAMPLE_DOCUMENT, parse_stories};

    fn views() -> Vec<StoryView> {
        let mut views: Vec<StoryView> = parse_stories(SAMPLE_DOCUMENT)
            .unwrap()
            .into_iter()
            .map(StoryView::unread)
            .collect();
        views[0].is_read = true;
        views[2].is_favorite = true;
        views
    }

    #[test]
    fn test_filter_by_deity_checks_every_deity() {
        let stories = views();
        let rama = LibraryFilter::ByDeity(Deity::Rama).apply(&stories);
        assert_eq!(rama.len(), 1);
        assert_eq!(rama[0].id(), "hanuman-leap");
    }

    #[test]
    fn test_filter_by_epic() {
        let stories = views();
        let shiva = LibraryFilter::ByEpic(Epic::ShivaPurana).apply(&stories);
        assert_eq!(shiva.len(), 1);
        assert_eq!(shiva[0].id(), "ganesha-race");
    }

    #[test]
    fn test_filter_flags() {
        let stories = views();
        assert_eq!(LibraryFilter::All.apply(&stories).len(), 3);
        assert_eq!(LibraryFilter::Read.apply(&stories)[0].id(), "krishna-govardhan");
        assert_eq!(LibraryFilter::Favorites.apply(&stories)[0].id(), "ganesha-race");
    }

    #[test]
    fn test_filter_display() {
        assert_eq!(LibraryFilter::All.to_string(), "All Stories");
        assert_eq!(LibraryFilter::ByEpic(Epic::Other).to_string(), "Other Puranas");
    }
}
