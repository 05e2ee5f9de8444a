//! Story content: types, filters and the bundled-document loader.

pub mod filter;
pub mod loader;
pub mod types;

pub use filter::{LibraryFilter, StoryQuery};
pub use loader::{load_initial_content, parse_stories, LoadOutcome};
pub use types::{Deity, Epic, Story, StoryView, Value};
