//! Application operations built on the repositories.

mod library;
mod mark_read;

pub use library::{ContentSource, GetTodayStory, LoadInitialContent, ToggleFavorite};
pub use mark_read::MarkStoryRead;
