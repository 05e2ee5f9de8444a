//! Wiring of the store, repositories and clock behind the command line.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::Config;
use crate::core::{Clock, SystemClock};
use crate::error::MythlyError;
use crate::repository::{LocalStoryRepository, LocalUserRepository, StoryRepository, UserRepository};
use crate::storage::Database;
use crate::usecase::ContentSource;

/// Everything a command needs, opened once per process.
pub struct App {
    pub stories: Arc<dyn StoryRepository>,
    pub users: Arc<dyn UserRepository>,
    pub clock: Arc<dyn Clock>,
    pub config: Config,
}

impl App {
    /// Open the database at `database`, or the default location under
    /// `~/.mythly/` when `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open(database: Option<&Path>, config: Config) -> Result<Self, MythlyError> {
        let db = match database {
            Some(path) => Database::open_at(path)?,
            None => Database::open()?,
        };
        Ok(Self::with_database(db, config))
    }

    /// Build on an already opened database.
    #[must_use]
    pub fn with_database(db: Database, config: Config) -> Self {
        let db = Arc::new(db);
        Self {
            stories: Arc::new(LocalStoryRepository::new(Arc::clone(&db))),
            users: Arc::new(LocalUserRepository::new(db)),
            clock: Arc::new(SystemClock),
            config,
        }
    }

    /// The content document to seed from: `file` if given, else the
    /// configured `content.path`.
    #[must_use]
    pub fn content_source(&self, file: Option<PathBuf>) -> ContentSource {
        file.or_else(|| self.config.content.path.clone())
            .map_or(ContentSource::Unconfigured, ContentSource::File)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("library.db");

        let app = App::open(Some(&path), Config::default()).unwrap();

        assert!(path.exists());
        assert_eq!(app.stories.count_stories().unwrap(), 0);
    }

    #[test]
    fn test_content_source_precedence() {
        let mut config = Config::default();
        let app = App::with_database(Database::open_in_memory().unwrap(), config.clone());
        assert_eq!(app.content_source(None), ContentSource::Unconfigured);

        config.content.path = Some(PathBuf::from("/etc/mythly/stories.json"));
        let app = App::with_database(Database::open_in_memory().unwrap(), config);
        assert_eq!(
            app.content_source(None),
            ContentSource::File(PathBuf::from("/etc/mythly/stories.json"))
        );
        assert_eq!(
            app.content_source(Some(PathBuf::from("local.json"))),
            ContentSource::File(PathBuf::from("local.json"))
        );
    }
}
