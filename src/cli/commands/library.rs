//! Library commands: seeding, today's story, browsing and favorites.

use std::path::PathBuf;

use colored::Colorize;
use serde_json::json;

use crate::app::App;
use crate::cli::args::{LibraryArgs, OutputFormat};
use crate::error::MythlyError;
use crate::output::{format_load_outcome, format_stories, format_story, format_today, to_json};
use crate::presentation::{LibraryModel, ReaderModel, TodayModel};
use crate::usecase::{LoadInitialContent, ToggleFavorite};

/// Execute load command
///
/// # Errors
///
/// Returns an error if no document is available, it is invalid, or the
/// insert fails.
pub fn load(app: &App, file: Option<PathBuf>, format: OutputFormat) -> Result<String, MythlyError> {
    let outcome = LoadInitialContent::new(app.stories.clone(), app.content_source(file)).execute()?;
    format_load_outcome(outcome, format)
}

/// Execute today command
///
/// # Errors
///
/// Returns an error if the library is empty and cannot be seeded.
pub fn today(app: &App, format: OutputFormat) -> Result<String, MythlyError> {
    let model = TodayModel::new(
        app.stories.clone(),
        app.users.clone(),
        app.content_source(None),
    );
    let state = model.state();

    match (&state.today_story, &state.error) {
        (Some(story), _) => format_today(story, &state.user_stats, format),
        (None, Some(error)) => Err(MythlyError::Reported(error.clone())),
        (None, None) => Err(MythlyError::NotFound("No stories available".to_string())),
    }
}

/// Execute library command
///
/// # Errors
///
/// Returns an error if the store query fails or output formatting fails.
pub fn library(app: &App, args: &LibraryArgs, format: OutputFormat) -> Result<String, MythlyError> {
    let mut model = LibraryModel::new(app.stories.clone());
    model.set_filter(args.filter());
    if let Some(search) = &args.search {
        model.set_search_query(search.as_str());
    }

    let state = model.state();
    if let Some(error) = &state.error {
        return Err(MythlyError::Reported(error.clone()));
    }

    let title = state.active_search().map_or_else(
        || state.current_filter.to_string(),
        |search| format!("Search \"{search}\""),
    );
    format_stories(&state.filtered_stories, &title, format)
}

/// Execute show command
///
/// # Errors
///
/// Returns `MythlyError::Reported` if the story does not exist.
pub fn show(app: &App, id: &str, format: OutputFormat) -> Result<String, MythlyError> {
    let mut model = ReaderModel::new(app.stories.clone(), app.users.clone(), app.clock.clone());
    model.load_story(id);

    let state = model.state();
    match (&state.story, &state.error) {
        (Some(story), _) => format_story(story, format),
        (None, error) => Err(MythlyError::Reported(
            error.clone().unwrap_or_else(|| format!("Story not found: {id}")),
        )),
    }
}

/// Execute favorite command
///
/// # Errors
///
/// Returns `MythlyError::NotFound` if the story does not exist.
pub fn favorite(app: &App, id: &str, format: OutputFormat) -> Result<String, MythlyError> {
    let is_favorite = ToggleFavorite::new(app.stories.clone()).execute(id)?;

    match format {
        OutputFormat::Json => to_json(&json!({ "id": id, "is_favorite": is_favorite })),
        OutputFormat::Pretty => Ok(if is_favorite {
            format!("{} Added {} to favorites", "★".yellow(), id.bold())
        } else {
            format!("Removed {} from favorites", id.bold())
        }),
    }
}
