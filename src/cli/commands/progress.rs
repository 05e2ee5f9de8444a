//! Progress commands: recording reads, statistics and the session log.

use crate::app::App;
use crate::cli::args::{OutputFormat, ReadArgs, SessionsArgs};
use crate::error::MythlyError;
use crate::output::{format_session, format_sessions, format_stats};
use crate::presentation::ProfileModel;
use crate::usecase::MarkStoryRead;

/// Execute read command
///
/// # Errors
///
/// Returns `MythlyError::NotFound` for an unknown story, or a store error if
/// any update fails.
pub fn read(app: &App, args: &ReadArgs, format: OutputFormat) -> Result<String, MythlyError> {
    if app.stories.story_by_id(&args.id)?.is_none() {
        return Err(MythlyError::NotFound(format!("Story not found: {}", args.id)));
    }

    let session = MarkStoryRead::new(app.stories.clone(), app.users.clone(), app.clock.clone())
        .execute(&args.id, args.seconds, args.audio)?;
    format_session(&session, format)
}

/// Execute stats command
///
/// # Errors
///
/// Returns an error if the statistics cannot be read.
pub fn stats(app: &App, format: OutputFormat) -> Result<String, MythlyError> {
    let model = ProfileModel::new(app.users.clone(), app.config.profile.recent_sessions_limit);
    let state = model.state();

    if let Some(error) = &state.error {
        return Err(MythlyError::Reported(error.clone()));
    }
    format_stats(&state.user_stats, format)
}

/// Execute sessions command
///
/// # Errors
///
/// Returns an error if the session log cannot be read.
pub fn sessions(app: &App, args: &SessionsArgs, format: OutputFormat) -> Result<String, MythlyError> {
    if let Some(story_id) = &args.story {
        let sessions = app.users.sessions_for_story(story_id)?;
        return format_sessions(&sessions, &format!("Sessions for {story_id}"), format);
    }

    let limit = args
        .limit
        .unwrap_or(app.config.profile.recent_sessions_limit);
    let model = ProfileModel::new(app.users.clone(), limit);
    let state = model.state();

    if let Some(error) = &state.error {
        return Err(MythlyError::Reported(error.clone()));
    }
    format_sessions(&state.recent_sessions, "Recent Sessions", format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::content::loader::fixtures::SAMPLE_DOCUMENT;
    use crate::storage::Database;

    fn seeded_app() -> App {
        let app = App::with_database(Database::open_in_memory().unwrap(), Config::default());
        crate::content::load_initial_content(app.stories.as_ref(), SAMPLE_DOCUMENT).unwrap();
        app
    }

    fn read_args(id: &str, seconds: u32) -> ReadArgs {
        ReadArgs {
            id: id.to_string(),
            seconds,
            audio: false,
        }
    }

    #[test]
    fn test_read_then_stats() {
        let app = seeded_app();

        let output = read(&app, &read_args("ganesha-race", 130), OutputFormat::Pretty).unwrap();
        assert!(output.contains("ganesha-race"));
        assert!(output.contains("2m 10s"));

        let stats = stats(&app, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&stats).unwrap();
        assert_eq!(value["total_stories_read"], 1);
        assert_eq!(value["total_reading_minutes"], 2);
        assert_eq!(value["favorite_deity"], "GANESHA");
    }

    #[test]
    fn test_read_unknown_story() {
        let app = seeded_app();
        let err = read(&app, &read_args("nope", 10), OutputFormat::Pretty).unwrap_err();

        assert!(matches!(err, MythlyError::NotFound(_)));
        assert_eq!(app.users.user_stats().unwrap().total_stories_read, 0);
    }

    #[test]
    fn test_sessions_recent_and_per_story() {
        let app = seeded_app();
        read(&app, &read_args("ganesha-race", 60), OutputFormat::Pretty).unwrap();
        read(&app, &read_args("hanuman-leap", 60), OutputFormat::Pretty).unwrap();

        let recent = SessionsArgs {
            story: None,
            limit: Some(1),
        };
        let value: serde_json::Value =
            serde_json::from_str(&sessions(&app, &recent, OutputFormat::Json).unwrap()).unwrap();
        assert_eq!(value["count"], 1);

        let per_story = SessionsArgs {
            story: Some("ganesha-race".to_string()),
            limit: None,
        };
        let output = sessions(&app, &per_story, OutputFormat::Pretty).unwrap();
        assert!(output.contains("Sessions for ganesha-race (1 sessions)"));
    }
}
