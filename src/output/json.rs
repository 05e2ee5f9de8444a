//! JSON output formatting for mythly.

use serde::Serialize;
use serde_json::json;

use crate::content::{LoadOutcome, StoryView};
use crate::error::MythlyError;
use crate::progress::{ReadingSession, UserStats};

/// Format stories as JSON
///
/// # Errors
///
/// Returns `MythlyError::Json` if JSON serialization fails.
pub fn format_stories_json(stories: &[StoryView], title: &str) -> Result<String, MythlyError> {
    let output = json!({
        "list": title,
        "count": stories.len(),
        "items": stories
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format a single story as JSON
///
/// # Errors
///
/// Returns `MythlyError::Json` if JSON serialization fails.
pub fn format_story_json(story: &StoryView) -> Result<String, MythlyError> {
    Ok(serde_json::to_string_pretty(story)?)
}

/// Format today's story together with the stats summary
///
/// # Errors
///
/// Returns `MythlyError::Json` if JSON serialization fails.
pub fn format_today_json(story: &StoryView, stats: &UserStats) -> Result<String, MythlyError> {
    let output = json!({
        "story": story,
        "stats": stats
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format user statistics as JSON
///
/// # Errors
///
/// Returns `MythlyError::Json` if JSON serialization fails.
pub fn format_stats_json(stats: &UserStats) -> Result<String, MythlyError> {
    Ok(serde_json::to_string_pretty(stats)?)
}

/// Format reading sessions as JSON
///
/// # Errors
///
/// Returns `MythlyError::Json` if JSON serialization fails.
pub fn format_sessions_json(
    sessions: &[ReadingSession],
    title: &str,
) -> Result<String, MythlyError> {
    let output = json!({
        "list": title,
        "count": sessions.len(),
        "items": sessions
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format the result of a content load as JSON
///
/// # Errors
///
/// Returns `MythlyError::Json` if JSON serialization fails.
pub fn format_load_outcome_json(outcome: LoadOutcome) -> Result<String, MythlyError> {
    let output = match outcome {
        LoadOutcome::Loaded { inserted } => json!({ "status": "loaded", "count": inserted }),
        LoadOutcome::AlreadyLoaded { existing } => {
            json!({ "status": "already_loaded", "count": existing })
        }
    };
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Generic JSON formatter for any serializable type
///
/// # Errors
///
/// Returns `MythlyError::Json` if JSON serialization fails.
pub fn to_json<T: Serialize>(value: &T) -> Result<String, MythlyError> {
    Ok(serde_json::to_string_pretty(value)?)
}
