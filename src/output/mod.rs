//! Output formatting for mythly.
//!
//! This module provides formatters for displaying stories, statistics and
//! reading sessions as colored text or JSON.

mod json;
mod pretty;

use crate::cli::args::OutputFormat;
use crate::content::{LoadOutcome, StoryView};
use crate::error::MythlyError;
use crate::progress::{ReadingSession, UserStats};

pub use json::*;
pub use pretty::*;

/// Format stories based on output format
///
/// # Errors
///
/// Returns `MythlyError::Json` if JSON serialization fails.
pub fn format_stories(
    stories: &[StoryView],
    title: &str,
    format: OutputFormat,
) -> Result<String, MythlyError> {
    match format {
        OutputFormat::Pretty => Ok(format_stories_pretty(stories, title)),
        OutputFormat::Json => format_stories_json(stories, title),
    }
}

/// Format a single story based on output format
///
/// # Errors
///
/// Returns `MythlyError::Json` if JSON serialization fails.
pub fn format_story(story: &StoryView, format: OutputFormat) -> Result<String, MythlyError> {
    match format {
        OutputFormat::Pretty => Ok(format_story_pretty(story)),
        OutputFormat::Json => format_story_json(story),
    }
}

/// Format today's story based on output format
///
/// # Errors
///
/// Returns `MythlyError::Json` if JSON serialization fails.
pub fn format_today(
    story: &StoryView,
    stats: &UserStats,
    format: OutputFormat,
) -> Result<String, MythlyError> {
    match format {
        OutputFormat::Pretty => Ok(format_today_pretty(story, stats)),
        OutputFormat::Json => format_today_json(story, stats),
    }
}

/// Format user statistics based on output format
///
/// # Errors
///
/// Returns `MythlyError::Json` if JSON serialization fails.
pub fn format_stats(stats: &UserStats, format: OutputFormat) -> Result<String, MythlyError> {
    match format {
        OutputFormat::Pretty => Ok(format_stats_pretty(stats)),
        OutputFormat::Json => format_stats_json(stats),
    }
}

/// Format reading sessions based on output format
///
/// # Errors
///
/// Returns `MythlyError::Json` if JSON serialization fails.
pub fn format_sessions(
    sessions: &[ReadingSession],
    title: &str,
    format: OutputFormat,
) -> Result<String, MythlyError> {
    match format {
        OutputFormat::Pretty => Ok(format_sessions_pretty(sessions, title)),
        OutputFormat::Json => format_sessions_json(sessions, title),
    }
}

/// Format a newly recorded session based on output format
///
/// # Errors
///
/// Returns `MythlyError::Json` if JSON serialization fails.
pub fn format_session(session: &ReadingSession, format: OutputFormat) -> Result<String, MythlyError> {
    match format {
        OutputFormat::Pretty => Ok(format_session_pretty(session)),
        OutputFormat::Json => to_json(session),
    }
}

/// Format a content load result based on output format
///
/// # Errors
///
/// Returns `MythlyError::Json` if JSON serialization fails.
pub fn format_load_outcome(
    outcome: LoadOutcome,
    format: OutputFormat,
) -> Result<String, MythlyError> {
    match format {
        OutputFormat::Pretty => Ok(format_load_outcome_pretty(outcome)),
        OutputFormat::Json => format_load_outcome_json(outcome),
    }
}
