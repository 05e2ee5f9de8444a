use colored::Colorize;

use crate::content::{LoadOutcome, StoryView};
use crate::progress::{format_reading_time, ReadingSession, UserStats};

fn deity_names(story: &StoryView) -> String {
    story
        .story
        .deities
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn status_icon(story: &StoryView) -> colored::ColoredString {
    if story.is_read {
        "[x]".green()
    } else {
        "[ ]".white()
    }
}

/// Format a list of stories as a pretty table
pub fn format_stories_pretty(stories: &[StoryView], title: &str) -> String {
    if stories.is_empty() {
        return format!("{title} (0 stories)\n  No stories");
    }

    let mut output = format!("{title} ({} stories)\n", stories.len());
    output.push_str(&"─".repeat(60));
    output.push('\n');

    for story in stories {
        let mut line = format!("{} {}", status_icon(story), story.story.title.bold());

        if story.is_favorite {
            line.push_str(&format!(" {}", "★".yellow()));
        }

        line.push_str(&format!("  {}", deity_names(story).cyan()));
        line.push_str(&format!("  {}", story.story.epic.to_string().dimmed()));
        line.push_str(&format!(
            "  {}",
            format!("{} min", story.story.read_time_minutes).dimmed()
        ));
        line.push_str(&format!("  {}", story.id().dimmed()));

        output.push_str(&line);
        output.push('\n');
    }

    output
}

/// Format a single story with its full text
pub fn format_story_pretty(story: &StoryView) -> String {
    let s = &story.story;
    let mut output = format!("{} {}\n", status_icon(story), s.title.bold());

    if let Some(sanskrit) = &s.sanskrit_title {
        output.push_str(&format!("    {}\n", sanskrit.italic()));
    }

    output.push_str(&format!("  {}: {}\n", "ID".dimmed(), s.id));
    output.push_str(&format!("  {}: {}\n", "Deities".dimmed(), deity_names(story)));
    output.push_str(&format!("  {}: {}\n", "Epic".dimmed(), s.epic));

    if !s.values.is_empty() {
        let values = s
            .values
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        output.push_str(&format!("  {}: {}\n", "Values".dimmed(), values));
    }

    output.push_str(&format!(
        "  {}: {} min\n",
        "Read time".dimmed(),
        s.read_time_minutes
    ));
    output.push_str(&format!(
        "  {}: {}\n",
        "Published".dimmed(),
        s.date_published.format("%Y-%m-%d")
    ));

    if story.is_favorite {
        output.push_str(&format!("  {}: {}\n", "Favorite".dimmed(), "★".yellow()));
    }

    if let Some(read_at) = &story.last_read_at {
        output.push_str(&format!(
            "  {}: {}\n",
            "Last read".dimmed(),
            read_at.format("%Y-%m-%d %H:%M")
        ));
    }

    if s.audio_url.is_some() {
        output.push_str(&format!("  {}: available\n", "Audio".dimmed()));
    }

    output.push('\n');
    output.push_str(&s.content);
    output.push_str("\n\n");
    output.push_str(&format!("{} {}\n", "Moral:".bold(), s.moral_lesson.italic()));

    if !s.related_story_ids.is_empty() {
        output.push_str(&format!(
            "  {}: {}\n",
            "Related".dimmed(),
            s.related_story_ids.join(", ")
        ));
    }

    output
}

/// Format today's story followed by a one-line streak summary
pub fn format_today_pretty(story: &StoryView, stats: &UserStats) -> String {
    let mut output = format!("{}\n", "Today's Story".bold().underline());
    output.push_str(&format_story_pretty(story));
    output.push('\n');
    output.push_str(&format!(
        "{} day streak · {} stories read\n",
        stats.current_streak.to_string().green().bold(),
        stats.total_stories_read
    ));
    output
}

/// Format user statistics as pretty output
pub fn format_stats_pretty(stats: &UserStats) -> String {
    let mut output = format!("{}\n", "Reading Stats".bold());
    output.push_str(&"─".repeat(40));
    output.push('\n');

    output.push_str(&format!(
        "  {}: {} days\n",
        "Current streak".dimmed(),
        stats.current_streak.to_string().green().bold()
    ));
    output.push_str(&format!(
        "  {}: {} days\n",
        "Longest streak".dimmed(),
        stats.longest_streak
    ));
    output.push_str(&format!(
        "  {}: {}\n",
        "Stories read".dimmed(),
        stats.total_stories_read
    ));
    output.push_str(&format!(
        "  {}: {} min\n",
        "Reading time".dimmed(),
        stats.total_reading_minutes
    ));

    let favorite = stats
        .favorite_deity
        .map_or_else(|| "-".to_string(), |d| d.to_string());
    output.push_str(&format!("  {}: {}\n", "Favorite deity".dimmed(), favorite));

    if let Some(last) = &stats.last_read_date {
        output.push_str(&format!(
            "  {}: {}\n",
            "Last read".dimmed(),
            last.format("%Y-%m-%d %H:%M")
        ));
    }

    output.push_str(&format!("  {}:", "Milestones".dimmed()));
    for (days, reached) in stats.milestones() {
        let badge = format!("{days}d");
        if reached {
            output.push_str(&format!(" {}", badge.yellow().bold()));
        } else {
            output.push_str(&format!(" {}", badge.dimmed()));
        }
    }
    output.push('\n');

    output
}

/// Format reading sessions as a list
pub fn format_sessions_pretty(sessions: &[ReadingSession], title: &str) -> String {
    if sessions.is_empty() {
        return format!("{title} (0 sessions)\n  No sessions");
    }

    let mut output = format!("{title} ({} sessions)\n", sessions.len());
    output.push_str(&"─".repeat(60));
    output.push('\n');

    for session in sessions {
        let mut line = format!(
            "{}  {}  {}",
            session.started_at.format("%Y-%m-%d %H:%M").to_string().dimmed(),
            session.story_id.bold(),
            format_reading_time(session.reading_seconds).cyan()
        );
        if session.used_audio {
            line.push_str(&format!("  {}", "audio".dimmed()));
        }
        output.push_str(&line);
        output.push('\n');
    }

    output
}

/// Confirmation for a recorded read
pub fn format_session_pretty(session: &ReadingSession) -> String {
    format!(
        "{} Marked {} as read ({})",
        "✓".green(),
        session.story_id.bold(),
        format_reading_time(session.reading_seconds)
    )
}

/// Confirmation for a content load
pub fn format_load_outcome_pretty(outcome: LoadOutcome) -> String {
    match outcome {
        LoadOutcome::Loaded { inserted } => {
            format!("{} Loaded {inserted} stories", "✓".green())
        }
        LoadOutcome::AlreadyLoaded { existing } => {
            format!("Library already loaded ({existing} stories)")
        }
    }
}
