//! One-time seeding of the story store from the bundled JSON document.
//!
//! The document is either `{"stories": [...]}` or a bare list of story
//! objects. Keys are camelCase; unknown keys are ignored. A story names its
//! deities with `deity` (one) or `deities` (a list); when both appear they are
//! merged.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value as Json;

use super::types::{Deity, Epic, Story, Value};
use crate::error::MythlyError;
use crate::repository::StoryRepository;

/// What a load attempt did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The store was empty and this many stories were inserted.
    Loaded { inserted: usize },
    /// The store already held stories; nothing was parsed or written.
    AlreadyLoaded { existing: usize },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoryRecord {
    id: String,
    title: String,
    content: String,
    moral_lesson: String,
    #[serde(default)]
    deity: Option<Deity>,
    #[serde(default)]
    deities: Option<Vec<Deity>>,
    epic: Epic,
    values: Vec<Value>,
    image_url: String,
    read_time_minutes: u32,
    date_published: i64,
    #[serde(default)]
    audio_url: Option<String>,
    #[serde(default)]
    sanskrit_title: Option<String>,
    #[serde(default)]
    related_story_ids: Option<Vec<String>>,
}

impl StoryRecord {
    fn into_story(self) -> Result<Story, String> {
        if self.id.trim().is_empty() {
            return Err("empty `id`".to_string());
        }
        if self.title.trim().is_empty() {
            return Err(format!("story '{}' has an empty `title`", self.id));
        }

        let mut deities: Vec<Deity> = Vec::new();
        for deity in self.deity.into_iter().chain(self.deities.into_iter().flatten()) {
            if !deities.contains(&deity) {
                deities.push(deity);
            }
        }
        if deities.is_empty() {
            return Err(format!("story '{}' is missing field `deity`", self.id));
        }

        let date_published = DateTime::<Utc>::from_timestamp_millis(self.date_published)
            .ok_or_else(|| {
                format!(
                    "story '{}' has an out-of-range `datePublished`: {}",
                    self.id, self.date_published
                )
            })?;

        Ok(Story {
            id: self.id,
            title: self.title,
            content: self.content,
            moral_lesson: self.moral_lesson,
            deities,
            epic: self.epic,
            values: self.values,
            image_url: self.image_url,
            audio_url: self.audio_url,
            sanskrit_title: self.sanskrit_title,
            related_story_ids: self.related_story_ids.unwrap_or_default(),
            read_time_minutes: self.read_time_minutes,
            date_published,
        })
    }
}

/// Parse and validate a content document.
///
/// # Errors
///
/// Returns `MythlyError::Content` if the JSON is malformed, a required field
/// is missing or has the wrong type, an enum name is unknown, or two stories
/// share an id.
pub fn parse_stories(json: &str) -> Result<Vec<Story>, MythlyError> {
    let document: Json = serde_json::from_str(json)
        .map_err(|e| MythlyError::Content(format!("Malformed content document: {e}")))?;

    let items = match document {
        Json::Array(items) => items,
        Json::Object(mut map) => match map.remove("stories") {
            Some(Json::Array(items)) => items,
            Some(_) => {
                return Err(MythlyError::Content(
                    "`stories` must be a list".to_string(),
                ))
            }
            None => {
                return Err(MythlyError::Content(
                    "Content document has no `stories` list".to_string(),
                ))
            }
        },
        _ => {
            return Err(MythlyError::Content(
                "Content document must be a list or an object with `stories`".to_string(),
            ))
        }
    };

    let mut seen = HashSet::new();
    let mut stories = Vec::with_capacity(items.len());

    for (index, item) in items.into_iter().enumerate() {
        let record: StoryRecord = serde_json::from_value(item)
            .map_err(|e| MythlyError::Content(format!("Story #{index}: {e}")))?;
        let story = record
            .into_story()
            .map_err(|e| MythlyError::Content(format!("Story #{index}: {e}")))?;

        if !seen.insert(story.id.clone()) {
            return Err(MythlyError::Content(format!(
                "Story #{index}: duplicate id '{}'",
                story.id
            )));
        }
        stories.push(story);
    }

    Ok(stories)
}

/// Seed the store from `json` unless it already holds stories.
///
/// # Errors
///
/// Returns `MythlyError::Content` for an invalid document and
/// `MythlyError::Database` if counting or inserting fails.
pub fn load_initial_content<R>(repo: &R, json: &str) -> Result<LoadOutcome, MythlyError>
where
    R: StoryRepository + ?Sized,
{
    tracing::debug!("Loading initial content...");

    let existing = repo.count_stories()?;
    if existing > 0 {
        tracing::info!("Stories already loaded. Count: {existing}");
        return Ok(LoadOutcome::AlreadyLoaded { existing });
    }

    let stories = parse_stories(json).inspect_err(|e| {
        tracing::error!("Failed to load initial content: {e}");
    })?;
    tracing::info!("Parsed {} stories from JSON", stories.len());

    let inserted = repo.insert_stories(&stories)?;
    tracing::info!("Successfully loaded {inserted} stories into database");

    Ok(LoadOutcome::Loaded { inserted })
}

#[cfg(test)]
pub(crate) mod fixtures {
    /// A small but complete content document used across tests.
    pub const SAMPLE_DOCUMENT: &str = r#"{
        "stories": [
            {
                "id": "krishna-govardhan",
                "title": "Krishna Lifts Govardhan",
                "content": "The villagers of Vraja sheltered beneath the hill.",
                "moralLesson": "Faith protects those who hold it.",
                "deity": "KRISHNA",
                "epic": "BHAGAVATA_PURANA",
                "values": ["DEVOTION", "COURAGE"],
                "imageUrl": "images/govardhan.png",
                "readTimeMinutes": 4,
                "datePublished": 1704067200000,
                "sanskritTitle": "Govardhana Lila"
            },
            {
                "id": "hanuman-leap",
                "title": "Hanuman's Leap",
                "content": "He crossed the ocean to Lanka in a single bound.",
                "moralLesson": "Know your own strength.",
                "deities": ["HANUMAN", "RAMA"],
                "epic": "RAMAYANA",
                "values": ["COURAGE", "LOYALTY"],
                "imageUrl": "images/leap.png",
                "audioUrl": "audio/leap.mp3",
                "readTimeMinutes": 5,
                "datePublished": 1704153600000,
                "relatedStoryIds": ["rama-bridge"]
            },
            {
                "id": "ganesha-race",
                "title": "The Race Around the World",
                "content": "Ganesha circled his parents while Kartikeya flew off. 100% devotion.",
                "moralLesson": "Wisdom over speed.",
                "deity": "GANESHA",
                "epic": "SHIVA_PURANA",
                "values": ["WISDOM"],
                "imageUrl": "images/race.png",
                "readTimeMinutes": 3,
                "datePublished": 1704240000000,
                "ignoredExtraKey": true
            }
        ]
    }"#;
}
