//! Story content types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Generates a closed name list with a display name and upper snake case
/// storage/JSON names.
macro_rules! catalog_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $label:literal {
            $($variant:ident => $code:literal, $display:literal;)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[doc = $display]
                #[serde(rename = $code)]
                $variant,
            )+
        }

        impl $name {
            /// Every variant in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Human readable name.
            #[must_use]
            pub const fn display_name(self) -> &'static str {
                match self {
                    $(Self::$variant => $display,)+
                }
            }

            /// Name used in the database and content document.
            #[must_use]
            pub const fn code(self) -> &'static str {
                match self {
                    $(Self::$variant => $code,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.display_name())
            }
        }

        impl FromStr for $name {
            type Err = String;

            /// Accepts the stored code or the display name, case-insensitively.
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| {
                        v.code().eq_ignore_ascii_case(wanted)
                            || v.display_name().eq_ignore_ascii_case(wanted)
                            || v.code().replace('_', "-").eq_ignore_ascii_case(wanted)
                    })
                    .ok_or_else(|| format!("Unknown {}: {wanted}", $label))
            }
        }
    };
}

catalog_enum! {
    /// A mythological figure a story is about.
    Deity, "deity" {
        Krishna => "KRISHNA", "Krishna";
        Rama => "RAMA", "Rama";
        Shiva => "SHIVA", "Shiva";
        Ganesha => "GANESHA", "Ganesha";
        Durga => "DURGA", "Durga";
        Hanuman => "HANUMAN", "Hanuman";
        Vishnu => "VISHNU", "Vishnu";
        Brahma => "BRAHMA", "Brahma";
        Lakshmi => "LAKSHMI", "Lakshmi";
        Saraswati => "SARASWATI", "Saraswati";
        Other => "OTHER", "Other";
    }
}

catalog_enum! {
    /// The source text or collection a story comes from.
    Epic, "epic" {
        Ramayana => "RAMAYANA", "Ramayana";
        Mahabharata => "MAHABHARATA", "Mahabharata";
        BhagavataPurana => "BHAGAVATA_PURANA", "Bhagavata Purana";
        ShivaPurana => "SHIVA_PURANA", "Shiva Purana";
        DeviMahatmya => "DEVI_MAHATMYA", "Devi Mahatmya";
        BhagavadGita => "BHAGAVAD_GITA", "Bhagavad Gita";
        Folklore => "FOLKLORE", "Folklore";
        Other => "OTHER", "Other Puranas";
    }
}

catalog_enum! {
    /// A virtue or theme a story illustrates.
    Value, "value" {
        Devotion => "DEVOTION", "Devotion";
        Courage => "COURAGE", "Courage";
        Wisdom => "WISDOM", "Wisdom";
        Dharma => "DHARMA", "Dharma";
        Compassion => "COMPASSION", "Compassion";
        Truth => "TRUTH", "Truth";
        Duty => "DUTY", "Duty";
        Humility => "HUMILITY", "Humility";
        Perseverance => "PERSEVERANCE", "Perseverance";
        Loyalty => "LOYALTY", "Loyalty";
        Patience => "PATIENCE", "Patience";
    }
}

/// Immutable story content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    pub id: String,
    pub title: String,
    pub content: String,
    pub moral_lesson: String,
    pub deities: Vec<Deity>,
    pub epic: Epic,
    pub values: Vec<Value>,
    pub image_url: String,
    pub audio_url: Option<String>,
    pub sanskrit_title: Option<String>,
    pub related_story_ids: Vec<String>,
    pub read_time_minutes: u32,
    pub date_published: DateTime<Utc>,
}

impl Story {
    /// Whether the story is associated with `deity`.
    #[must_use]
    pub fn features(&self, deity: Deity) -> bool {
        self.deities.contains(&deity)
    }
}

/// A story together with the reader's state for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryView {
    #[serde(flatten)]
    pub story: Story,
    pub is_read: bool,
    pub is_favorite: bool,
    pub last_read_at: Option<DateTime<Utc>>,
}

impl StoryView {
    /// A story nobody has opened yet.
    #[must_use]
    pub const fn unread(story: Story) -> Self {
        Self {
            story,
            is_read: false,
            is_favorite: false,
            last_read_at: None,
        }
    }

    /// Story identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.story.id
    }
}
