use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use serde::{Deserialize, Serialize};

use crate::content::{Deity, Epic, LibraryFilter};

#[derive(Parser)]
#[command(name = "mythly")]
#[command(about = "Short mythology stories, one a day, with reading streaks")]
#[command(long_about = "mythly - daily mythology stories in the terminal

Reads a library of short mythology stories, keeps track of what you have
read and favorited, and maintains a daily reading streak.

QUICK START:
  mythly load --file stories.json   Seed the library (first run only)
  mythly today                      Show today's story
  mythly library --deity hanuman    Browse stories about one deity
  mythly read <ID> --seconds 240    Record a finished read
  mythly stats                      Show your streak and totals

OUTPUT FORMATS:
  --output pretty    Human-readable colored output (default)
  --output json      Machine-readable JSON for scripting

For more information on a specific command, run:
  mythly <command> --help")]
#[command(version, propagate_version = true)]
pub struct Cli {
    /// Output format for command results
    ///
    /// Defaults to `general.default_output` from the config file, which
    /// itself defaults to 'pretty'.
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Path to the library database
    #[arg(long, global = true, env = "MYTHLY_DATABASE", value_name = "PATH")]
    pub database: Option<PathBuf>,

    /// Log debug detail to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for command results.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable colored output.
    #[default]
    Pretty,
    /// Machine-readable JSON output.
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Seed the library from a content document
    ///
    /// Does nothing when the library already holds stories. Without --file,
    /// the document named by `content.path` in the config file is used.
    ///
    /// # Examples
    ///
    ///   mythly load --file stories.json
    ///   mythly load -o json
    Load(LoadArgs),

    /// Show today's story
    ///
    /// Picks a random story from the library and shows it in full, followed
    /// by your current streak. Seeds the library first if it is empty and a
    /// content path is configured.
    #[command(alias = "t")]
    Today,

    /// Browse the library
    ///
    /// Lists every story, newest first. At most one filter may be given; a
    /// search term takes precedence over it.
    ///
    /// # Examples
    ///
    ///   mythly library
    ///   mythly library --deity krishna
    ///   mythly library --epic ramayana
    ///   mythly library --favorites
    ///   mythly library --search ocean
    #[command(alias = "ls")]
    Library(LibraryArgs),

    /// Show one story in full
    Show {
        /// Story ID
        id: String,
    },

    /// Record that a story was read
    ///
    /// Marks the story read, updates the streak and totals, and logs a
    /// reading session.
    ///
    /// # Examples
    ///
    ///   mythly read hanuman-leap --seconds 300
    ///   mythly read hanuman-leap --seconds 300 --audio
    Read(ReadArgs),

    /// Toggle a story's favorite flag
    #[command(alias = "fav")]
    Favorite {
        /// Story ID
        id: String,
    },

    /// Show reading statistics
    Stats,

    /// List reading sessions
    ///
    /// Shows the most recent sessions, or every session for one story.
    Sessions(SessionsArgs),

    /// Generate shell completions
    ///
    /// Example: mythly completions zsh > ~/.zsh/completions/_mythly
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args)]
pub struct LoadArgs {
    /// Content document (JSON)
    #[arg(long, short, value_name = "PATH")]
    pub file: Option<PathBuf>,
}

#[derive(Args)]
#[command(group(ArgGroup::new("filter").args(["deity", "epic", "read", "favorites"])))]
pub struct LibraryArgs {
    /// Only stories about this deity
    #[arg(long, short)]
    pub deity: Option<Deity>,

    /// Only stories from this epic
    #[arg(long, short)]
    pub epic: Option<Epic>,

    /// Only stories already read
    #[arg(long)]
    pub read: bool,

    /// Only favorite stories
    #[arg(long)]
    pub favorites: bool,

    /// Search titles and story text
    #[arg(long, short)]
    pub search: Option<String>,
}

impl LibraryArgs {
    /// The filter selected on the command line.
    #[must_use]
    pub const fn filter(&self) -> LibraryFilter {
        if let Some(deity) = self.deity {
            LibraryFilter::ByDeity(deity)
        } else if let Some(epic) = self.epic {
            LibraryFilter::ByEpic(epic)
        } else if self.read {
            LibraryFilter::Read
        } else if self.favorites {
            LibraryFilter::Favorites
        } else {
            LibraryFilter::All
        }
    }
}

#[derive(Args)]
pub struct ReadArgs {
    /// Story ID
    pub id: String,

    /// Time spent reading, in seconds
    #[arg(long, short, default_value_t = 0)]
    pub seconds: u32,

    /// The audio narration was used
    #[arg(long)]
    pub audio: bool,
}

#[derive(Args)]
pub struct SessionsArgs {
    /// Only sessions for this story
    #[arg(long)]
    pub story: Option<String>,

    /// Maximum number of recent sessions (default from config)
    #[arg(long, short)]
    pub limit: Option<usize>,
}
