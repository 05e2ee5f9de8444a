//! Reading progress: statistics, streaks and session history.
//!
//! - Streak transitions on every completed read
//! - Milestone flags for 7, 30 and 100 day streaks
//! - Favorite deity derived from the stories read
//! - Reading session records

pub mod session;
pub mod stats;

pub use session::{format_reading_time, ReadingSession};
pub use stats::{advance_streak, favorite_deity, streak_step, StreakStep, UserStats};
