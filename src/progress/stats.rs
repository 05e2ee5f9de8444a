//! User statistics and the streak state machine.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::content::{Deity, StoryView};

/// Streak length that unlocks each milestone flag.
pub const MILESTONE_7_DAY: u32 = 7;
pub const MILESTONE_30_DAY: u32 = 30;
pub const MILESTONE_100_DAY: u32 = 100;

/// The single statistics record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStats {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub total_stories_read: u32,
    pub last_read_date: Option<DateTime<Utc>>,
    pub favorite_deity: Option<Deity>,
    pub streak_7_day: bool,
    pub streak_30_day: bool,
    pub streak_100_day: bool,
    pub total_reading_minutes: u32,
}

impl UserStats {
    /// Milestones currently held, as `(days, reached)` pairs.
    #[must_use]
    pub const fn milestones(&self) -> [(u32, bool); 3] {
        [
            (MILESTONE_7_DAY, self.streak_7_day),
            (MILESTONE_30_DAY, self.streak_30_day),
            (MILESTONE_100_DAY, self.streak_100_day),
        ]
    }
}

/// How a read moved the streak.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakStep {
    /// First read ever, or the previous one is more than two days old.
    Started,
    /// Another read inside the same 24 hour window.
    Unchanged,
    /// A read between 24 and 48 hours after the previous one.
    Extended,
}

/// Classify a read at `now` given the previous read time.
#[must_use]
pub fn streak_step(last_read: Option<DateTime<Utc>>, now: DateTime<Utc>) -> StreakStep {
    let Some(last) = last_read else {
        return StreakStep::Started;
    };

    let elapsed = (now - last).abs();
    if elapsed <= Duration::days(1) {
        StreakStep::Unchanged
    } else if elapsed <= Duration::days(2) {
        StreakStep::Extended
    } else {
        StreakStep::Started
    }
}

/// Apply a completed read at `now` to `stats`.
///
/// Only the streak fields, milestone flags and `last_read_date` change. The
/// milestone flags mirror the current streak, so a reset clears them.
#[must_use]
pub fn advance_streak(stats: &UserStats, now: DateTime<Utc>) -> UserStats {
    let streak = match streak_step(stats.last_read_date, now) {
        StreakStep::Started => 1,
        StreakStep::Unchanged => stats.current_streak,
        StreakStep::Extended => stats.current_streak.saturating_add(1),
    };

    UserStats {
        current_streak: streak,
        longest_streak: stats.longest_streak.max(streak),
        last_read_date: Some(now),
        streak_7_day: streak >= MILESTONE_7_DAY,
        streak_30_day: streak >= MILESTONE_30_DAY,
        streak_100_day: streak >= MILESTONE_100_DAY,
        ..stats.clone()
    }
}

/// The deity that appears most often across `read` stories.
///
/// Ties go to the deity declared first.
#[must_use]
pub fn favorite_deity(read: &[StoryView]) -> Option<Deity> {
    let mut counts: HashMap<Deity, usize> = HashMap::new();
    for view in read {
        for deity in &view.story.deities {
            *counts.entry(*deity).or_default() += 1;
        }
    }

    counts
        .into_iter()
        .max_by(|(a_deity, a_count), (b_deity, b_count)| {
            a_count.cmp(b_count).then_with(|| b_deity.cmp(a_deity))
        })
        .map(|(deity, _)| deity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::loader::{fixtures::SAMPLE_DOCUMENT, parse_stories};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 20, 0, 0).unwrap()
    }

    fn stats(current: u32, longest: u32, hours_ago: Option<i64>) -> UserStats {
        UserStats {
            current_streak: current,
            longest_streak: longest,
            last_read_date: hours_ago.map(|h| now() - Duration::hours(h)),
            ..UserStats::default()
        }
    }

    #[test]
    fn test_first_read_starts_streak() {
        let after = advance_streak(&UserStats::default(), now());
        assert_eq!(after.current_streak, 1);
        assert_eq!(after.longest_streak, 1);
        assert_eq!(after.last_read_date, Some(now()));
    }

    #[test]
    fn test_read_within_day_keeps_streak() {
        let after = advance_streak(&stats(5, 10, Some(3)), now());
        assert_eq!(after.current_streak, 5);
        assert_eq!(after.longest_streak, 10);
    }

    #[test]
    fn test_read_next_day_extends_streak() {
        let after = advance_streak(&stats(5, 10, Some(25)), now());
        assert_eq!(after.current_streak, 6);
        assert_eq!(after.longest_streak, 10);
    }

    #[test]
    fn test_gap_resets_streak() {
        let after = advance_streak(&stats(5, 10, Some(50)), now());
        assert_eq!(after.current_streak, 1);
        assert_eq!(after.longest_streak, 10);
    }

    #[test]
    fn test_window_boundaries_are_inclusive() {
        assert_eq!(
            streak_step(Some(now() - Duration::hours(24)), now()),
            StreakStep::Unchanged
        );
        assert_eq!(
            streak_step(Some(now() - Duration::hours(48)), now()),
            StreakStep::Extended
        );
        assert_eq!(
            streak_step(Some(now() - Duration::hours(48) - Duration::seconds(1)), now()),
            StreakStep::Started
        );
    }

    #[test]
    fn test_last_read_in_future_uses_absolute_gap() {
        // Clock skew: the stored read is 30h ahead of now
        assert_eq!(
            streak_step(Some(now() + Duration::hours(30)), now()),
            StreakStep::Extended
        );
    }

    #[test]
    fn test_longest_follows_new_record() {
        let after = advance_streak(&stats(10, 10, Some(30)), now());
        assert_eq!(after.current_streak, 11);
        assert_eq!(after.longest_streak, 11);
    }

    #[test]
    fn test_longest_never_below_current() {
        for hours in [None, Some(1), Some(24), Some(30), Some(49), Some(500)] {
            for (current, longest) in [(0, 0), (3, 3), (6, 9), (99, 120)] {
                let before = stats(current, longest, hours);
                let after = advance_streak(&before, now());
                assert!(after.longest_streak >= before.longest_streak);
                assert!(after.longest_streak >= after.current_streak);
            }
        }
    }

    #[test]
    fn test_milestones_follow_current_streak() {
        let after = advance_streak(&stats(6, 6, Some(26)), now());
        assert!(after.streak_7_day);
        assert!(!after.streak_30_day);

        let after = advance_streak(&stats(99, 99, Some(26)), now());
        assert!(after.streak_7_day && after.streak_30_day && after.streak_100_day);

        // Reset clears them again
        let mut held = stats(40, 40, Some(100));
        held.streak_7_day = true;
        held.streak_30_day = true;
        let after = advance_streak(&held, now());
        assert!(!after.streak_7_day);
        assert!(!after.streak_30_day);
        assert_eq!(after.longest_streak, 40);
    }

    #[test]
    fn test_counters_untouched() {
        let mut before = stats(2, 2, Some(30));
        before.total_stories_read = 12;
        before.total_reading_minutes = 45;
        before.favorite_deity = Some(Deity::Durga);

        let after = advance_streak(&before, now());
        assert_eq!(after.total_stories_read, 12);
        assert_eq!(after.total_reading_minutes, 45);
        assert_eq!(after.favorite_deity, Some(Deity::Durga));
    }

    #[test]
    fn test_favorite_deity() {
        let stories: Vec<StoryView> = parse_stories(SAMPLE_DOCUMENT)
            .unwrap()
            .into_iter()
            .map(StoryView::unread)
            .collect();

        assert_eq!(favorite_deity(&[]), None);

        // Krishna x1, Hanuman x1, Rama x1: declaration order wins
        assert_eq!(favorite_deity(&stories[..2]), Some(Deity::Krishna));

        let twice_hanuman = vec![stories[1].clone(), stories[1].clone(), stories[0].clone()];
        assert_eq!(favorite_deity(&twice_hanuman), Some(Deity::Rama));
    }
}
