//! The profile screen: statistics and recent reading sessions.

use std::sync::Arc;

use serde::Serialize;

use super::{drain_into, settle};
use crate::core::Subscription;
use crate::progress::{ReadingSession, UserStats};
use crate::repository::{SessionQuery, SessionsUpdate, StatsUpdate, UserRepository};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProfileState {
    pub is_loading: bool,
    pub user_stats: UserStats,
    pub recent_sessions: Vec<ReadingSession>,
    pub error: Option<String>,
}

pub struct ProfileModel {
    users: Arc<dyn UserRepository>,
    session_limit: usize,
    stats: Option<Subscription<StatsUpdate>>,
    sessions: Option<Subscription<SessionsUpdate>>,
    state: ProfileState,
}

impl ProfileModel {
    /// Watch the statistics and the `session_limit` most recent sessions.
    #[must_use]
    pub fn new(users: Arc<dyn UserRepository>, session_limit: usize) -> Self {
        let mut model = Self {
            users,
            session_limit,
            stats: None,
            sessions: None,
            state: ProfileState::default(),
        };
        model.load();
        model
    }

    #[must_use]
    pub const fn state(&self) -> &ProfileState {
        &self.state
    }

    pub fn refresh(&mut self) {
        let stats = drain_into(self.stats.as_ref(), &mut self.state.user_stats);
        let sessions = drain_into(self.sessions.as_ref(), &mut self.state.recent_sessions);
        settle(&mut self.state.error, [stats, sessions]);
    }

    pub fn retry(&mut self) {
        self.load();
    }

    fn load(&mut self) {
        self.state.is_loading = true;
        self.state.error = None;
        self.stats = Some(self.users.subscribe_stats());
        self.sessions = Some(
            self.users
                .subscribe_sessions(SessionQuery::Recent(self.session_limit)),
        );
        self.refresh();
        self.state.is_loading = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::LocalUserRepository;
    use crate::storage::Database;
    use chrono::{Duration, TimeZone, Utc};

    fn users() -> Arc<LocalUserRepository> {
        Arc::new(LocalUserRepository::new(Arc::new(
            Database::open_in_memory().unwrap(),
        )))
    }

    #[test]
    fn test_empty_profile() {
        let model = ProfileModel::new(users(), 50);

        assert_eq!(model.state().user_stats, UserStats::default());
        assert!(model.state().recent_sessions.is_empty());
        assert_eq!(model.state().error, None);
    }

    #[test]
    fn test_refresh_shows_new_sessions_newest_first() {
        let users = users();
        let mut model = ProfileModel::new(users.clone(), 2);
        let base = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();

        for (i, story) in ["a", "b", "c"].iter().enumerate() {
            let at = base + Duration::hours(i64::try_from(i).unwrap());
            users
                .save_reading_session(&ReadingSession::completed(*story, at, 60, false))
                .unwrap();
        }
        users.update_streak(base).unwrap();
        model.refresh();

        let stories: Vec<&str> = model
            .state()
            .recent_sessions
            .iter()
            .map(|s| s.story_id.as_str())
            .collect();
        assert_eq!(stories, vec!["c", "b"]);
        assert_eq!(model.state().user_stats.current_streak, 1);
    }
}
