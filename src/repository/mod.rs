//! Repositories over the local store.
//!
//! Each repository is a trait with a `SQLite`-backed implementation sharing one
//! [`Database`](crate::storage::Database). Mutations notify subscribers after
//! the write has been committed.

mod story;
mod user;

pub use story::{LocalStoryRepository, StoryRepository, StoryUpdate};
pub use user::{LocalUserRepository, SessionQuery, SessionsUpdate, StatsUpdate, UserRepository};
