//! Storage layer for mythly.
//!
//! This module provides SQLite-based persistence for:
//! - Stories (content plus read/favorite flags)
//! - User statistics (streaks, counters, milestones)
//! - Reading sessions

mod database;
mod migrations;
mod time;

pub use database::Database;
pub use time::{format_timestamp, parse_timestamp};
