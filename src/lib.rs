//! mythly - daily mythology stories with reading streaks
//!
//! This crate provides the story library, reading progress tracking and
//! screen state behind the `mythly` command-line interface.

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod app;
pub mod cli;
pub mod config;
pub mod content;
pub mod core;
pub mod error;
pub mod output;
pub mod presentation;
pub mod progress;
pub mod repository;
pub mod storage;
pub mod usecase;

pub use app::App;
pub use cli::args::{Cli, Commands, OutputFormat};
pub use error::MythlyError;
