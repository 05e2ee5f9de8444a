//! Configuration management for mythly.
//!
//! This module handles loading and saving configuration from `~/.mythly/`.

mod paths;
mod settings;

pub use paths::Paths;
pub use settings::{ColorSetting, Config, ContentConfig, GeneralConfig, ProfileConfig};
