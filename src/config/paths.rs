//! Path resolution for mythly configuration and data files.
//!
//! All mythly data is stored in `~/.mythly/`:
//! - `config.yaml` - Main configuration file
//! - `mythly.db` - SQLite database for stories, statistics and sessions

use std::path::PathBuf;

use crate::error::MythlyError;

/// Paths to mythly configuration and data files.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Root directory: `~/.mythly/`
    pub root: PathBuf,
    /// Config file: `~/.mythly/config.yaml`
    pub config_file: PathBuf,
    /// Database file: `~/.mythly/mythly.db`
    pub database: PathBuf,
}

impl Paths {
    /// Create paths based on the user's home directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, MythlyError> {
        let home = std::env::var("HOME").map_err(|_| {
            MythlyError::Config("Could not determine home directory".to_string())
        })?;

        Ok(Self::with_root(PathBuf::from(home).join(".mythly")))
    }

    /// Create paths with a custom root directory (useful for testing).
    #[must_use]
    pub fn with_root(root: PathBuf) -> Self {
        Self {
            config_file: root.join("config.yaml"),
            database: root.join("mythly.db"),
            root,
        }
    }

    /// Ensure the root directory exists.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation fails.
    pub fn ensure_dirs(&self) -> Result<(), MythlyError> {
        if !self.root.exists() {
            std::fs::create_dir_all(&self.root).map_err(|e| {
                MythlyError::Config(format!(
                    "Failed to create directory {}: {e}",
                    self.root.display()
                ))
            })?;
        }

        Ok(())
    }
}
