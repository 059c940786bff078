//! Path resolution for tamostudy configuration and data files.
//!
//! All tamostudy data is stored in `~/.tamostudy/`:
//! - `config.yaml` - Main configuration file
//! - `tamostudy.db` - SQLite database for the profile and session history
//! - `tamo.log` - Log file used while the terminal UI owns the screen

use std::path::PathBuf;

use crate::error::TamoError;

/// Paths to tamostudy configuration and data files.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Root directory: `~/.tamostudy/`
    pub root: PathBuf,
    /// Config file: `~/.tamostudy/config.yaml`
    pub config_file: PathBuf,
    /// Database file: `~/.tamostudy/tamostudy.db`
    pub database: PathBuf,
    /// Log file: `~/.tamostudy/tamo.log`
    pub log_file: PathBuf,
}

impl Paths {
    /// Create paths based on the user's home directory.
    ///
    /// `TAMO_HOME` overrides the root directory when set.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, TamoError> {
        if let Ok(root) = std::env::var("TAMO_HOME") {
            return Ok(Self::with_root(PathBuf::from(root)));
        }

        let home = std::env::var("HOME")
            .map_err(|_| TamoError::Config("Could not determine home directory".to_string()))?;

        Ok(Self::with_root(PathBuf::from(home).join(".tamostudy")))
    }

    /// Create paths with a custom root directory (useful for testing).
    #[must_use]
    pub fn with_root(root: PathBuf) -> Self {
        Self {
            config_file: root.join("config.yaml"),
            database: root.join("tamostudy.db"),
            log_file: root.join("tamo.log"),
            root,
        }
    }

    /// Ensure the root directory exists.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation fails.
    pub fn ensure_dirs(&self) -> Result<(), TamoError> {
        if !self.root.exists() {
            std::fs::create_dir_all(&self.root).map_err(|e| {
                TamoError::Config(format!(
                    "Failed to create directory {}: {e}",
                    self.root.display()
                ))
            })?;
        }

        Ok(())
    }
}
