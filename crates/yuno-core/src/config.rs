//! Application settings.
//!
//! Settings come from an optional `yuno.toml`. Every field has a default, so
//! a missing file or a partial file is fine; a file that does not parse is an
//! error.

use crate::error::{YunoError, YunoResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;
use yuno_notify::DismissOptions;

/// Default database file name.
pub const DEFAULT_DB_FILE: &str = "yuno-tasks.db";

/// Default settings file name.
pub const CONFIG_FILE: &str = "yuno.toml";

/// Top-level settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// SQLite database file. Relative paths resolve against the directory
    /// holding the settings file.
    pub db_path: PathBuf,

    /// Notification auto-dismiss behaviour.
    pub dismiss: DismissSettings,
}

/// `[dismiss]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DismissSettings {
    /// Restart a message's dismiss window when it is overwritten.
    pub reset_timer_on_overwrite: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE),
            dismiss: DismissSettings::default(),
        }
    }
}

impl Default for DismissSettings {
    fn default() -> Self {
        Self {
            reset_timer_on_overwrite: DismissOptions::default().reset_timer_on_overwrite,
        }
    }
}

impl Settings {
    /// Load settings from `path`, falling back to defaults when it is absent.
    pub fn load(path: &Path) -> YunoResult<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No settings file, using defaults");
            return Ok(Self::default().rooted_at(path.parent()));
        }

        let raw = std::fs::read_to_string(path)?;
        let settings: Self = toml::from_str(&raw)
            .map_err(|e| YunoError::Config(format!("{}: {}", path.display(), e)))?;
        debug!(path = %path.display(), "Settings loaded");
        Ok(settings.rooted_at(path.parent()))
    }

    /// Serialize to TOML.
    pub fn to_toml(&self) -> YunoResult<String> {
        toml::to_string_pretty(self).map_err(|e| YunoError::Config(e.to_string()))
    }

    /// Options for the notification auto-dismiss helper.
    pub fn dismiss_options(&self) -> DismissOptions {
        DismissOptions {
            reset_timer_on_overwrite: self.dismiss.reset_timer_on_overwrite,
        }
    }

    fn rooted_at(mut self, base: Option<&Path>) -> Self {
        if let Some(base) = base {
            if self.db_path.is_relative() && !base.as_os_str().is_empty() {
                self.db_path = base.join(&self.db_path);
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(&dir.path().join(CONFIG_FILE)).unwrap();

        assert_eq!(settings.db_path, dir.path().join(DEFAULT_DB_FILE));
        assert!(settings.dismiss_options().reset_timer_on_overwrite);
    }

    #[test]
    fn test_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[dismiss]\nreset_timer_on_overwrite = false\n").unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.dismiss_options(), DismissOptions::legacy());
        assert_eq!(settings.db_path, dir.path().join(DEFAULT_DB_FILE));
    }

    #[test]
    fn test_absolute_db_path_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        let db = dir.path().join("elsewhere").join("tasks.db");
        std::fs::write(&path, format!("db_path = {:?}\n", db.display().to_string())).unwrap();

        assert_eq!(Settings::load(&path).unwrap().db_path, db);
    }

    #[test]
    fn test_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "db_path = [").unwrap();

        assert!(matches!(Settings::load(&path), Err(YunoError::Config(_))));
    }

    #[test]
    fn test_round_trip_through_toml() {
        let settings = Settings::default();
        let parsed: Settings = toml::from_str(&settings.to_toml().unwrap()).unwrap();
        assert_eq!(parsed, settings);
    }
}
