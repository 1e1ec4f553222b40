//! User configuration and preferences

use crate::domain::DEFAULT_HISTORY_DEPTH;
use crate::error::{ApproveError, Result};
use crate::tui::zoom::DEFAULT_ZOOM;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    /// Whether the welcome dialog has been shown
    pub welcome_shown: bool,
    /// How many actions can be undone
    pub history_depth: usize,
    /// Zoom factor the preview starts at
    pub default_zoom: f64,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            welcome_shown: false,
            history_depth: DEFAULT_HISTORY_DEPTH,
            default_zoom: DEFAULT_ZOOM,
        }
    }
}

impl UserConfig {
    /// Get the config file path (~/.config/approveit/config.json)
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("approveit").join("config.json"))
    }

    /// Load config from the default location, or defaults if it doesn't exist
    pub fn load() -> Result<Self> {
        let path = Self::config_path().ok_or_else(|| {
            ApproveError::ConfigError("Could not determine config directory".to_string())
        })?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(|e| {
            ApproveError::ConfigError(format!("Failed to read config file: {}", e))
        })?;

        serde_json::from_str(&contents)
            .map_err(|e| ApproveError::ConfigError(format!("Failed to parse config file: {}", e)))
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path().ok_or_else(|| {
            ApproveError::ConfigError("Could not determine config directory".to_string())
        })?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ApproveError::ConfigError(format!("Failed to create config directory: {}", e))
            })?;
        }

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            ApproveError::ConfigError(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(path, contents).map_err(|e| {
            ApproveError::ConfigError(format!("Failed to write config file: {}", e))
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = UserConfig::default();
        assert!(!config.welcome_shown);
        assert_eq!(config.history_depth, 10);
        assert!((config.default_zoom - 0.4).abs() < f64::EPSILON);
    }

    #[test]
    fn test_config_partial_file_fills_defaults() {
        let config: UserConfig = serde_json::from_str(r#"{"welcome_shown": true}"#).unwrap();
        assert!(config.welcome_shown);
        assert_eq!(config.history_depth, 10);
    }

    #[test]
    fn test_config_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.json");

        let config = UserConfig {
            welcome_shown: true,
            history_depth: 25,
            default_zoom: 1.0,
        };
        config.save_to(&path).unwrap();

        assert_eq!(UserConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_config_missing_file_is_default() {
        let temp_dir = TempDir::new().unwrap();
        let config = UserConfig::load_from(&temp_dir.path().join("absent.json")).unwrap();
        assert_eq!(config, UserConfig::default());
    }

    #[test]
    fn test_config_invalid_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let result = UserConfig::load_from(&path);
        assert!(matches!(result, Err(ApproveError::ConfigError(_))));
    }
}
