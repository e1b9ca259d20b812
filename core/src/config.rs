//! Editor configuration loaded from `quarry.toml`.
//!
//! ```toml
//! [history]
//! capacity = 250
//! ```
//!
//! Every table and key is optional; missing values fall back to defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::abstract_editor::DEFAULT_MAX_UNDO;

/// Top-level editor configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub history: HistoryConfig,
}

/// Undo/redo history settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum number of entries kept in the history. Must be at least 1.
    pub capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_MAX_UNDO,
        }
    }
}

/// Errors produced while loading or validating an [`EditorConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("history capacity must be at least 1, got {0}")]
    InvalidCapacity(usize),
}

impl EditorConfig {
    /// Parses and validates a config from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history.capacity == 0 {
            return Err(ConfigError::InvalidCapacity(self.history.capacity));
        }
        Ok(())
    }
}

/// Load an editor config from a TOML file.
pub fn load_config(path: &Path) -> Result<EditorConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = EditorConfig::from_toml_str(&content)?;
    log::info!(
        "Loaded editor config from {} (history capacity {})",
        path.display(),
        config.history.capacity
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_capacity_is_one_hundred() {
        assert_eq!(EditorConfig::default().history.capacity, 100);
    }

    #[test]
    fn parses_capacity() {
        let config = EditorConfig::from_toml_str("[history]\ncapacity = 250\n").unwrap();
        assert_eq!(config.history.capacity, 250);
    }

    #[test]
    fn missing_sections_use_defaults() {
        assert_eq!(
            EditorConfig::from_toml_str("").unwrap(),
            EditorConfig::default()
        );
        assert_eq!(
            EditorConfig::from_toml_str("[history]\n").unwrap(),
            EditorConfig::default()
        );
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let err = EditorConfig::from_toml_str("[history]\ncapacity = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidCapacity(0)));
        assert_eq!(
            err.to_string(),
            "history capacity must be at least 1, got 0"
        );
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = EditorConfig::from_toml_str("[history\ncapacity = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn wrong_type_is_a_parse_error() {
        let err = EditorConfig::from_toml_str("[history]\ncapacity = \"lots\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn load_missing_file_reports_path() {
        let path = Path::new("/nonexistent/quarry/quarry.toml");
        let err = load_config(path).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/quarry/quarry.toml"));
    }

    #[test]
    fn load_from_file() {
        let path = std::env::temp_dir().join(format!("quarry-config-{}.toml", std::process::id()));
        std::fs::write(&path, "[history]\ncapacity = 12\n").unwrap();

        let config = load_config(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.history.capacity, 12);
    }
}
