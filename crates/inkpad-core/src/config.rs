//! Editor configuration.
//!
//! ## Learning: Serde for Serialization
//!
//! Serde is Rust's standard for serialization/deserialization.
//! The `#[derive(Serialize, Deserialize)]` macro generates
//! code to convert structs to/from JSON, TOML, etc.
//!
//! `#[serde(default)]` uses Default::default() for missing fields,
//! so a config file only needs the keys it changes.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Main configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where snapshots are stored
    pub storage: StorageConfig,

    /// Mutation gate settings
    pub gate: GateConfig,

    /// Editor behavior settings
    pub editor: EditorConfig,

    /// Image insertion settings
    pub images: ImageConfig,

    /// Keyboard settings
    pub keyboard: KeyboardConfig,

    /// UI appearance settings
    pub ui: UiConfig,
}

impl Config {
    /// Loads config from the default location, falling back to defaults.
    pub fn load() -> Self {
        match Self::load_from_default_path() {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to load config, using defaults: {}", e);
                Self::default()
            }
        }
    }

    /// Loads config from a file.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Loads from the default config path.
    fn load_from_default_path() -> Result<Self, ConfigError> {
        let path = Self::default_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Returns the default config file path.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("inkpad").join("config.toml"))
    }

    /// Saves the config to the given path.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Snapshot storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding stored keys (default: the user data dir)
    pub dir: Option<PathBuf>,

    /// Key the document snapshot is stored under
    pub key: String,
}

impl StorageConfig {
    /// The configured directory, or `<data dir>/inkpad`.
    pub fn resolved_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(dirs::data_dir()
                .ok_or(ConfigError::NoDataDir)?
                .join("inkpad")),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: None,
            key: "content".to_string(),
        }
    }
}

/// Mutation gate configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Initial top-level node ceiling. 0 rejects every non-empty document.
    pub ceiling: usize,
}

/// Editor behavior configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Undo history limit
    pub undo_limit: usize,

    /// Text shown in an empty document
    pub placeholder: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            undo_limit: 100,
            placeholder: "Enter some rich text...".to_string(),
        }
    }
}

/// Image insertion configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// URL suffixes that mark a pasted or dropped URL as an image
    pub extensions: Vec<String>,

    /// Files larger than this are skipped (MB)
    pub max_file_size_mb: u64,
}

impl ImageConfig {
    /// The size limit in bytes.
    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_mb.saturating_mul(1024 * 1024)
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            extensions: crate::image::IMAGE_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            max_file_size_mb: 10,
        }
    }
}

/// Keyboard configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyboardConfig {
    /// Custom key bindings, e.g. `"mod+shift+c" = "mark.code"`
    pub bindings: HashMap<String, String>,
}

/// UI appearance configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Body font size in points
    pub font_size: f32,

    /// Color theme name ("dark" or "light")
    pub theme: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            font_size: 16.0,
            theme: "dark".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config directory not found")]
    NoConfigDir,

    #[error("Data directory not found")]
    NoDataDir,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.gate.ceiling, 0);
        assert_eq!(config.storage.key, "content");
        assert_eq!(config.editor.undo_limit, 100);
        assert!(config.images.extensions.iter().any(|ext| ext == "png"));
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.storage.key, config.storage.key);
        assert_eq!(parsed.images.extensions, config.images.extensions);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let parsed: Config = toml::from_str("[gate]\nceiling = 12\n").unwrap();
        assert_eq!(parsed.gate.ceiling, 12);
        assert_eq!(parsed.storage.key, "content");
        assert_eq!(parsed.images.max_file_size_mb, 10);
    }

    #[test]
    fn test_load_and_save_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.storage.dir = Some(dir.path().join("store"));
        config.keyboard.bindings.insert("mod+e".to_string(), "mark.code".to_string());
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.storage.resolved_dir().unwrap(), dir.path().join("store"));
        assert_eq!(loaded.keyboard.bindings.get("mod+e").map(String::as_str), Some("mark.code"));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[gate\nceiling = ").unwrap();
        assert!(matches!(Config::load_from(&path), Err(ConfigError::Parse(_))));
    }
}
