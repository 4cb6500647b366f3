//! Configuration management for HealthBuddy
//!
//! Provides TOML-based configuration with defaults and validation.
//! Location: ~/.healthbuddy/config.toml

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::errors::{InferenceError, Result};
use crate::reference::loader::{DATASET_FILE, DESCRIPTION_FILE, PRECAUTION_FILE, SEVERITY_FILE};
use crate::reference::ReferenceDataFiles;

/// Complete configuration for HealthBuddy
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Reference dataset locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub dir: String,
    pub dataset_file: String,
    pub description_file: String,
    pub precaution_file: String,
    pub severity_file: String,
}

/// Trained model artifacts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub enabled: bool,
    pub dir: String,
}

/// Prediction history storage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub record_predictions: bool,
    pub database: String,
}

/// Log output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: "~/.healthbuddy/data".to_string(),
            dataset_file: DATASET_FILE.to_string(),
            description_file: DESCRIPTION_FILE.to_string(),
            precaution_file: PRECAUTION_FILE.to_string(),
            severity_file: SEVERITY_FILE.to_string(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: "~/.healthbuddy/model".to_string(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            record_predictions: true,
            database: "~/.healthbuddy/health.db".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        if let Some(config_path) = path {
            Self::load_from_file(&config_path)
        } else {
            Self::load_default()
        }
    }

    /// Load configuration from specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| InferenceError::ConfigError(format!("Failed to read config: {}", e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| InferenceError::ConfigError(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load default configuration from standard location or use built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Some(home) = dirs::home_dir() {
            let config_path = home.join(".healthbuddy").join("config.toml");
            if config_path.exists() {
                return Self::load_from_file(&config_path);
            }
        }

        Ok(Config::default())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let files = [
            ("dataset_file", &self.data.dataset_file),
            ("description_file", &self.data.description_file),
            ("precaution_file", &self.data.precaution_file),
            ("severity_file", &self.data.severity_file),
        ];
        for (key, value) in files {
            if value.trim().is_empty() {
                return Err(InferenceError::ConfigError(format!(
                    "data.{} must not be empty",
                    key
                )));
            }
        }

        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(InferenceError::ConfigError(format!(
                "Invalid log level: {}",
                self.logging.level
            )));
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = self.to_toml()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| InferenceError::ConfigError(format!("Failed to create config dir: {}", e)))?;
        }

        std::fs::write(path, contents)
            .map_err(|e| InferenceError::ConfigError(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    /// Render as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| InferenceError::ConfigError(format!("Failed to serialize config: {}", e)))
    }

    /// Expand tilde in paths
    pub fn expand_path(path: &str) -> PathBuf {
        if let Some(rest) = path.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(rest);
            }
        }
        PathBuf::from(path)
    }

    /// Paths of the four reference sources
    pub fn data_files(&self) -> ReferenceDataFiles {
        let dir = Self::expand_path(&self.data.dir);
        ReferenceDataFiles {
            dataset: dir.join(&self.data.dataset_file),
            descriptions: dir.join(&self.data.description_file),
            precautions: dir.join(&self.data.precaution_file),
            severity: dir.join(&self.data.severity_file),
        }
    }

    /// Model artifact directory
    pub fn model_dir(&self) -> PathBuf {
        Self::expand_path(&self.model.dir)
    }

    /// Prediction database path
    pub fn database_path(&self) -> PathBuf {
        Self::expand_path(&self.storage.database)
    }
}
