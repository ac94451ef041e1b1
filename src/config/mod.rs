//! Configuration management for welearn-database
//!
//! Handles loading, saving, and validating configuration from TOML files.

mod defaults;

pub use defaults::*;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Name of the config file inside the base directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Database connection configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Document validation rules
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Paths configuration (internal, not user-editable)
    #[serde(skip)]
    pub paths: PathsConfig,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite file name, relative to the base directory
    #[serde(default = "default_database_file_name")]
    pub file_name: String,

    /// Maximum pooled connections
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Enforce foreign key constraints
    #[serde(default = "default_foreign_keys")]
    pub foreign_keys: bool,

    /// How long a writer waits on a locked database
    #[serde(default = "default_busy_timeout_secs")]
    pub busy_timeout_secs: u64,
}

/// Document validation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Minimum characters of sanitized full content
    #[serde(default = "default_min_content_length")]
    pub min_content_length: usize,
}

/// Resolved file locations
#[derive(Debug, Clone, Default)]
pub struct PathsConfig {
    pub base_dir: PathBuf,
    pub config_file: PathBuf,
    pub db_file: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            file_name: default_database_file_name(),
            max_connections: default_max_connections(),
            foreign_keys: default_foreign_keys(),
            busy_timeout_secs: default_busy_timeout_secs(),
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_content_length: default_min_content_length(),
        }
    }
}

impl Config {
    /// Get the default base directory (~/.welearn)
    pub fn default_base_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".welearn")
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        Self::default_base_dir().join(CONFIG_FILE_NAME)
    }

    /// Base directory named by a `--config` value: the directory itself or
    /// its `config.toml`. Other file names are refused since `init` always
    /// writes `config.toml`.
    pub fn base_dir_for(path: &Path) -> Result<PathBuf> {
        if !path.extension().is_some_and(|e| e == "toml") {
            return Ok(path.to_path_buf());
        }
        if path.file_name().is_some_and(|n| n != CONFIG_FILE_NAME) {
            return Err(Error::Config(format!(
                "Config file must be named {}: {}",
                CONFIG_FILE_NAME,
                path.display()
            )));
        }
        Ok(match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        })
    }

    /// Default settings rooted at `base_dir` (or the default base directory)
    pub fn new_at(base_dir: Option<PathBuf>) -> Self {
        let mut config = Config::default();
        config.init_paths(base_dir);
        config
    }

    fn init_paths(&mut self, base_dir: Option<PathBuf>) {
        let base = base_dir.unwrap_or_else(Self::default_base_dir);
        self.paths = PathsConfig {
            config_file: base.join(CONFIG_FILE_NAME),
            db_file: resolve_db_file(&base, &self.database.file_name, database_file_override()),
            base_dir: base,
        };
    }

    /// Load configuration from a specific file path
    pub fn load(config_path: &Path) -> Result<Self> {
        debug!("Loading config from {:?}", config_path);

        if !config_path.exists() {
            return Err(Error::Config(format!(
                "Config file not found: {}",
                config_path.display()
            )));
        }

        let content = std::fs::read_to_string(config_path)?;
        let mut config: Config = toml::from_str(&content)?;

        let base = config_path.parent().unwrap_or(Path::new(".")).to_path_buf();
        config.paths = PathsConfig {
            config_file: config_path.to_path_buf(),
            db_file: resolve_db_file(&base, &config.database.file_name, database_file_override()),
            base_dir: base,
        };

        config.validate()?;
        Ok(config)
    }

    /// Load the config written by `init`; [`Error::NotInitialized`] if there is none
    pub fn load_initialized(base_dir: Option<PathBuf>) -> Result<Self> {
        let config_path = base_dir
            .unwrap_or_else(Self::default_base_dir)
            .join(CONFIG_FILE_NAME);
        if !config_path.exists() {
            return Err(Error::NotInitialized);
        }
        Self::load(&config_path)
    }

    /// Load configuration from a base directory, falling back to defaults
    pub fn load_from(base_dir: Option<PathBuf>) -> Result<Self> {
        let mut config = Self::new_at(base_dir);

        if config.paths.config_file.exists() {
            debug!("Loading config from {:?}", config.paths.config_file);
            let content = std::fs::read_to_string(&config.paths.config_file)?;
            let mut loaded: Config = toml::from_str(&content)?;
            loaded.init_paths(Some(config.paths.base_dir));
            config = loaded;
        } else {
            debug!("No config file found, using defaults");
        }

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.paths.config_file.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(&self.paths.config_file, content)?;
        info!("Saved config to {:?}", self.paths.config_file);
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.database.file_name.trim().is_empty() {
            return Err(Error::Config(
                "database.file_name must not be empty".to_string(),
            ));
        }

        if self.database.max_connections == 0 {
            return Err(Error::Config(
                "database.max_connections must be positive".to_string(),
            ));
        }

        if self.validation.min_content_length == 0 {
            return Err(Error::Config(
                "validation.min_content_length must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

/// Database path under `base`; the environment override wins over the saved name
fn resolve_db_file(base: &Path, file_name: &str, override_name: Option<String>) -> PathBuf {
    match override_name {
        Some(name) => base.join(name),
        None => base.join(file_name),
    }
}
