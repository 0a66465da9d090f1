//! Application Configuration
//!
//! JSON file; every field is optional and falls back to its default.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::auth::User;

/// Database file name that selects an in-memory store
pub const IN_MEMORY_DB: &str = ":memory:";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to access config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("unknown log level {0:?}")]
    LogLevel(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    /// Used for log file names
    pub app_name: String,
    pub data_dir: PathBuf,
    /// Relative to `data_dir`, or `:memory:`
    pub db_file: String,
    /// Defaults to `<data_dir>/logs`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,
    pub log_level: String,
    pub user: User,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_name: "OkrBoard".to_string(),
            data_dir: PathBuf::from("data"),
            db_file: "okr.db".to_string(),
            log_dir: None,
            log_level: "info".to_string(),
            user: User::new("local", "Local user"),
        }
    }
}

impl AppConfig {
    /// Read `path`, or defaults if it does not exist
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::info!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let content = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, content).map_err(io_err)
    }

    pub fn db_path(&self) -> PathBuf {
        if self.db_file == IN_MEMORY_DB {
            PathBuf::from(IN_MEMORY_DB)
        } else {
            self.data_dir.join(&self.db_file)
        }
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_dir
            .clone()
            .unwrap_or_else(|| self.data_dir.join("logs"))
    }

    /// Parsed before the logger exists, so errors are returned, not logged
    pub fn log_level(&self) -> Result<log::LevelFilter, ConfigError> {
        self.log_level
            .parse()
            .map_err(|_| ConfigError::LogLevel(self.log_level.clone()))
    }
}
