use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::PopcornError;

const DEFAULT_CONFIG: &str = include_str!("../../../config/default.toml");

/// Environment variable that overrides `api.api_key`.
pub const API_KEY_ENV: &str = "POPCORN_API_KEY";

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub search: SearchConfig,
    pub ui: UiConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub api_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    pub min_query_len: usize,
    pub debounce_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    pub app_title: String,
    pub pagination_window: u32,
    pub max_rating: u8,
    #[serde(default)]
    pub theme: ThemeMode,
}

/// Light, dark, or follow the OS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    System,
    Dark,
    Light,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub watched_key: String,
}

impl AppConfig {
    /// Load config: user file (if exists) merged over built-in defaults.
    pub fn load() -> Result<Self, PopcornError> {
        let user_path = Self::config_path();
        if user_path.exists() {
            Self::load_from(&user_path)
        } else {
            Self::parse_merged("")
        }
    }

    /// Load a specific file, merged over built-in defaults.
    pub fn load_from(path: &Path) -> Result<Self, PopcornError> {
        let user_str =
            std::fs::read_to_string(path).map_err(|e| PopcornError::Config(e.to_string()))?;
        Self::parse_merged(&user_str)
    }

    /// Parse `user` TOML and overlay it key by key on the defaults, so a
    /// user file only needs the values it changes.
    pub fn parse_merged(user: &str) -> Result<Self, PopcornError> {
        let mut base: toml::Table =
            toml::from_str(DEFAULT_CONFIG).map_err(|e| PopcornError::Config(e.to_string()))?;
        let overlay: toml::Table =
            toml::from_str(user).map_err(|e| PopcornError::Config(e.to_string()))?;
        merge_tables(&mut base, overlay);

        let config: AppConfig = toml::Value::Table(base)
            .try_into()
            .map_err(|e: toml::de::Error| PopcornError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), PopcornError> {
        url::Url::parse(&self.api.base_url)
            .map_err(|e| PopcornError::Config(format!("api.base_url: {e}")))?;
        if self.ui.max_rating == 0 {
            return Err(PopcornError::Config("ui.max_rating must be at least 1".into()));
        }
        if self.ui.pagination_window == 0 {
            return Err(PopcornError::Config(
                "ui.pagination_window must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Resolve the API key: the environment variable wins over the file.
    pub fn api_key(&self) -> Result<String, PopcornError> {
        resolve_api_key(std::env::var(API_KEY_ENV).ok(), &self.api.api_key)
    }

    /// Path to user config file (XDG on Linux, AppData on Windows).
    pub fn config_path() -> PathBuf {
        Self::project_dirs()
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    /// Path to the key-value store backing persisted state.
    pub fn db_path() -> PathBuf {
        Self::project_dirs()
            .map(|d| d.data_dir().join("popcorn.db"))
            .unwrap_or_else(|| PathBuf::from("popcorn.db"))
    }

    /// Ensure the data directory exists and return the DB path.
    pub fn ensure_db_path() -> Result<PathBuf, PopcornError> {
        let path = Self::db_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(path)
    }

    /// Directory for rolling log files.
    pub fn log_dir() -> PathBuf {
        Self::project_dirs()
            .map(|d| d.data_dir().join("logs"))
            .unwrap_or_else(|| PathBuf::from("logs"))
    }

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", "popcorn")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("built-in default config is valid TOML")
    }
}

fn resolve_api_key(env: Option<String>, configured: &str) -> Result<String, PopcornError> {
    env.filter(|k| !k.trim().is_empty())
        .or_else(|| Some(configured.to_string()).filter(|k| !k.trim().is_empty()))
        .map(|k| k.trim().to_string())
        .ok_or_else(|| {
            PopcornError::Config(format!(
                "no API key configured; set {API_KEY_ENV} or api.api_key"
            ))
        })
}

fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(base_inner)), toml::Value::Table(over_inner)) => {
                merge_tables(base_inner, over_inner);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}
