use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const CONFIG_PATH_ENV: &str = "TASK_ITEMS_CONFIG";

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:4200";
const DATA_DIR_NAME: &str = "task-items";
const DATABASE_FILE_NAME: &str = "task_items.sqlite";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Validation error: {0}")]
    ValidationError(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub cors_origins: Vec<String>,
    pub static_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            database_url: default_database_url(),
            cors_origins: vec![DEFAULT_CORS_ORIGIN.to_string()],
            static_dir: None,
        }
    }
}

impl Config {
    /// Parses a JSON config, falling back to defaults when it is invalid.
    pub fn from_raw(raw_config: &str) -> Self {
        match serde_json::from_str(raw_config) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!("Invalid config file, using defaults: {}", err);
                Self::default()
            }
        }
    }

    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    /// Applies `HOST`, `BACKEND_PORT`/`PORT`, `DATABASE_URL`, `CORS_ORIGINS`
    /// and `STATIC_DIR` as read through `lookup`. Blank values are ignored.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        if let Some(host) = read("HOST") {
            self.host = host;
        }
        if let Some(raw_port) = read("BACKEND_PORT").or_else(|| read("PORT")) {
            match raw_port.parse::<u16>() {
                Ok(port) => self.port = port,
                Err(err) => {
                    tracing::warn!(value = %raw_port, error = %err, "Invalid port; keeping {}", self.port)
                }
            }
        }
        if let Some(database_url) = read("DATABASE_URL") {
            self.database_url = database_url;
        }
        if let Some(origins) = read("CORS_ORIGINS") {
            self.cors_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(static_dir) = read("STATIC_DIR") {
            self.static_dir = Some(PathBuf::from(static_dir));
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::ValidationError("host must not be empty".to_string()));
        }
        if self.database_url.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "database_url must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Filesystem location of a file-backed SQLite database, if any.
    pub fn sqlite_path(&self) -> Option<PathBuf> {
        let rest = self.database_url.strip_prefix("sqlite://")?;
        let path = rest.split('?').next().unwrap_or_default();
        if path.is_empty() || path.starts_with(":memory:") {
            return None;
        }
        Some(PathBuf::from(path))
    }
}

pub fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DATA_DIR_NAME)
}

fn default_database_url() -> String {
    format!(
        "sqlite://{}?mode=rwc",
        default_data_dir().join(DATABASE_FILE_NAME).to_string_lossy()
    )
}

/// Will always return config, falling back to defaults on missing/invalid files.
pub async fn load_config_from_file(config_path: &Path) -> Config {
    match tokio::fs::read_to_string(config_path).await {
        Ok(raw_config) => Config::from_raw(&raw_config),
        Err(err) => {
            if err.kind() == std::io::ErrorKind::NotFound {
                tracing::info!("No config file at {}, using defaults", config_path.display());
            } else {
                tracing::warn!("Failed to read config file: {}", err);
            }
            Config::default()
        }
    }
}

/// Resolves the runtime config: optional file named by `TASK_ITEMS_CONFIG`,
/// then environment overrides, then validation.
pub async fn load() -> Result<Config, ConfigError> {
    let config = match std::env::var(CONFIG_PATH_ENV) {
        Ok(path) if !path.trim().is_empty() => {
            load_config_from_file(Path::new(path.trim())).await
        }
        _ => Config::default(),
    };
    let config = config.with_env_overrides();
    config.validate()?;
    Ok(config)
}
