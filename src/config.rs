use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct DaybookConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub feedback: FeedbackConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub data_path: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct FeedbackConfig {
    pub api_base: String,
    pub model: String,
    pub api_key: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 4000,
            log_level: "info".into(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let data_path = default_daybook_dir()
            .join("entries.json")
            .to_string_lossy()
            .into_owned();
        Self { data_path }
    }
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.openai.com/v1".into(),
            model: "gpt-4".into(),
            api_key: None,
        }
    }
}

/// Returns `~/.daybook/`, or `./.daybook/` when no home directory is known.
pub fn default_daybook_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".daybook")
}

/// Returns the default config file path: `~/.daybook/config.toml`
pub fn default_config_path() -> PathBuf {
    default_daybook_dir().join("config.toml")
}

impl DaybookConfig {
    /// Load config from the default TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            DaybookConfig::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides
    /// (PORT, OPENAI_API_KEY, DAYBOOK_HOST, DAYBOOK_DATA, DAYBOOK_LOG_LEVEL,
    /// DAYBOOK_API_BASE, DAYBOOK_MODEL).
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("DAYBOOK_HOST") {
            self.server.host = val;
        }
        if let Ok(val) = std::env::var("PORT") {
            match val.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => warn!(value = %val, "ignoring unparsable PORT"),
            }
        }
        if let Ok(val) = std::env::var("DAYBOOK_LOG_LEVEL") {
            self.server.log_level = val;
        }
        if let Ok(val) = std::env::var("DAYBOOK_DATA") {
            self.storage.data_path = val;
        }
        if let Ok(val) = std::env::var("DAYBOOK_API_BASE") {
            self.feedback.api_base = val;
        }
        if let Ok(val) = std::env::var("DAYBOOK_MODEL") {
            self.feedback.model = val;
        }
        if let Ok(val) = std::env::var("OPENAI_API_KEY") {
            self.feedback.api_key = Some(val);
        }
    }

    /// Resolve the snapshot path, expanding `~` if needed.
    pub fn resolved_data_path(&self) -> PathBuf {
        expand_tilde(&self.storage.data_path)
    }

    /// `host:port` the HTTP server binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
