//! Configuration settings for Querybot.

use crate::error::{ConfigError, Result};
use crate::query::{StopwordList, DEFAULT_MATCH_THRESHOLD};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub matcher: MatcherConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::ReadFile)?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default locations or use defaults.
    pub fn load() -> Result<Self> {
        let config_paths = [
            PathBuf::from("querybot.toml"),
            PathBuf::from("config.toml"),
            dirs::config_dir()
                .map(|p| p.join("querybot/config.toml"))
                .unwrap_or_default(),
            dirs::home_dir()
                .map(|p| p.join(".querybot/config.toml"))
                .unwrap_or_default(),
        ];

        for path in &config_paths {
            if path.is_file() {
                tracing::info!("Loading config from: {}", path.display());
                return Self::from_file(path);
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Config::default())
    }

    /// Apply `QUERYBOT_*` overrides from the process environment.
    pub fn with_env_overrides(self) -> Result<Self> {
        self.apply_env_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides resolved through `lookup`.
    ///
    /// Recognized keys: `QUERYBOT_DATABASE`, `QUERYBOT_HOST`, `QUERYBOT_PORT`.
    pub fn apply_env_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("QUERYBOT_DATABASE") {
            self.database.path = path;
        }
        if let Some(host) = lookup("QUERYBOT_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("QUERYBOT_PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("QUERYBOT_PORT is not a port: {port}")))?;
        }
        self.validate()?;
        Ok(self)
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<()> {
        if self.database.path.trim().is_empty() {
            return Err(ConfigError::MissingField("database.path".to_string()).into());
        }

        if self.server.port == 0 {
            return Err(ConfigError::Invalid("server.port must be > 0".to_string()).into());
        }

        if self.matcher.threshold > 100 {
            return Err(ConfigError::Invalid(format!(
                "matcher.threshold must be between 0 and 100, got {}",
                self.matcher.threshold
            ))
            .into());
        }

        Ok(())
    }

    /// Expand the database path.
    pub fn database_path(&self) -> PathBuf {
        let expanded = shellexpand::tilde(&self.database.path);
        PathBuf::from(expanded.as_ref())
    }
}

/// Database configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "~/.local/share/querybot/querybot.db".to_string(),
        }
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// HTTP port
    pub port: u16,
    /// Allow cross-origin requests
    pub enable_cors: bool,
    /// Origins allowed when CORS is enabled; `*` allows any
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            enable_cors: true,
            cors_origins: vec!["*".to_string()],
        }
    }
}

impl ServerConfig {
    /// `host:port` string suitable for binding a listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Entity matching configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Minimum similarity score (0-100) for a fuzzy table/column match
    pub threshold: u8,
    /// Stopword list used when extracting keywords
    pub stopwords: StopwordList,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_MATCH_THRESHOLD,
            stopwords: StopwordList::Standard,
        }
    }
}
