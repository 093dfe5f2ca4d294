//! Configuration for Lunchly tools
//!
//! Resolution order (later wins):
//! 1. Built-in defaults
//! 2. `~/.lunchly/config.toml`, if present
//! 3. `DATABASE_URL` / `LUNCHLY_MAX_CONNECTIONS` from the environment
//!    (after loading `.env` files)

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::db::pool::DEFAULT_MAX_CONNECTIONS;

const DEFAULT_DATABASE_URL: &str = "postgres://localhost/lunchly";

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LunchlyConfig {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// EnvFilter directive used when RUST_LOG is unset
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Load environment variables from .env files
///
/// Current directory first, then ~/.lunchly/.env. dotenvy never
/// overwrites variables that are already set.
pub fn load_dotenv() {
    if let Ok(path) = dotenvy::dotenv() {
        debug!("Loaded .env from current directory: {}", path.display());
    }

    if let Some(dir) = config_dir() {
        let env_file = dir.join(".env");
        if env_file.exists() {
            match dotenvy::from_path(&env_file) {
                Ok(()) => debug!("Loaded .env from {}", env_file.display()),
                Err(e) => debug!("Failed to load {}: {}", env_file.display(), e),
            }
        }
    }
}

/// Get the lunchly config directory path (~/.lunchly)
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".lunchly"))
}

impl LunchlyConfig {
    /// Load from .env, ~/.lunchly/config.toml and the environment.
    ///
    /// A missing config file is not an error; defaults apply.
    pub fn load() -> Result<Self> {
        load_dotenv();

        let mut config = match config_dir().map(|dir| dir.join("config.toml")) {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => {
                debug!("No config file found, using defaults");
                Self::default()
            }
        };

        config.apply_env(|key| env::var(key).ok())?;
        Ok(config)
    }

    /// Parse a TOML config file. Missing keys take defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file (invalid TOML): {}", path.display()))?;

        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Apply environment overrides using `lookup` to read variables.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DATABASE_URL") {
            self.database.url = url;
        }

        if let Some(raw) = lookup("LUNCHLY_MAX_CONNECTIONS") {
            self.database.max_connections = raw
                .trim()
                .parse()
                .with_context(|| format!("LUNCHLY_MAX_CONNECTIONS must be a positive integer, got '{}'", raw))?;
        }

        if self.database.max_connections == 0 {
            anyhow::bail!("database.max_connections must be at least 1");
        }

        Ok(())
    }
}
