//! Configuration management for the academy client.
//!
//! Loads configuration from ${ACADEMY_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub mod paths {
    //! Path resolution for academy configuration and data files.
    //!
    //! ACADEMY_HOME resolution order:
    //! 1. ACADEMY_HOME environment variable (if set)
    //! 2. ~/.config/academy (default)

    use std::path::PathBuf;

    /// Returns the academy home directory.
    ///
    /// Checks ACADEMY_HOME env var first, falls back to ~/.config/academy
    pub fn academy_home() -> PathBuf {
        if let Ok(home) = std::env::var("ACADEMY_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir()
            .map(|h| h.join(".config").join("academy"))
            .expect("Could not determine home directory")
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        academy_home().join("config.toml")
    }

    /// Returns the path to the persisted session token file.
    pub fn auth_path() -> PathBuf {
        academy_home().join("auth.json")
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend API root (scheme + host + path prefix)
    pub base_url: String,

    /// Default timeout for API requests in seconds (0 disables)
    pub request_timeout_secs: u32,
}

impl Config {
    const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/api";
    const DEFAULT_REQUEST_TIMEOUT_SECS: u32 = 30;

    /// Loads configuration from the default config path.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Returns the effective backend base URL, with trailing slashes trimmed.
    ///
    /// The ACADEMY_BASE_URL environment variable overrides the config value
    /// (used by tests to point at a mock server).
    pub fn effective_base_url(&self) -> String {
        let url = std::env::var("ACADEMY_BASE_URL").unwrap_or_else(|_| self.base_url.clone());
        url.trim_end_matches('/').to_string()
    }

    /// Returns the default request timeout, or None if disabled.
    pub fn request_timeout(&self) -> Option<Duration> {
        if self.request_timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(u64::from(self.request_timeout_secs)))
        }
    }

    /// Creates a default config file at the given path.
    /// Returns an error if the file already exists.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        let contents =
            toml::to_string_pretty(&Config::default()).context("Failed to serialize config")?;
        Self::write_config(path, &contents)
    }

    /// Writes config content to a file, creating parent directories as needed.
    /// Uses atomic write (temp file + rename) to prevent corruption.
    fn write_config(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: Self::DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}
