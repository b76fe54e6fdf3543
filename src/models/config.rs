//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

/// Environment variable that overrides `api.base_url`.
pub const API_URL_ENV: &str = "AFROPEDIA_API_URL";

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Backend connection settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Where the session token lives
    #[serde(default)]
    pub session: SessionConfig,

    /// Rendering preferences
    #[serde(default)]
    pub display: DisplayConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Apply environment overrides on top of file values.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                log::debug!("{} overrides api.base_url", API_URL_ENV);
                self.api.base_url = url.trim().to_string();
            }
        }
        self
    }

    /// Parsed backend base URL, always ending with a slash so joins append.
    pub fn base_url(&self) -> Result<Url> {
        let raw = self.api.base_url.trim();
        let normalized = if raw.ends_with('/') {
            raw.to_string()
        } else {
            format!("{raw}/")
        };
        Ok(Url::parse(&normalized)?)
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.api.user_agent.trim().is_empty() {
            return Err(AppError::validation("api.user_agent is empty"));
        }
        if self.api.timeout_secs == 0 {
            return Err(AppError::validation("api.timeout_secs must be > 0"));
        }
        let base = self
            .base_url()
            .map_err(|e| AppError::validation(format!("api.base_url is invalid: {e}")))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(AppError::validation(
                "api.base_url must use http or https",
            ));
        }
        if self.session.token_file.as_os_str().is_empty() {
            return Err(AppError::validation("session.token_file is empty"));
        }
        if self.display.reference_collapse_threshold == 0 {
            return Err(AppError::validation(
                "display.reference_collapse_threshold must be > 0",
            ));
        }
        Ok(())
    }
}

/// Backend connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the REST backend
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Session persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// JSON file holding the bearer token and the logged-in user
    #[serde(default = "defaults::token_file")]
    pub token_file: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            token_file: defaults::token_file(),
        }
    }
}

/// Rendering preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// chrono format for dates (access dates, comment dates)
    #[serde(default = "defaults::date_format")]
    pub date_format: String,

    /// chrono format for full timestamps (revision history)
    #[serde(default = "defaults::datetime_format")]
    pub datetime_format: String,

    /// Reference lists longer than this are collapsed unless expanded
    #[serde(default = "defaults::reference_collapse_threshold")]
    pub reference_collapse_threshold: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            date_format: defaults::date_format(),
            datetime_format: defaults::datetime_format(),
            reference_collapse_threshold: defaults::reference_collapse_threshold(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    // Api defaults
    pub fn base_url() -> String {
        "http://localhost:8000".into()
    }
    pub fn user_agent() -> String {
        concat!("afropedia-cli/", env!("CARGO_PKG_VERSION")).into()
    }
    pub fn timeout() -> u64 {
        30
    }

    // Session defaults
    pub fn token_file() -> PathBuf {
        PathBuf::from(".afropedia/session.json")
    }

    // Display defaults
    pub fn date_format() -> String {
        "%-m/%-d/%Y".into()
    }
    pub fn datetime_format() -> String {
        "%-m/%-d/%Y, %-I:%M:%S %p".into()
    }
    pub fn reference_collapse_threshold() -> usize {
        3
    }
}
