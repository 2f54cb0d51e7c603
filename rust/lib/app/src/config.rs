//! Client configuration.
//!
//! Loaded from a TOML file; `CATPAW_API_URL` overrides the server address.
//!
//! ```toml
//! api_base_url = "http://10.0.2.2/catpaw/api"
//! upload_base_url = "http://10.0.2.2/catpaw/uploads"
//! chat_poll_interval_ms = 2000
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const ENV_API_URL: &str = "CATPAW_API_URL";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_base_url: String,
    /// Where media file names resolve. Defaults to `{api_base_url}/uploads`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload_base_url: Option<String>,
    pub chat_poll_interval_ms: u64,
    pub story_item_duration_ms: u64,
    pub story_tick_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost/catpaw/api".into(),
            upload_base_url: None,
            chat_poll_interval_ms: 2000,
            story_item_duration_ms: 5000,
            story_tick_ms: 16,
        }
    }
}

impl AppConfig {
    /// Read and validate a TOML file, then apply the environment override.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)?
            .with_api_url(std::env::var(ENV_API_URL).ok())
            .validated()
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Replace the API address when `url` is set and non-blank.
    pub fn with_api_url(mut self, url: Option<String>) -> Self {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            self.api_base_url = url.trim().to_string();
        }
        self
    }

    pub fn validated(self) -> Result<Self, ConfigError> {
        if !(self.api_base_url.starts_with("http://") || self.api_base_url.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "api_base_url must be an http(s) URL, got {:?}",
                self.api_base_url
            )));
        }
        for (name, value) in [
            ("chat_poll_interval_ms", self.chat_poll_interval_ms),
            ("story_item_duration_ms", self.story_item_duration_ms),
            ("story_tick_ms", self.story_tick_ms),
        ] {
            if value == 0 {
                return Err(ConfigError::Invalid(format!("{name} must be positive")));
            }
        }
        Ok(self)
    }

    pub fn upload_base(&self) -> String {
        match &self.upload_base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("{}/uploads", self.api_base_url.trim_end_matches('/')),
        }
    }

    pub fn chat_poll_interval(&self) -> Duration {
        Duration::from_millis(self.chat_poll_interval_ms)
    }

    pub fn story_item_duration(&self) -> Duration {
        Duration::from_millis(self.story_item_duration_ms)
    }

    pub fn story_tick(&self) -> Duration {
        Duration::from_millis(self.story_tick_ms)
    }
}
