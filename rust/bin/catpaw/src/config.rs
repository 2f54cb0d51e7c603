//! Client-side profile management.
//!
//! Reads/writes `~/.catpaw/config.toml`. Passwords are never stored.

use std::path::{Path, PathBuf};

use catpaw_app::AppConfig;
use serde::{Deserialize, Serialize};

/// A named backend to talk to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Profile name (e.g. "local", "staging").
    pub name: String,

    /// API base URL (e.g. "http://localhost/catpaw/api").
    pub api_url: String,

    /// Media base URL when uploads are served elsewhere.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub upload_url: String,

    /// Email to log in with when `--email` is not given.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub email: String,
}

impl Profile {
    /// Engine settings for this profile on top of `base`.
    pub fn app_config(&self, base: AppConfig) -> AppConfig {
        AppConfig {
            upload_base_url: (!self.upload_url.is_empty())
                .then(|| self.upload_url.clone())
                .or(base.upload_base_url.clone()),
            ..base
        }
        .with_api_url(Some(self.api_url.clone()))
    }
}

/// Client configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Name of the active profile.
    #[serde(rename = "current-profile", default)]
    pub current_profile: String,

    #[serde(default)]
    pub profiles: Vec<Profile>,
}

impl ClientConfig {
    /// Default config file path: ~/.catpaw/config.toml.
    pub fn default_path() -> PathBuf {
        dirs_path().join("config.toml")
    }

    /// Load config from disk, or return default if the file doesn't exist.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn current(&self) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.name == self.current_profile)
    }

    pub fn get(&self, name: &str) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.name == name)
    }

    /// Add or replace a profile. The first profile becomes current.
    pub fn upsert_profile(&mut self, profile: Profile) {
        if self.current_profile.is_empty() {
            self.current_profile = profile.name.clone();
        }
        match self.profiles.iter_mut().find(|p| p.name == profile.name) {
            Some(existing) => *existing = profile,
            None => self.profiles.push(profile),
        }
    }

    /// Remove a profile by name. Returns true if it was found.
    pub fn remove_profile(&mut self, name: &str) -> bool {
        let len = self.profiles.len();
        self.profiles.retain(|p| p.name != name);
        if self.current_profile == name {
            self.current_profile.clear();
        }
        self.profiles.len() < len
    }
}

/// The CatPaw config directory (~/.catpaw).
fn dirs_path() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".catpaw")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local() -> Profile {
        Profile {
            name: "local".into(),
            api_url: "http://10.0.2.2/catpaw/api".into(),
            upload_url: String::new(),
            email: "tom@catpaw.app".into(),
        }
    }

    #[test]
    fn first_profile_becomes_current() {
        let mut config = ClientConfig::default();
        assert!(config.current().is_none());
        config.upsert_profile(local());
        config.upsert_profile(Profile { name: "staging".into(), ..local() });
        assert_eq!(config.current().unwrap().name, "local");
        assert_eq!(config.profiles.len(), 2);
    }

    #[test]
    fn upsert_replaces_by_name() {
        let mut config = ClientConfig::default();
        config.upsert_profile(local());
        config.upsert_profile(Profile { email: "mia@catpaw.app".into(), ..local() });
        assert_eq!(config.profiles.len(), 1);
        assert_eq!(config.get("local").unwrap().email, "mia@catpaw.app");
    }

    #[test]
    fn removing_current_clears_selection() {
        let mut config = ClientConfig::default();
        config.upsert_profile(local());
        assert!(config.remove_profile("local"));
        assert!(!config.remove_profile("local"));
        assert!(config.current_profile.is_empty());
    }

    #[test]
    fn save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = ClientConfig::default();
        config.upsert_profile(local());
        config.save(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("current-profile = \"local\""));
        assert!(!content.contains("upload_url"));

        let back = ClientConfig::load(&path).unwrap();
        assert_eq!(back.current(), Some(&local()));
    }

    #[test]
    fn missing_file_is_empty_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClientConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert!(config.profiles.is_empty());
    }

    #[test]
    fn profile_overrides_urls() {
        let profile = Profile { upload_url: "https://cdn.catpaw.app".into(), ..local() };
        let app = profile.app_config(AppConfig::default());
        assert_eq!(app.api_base_url, "http://10.0.2.2/catpaw/api");
        assert_eq!(app.upload_base(), "https://cdn.catpaw.app");

        let app = local().app_config(AppConfig { chat_poll_interval_ms: 500, ..AppConfig::default() });
        assert_eq!(app.upload_base(), "http://10.0.2.2/catpaw/api/uploads");
        assert_eq!(app.chat_poll_interval_ms, 500);
    }
}
