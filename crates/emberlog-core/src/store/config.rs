//! TOML-backed user settings.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::data_dir;
use crate::error::ConfigError;

const CONFIG_FILE: &str = "config.toml";

/// How much the app asks per day and how rich the recaps get.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepthLevel {
    #[default]
    Light,
    Reflect,
    Deep,
}

impl DepthLevel {
    pub fn title(&self) -> &'static str {
        match self {
            DepthLevel::Light => "Light",
            DepthLevel::Reflect => "Reflect",
            DepthLevel::Deep => "Deep",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            DepthLevel::Light => "One tap, once a day",
            DepthLevel::Reflect => "More patterns, still gentle",
            DepthLevel::Deep => "Richer summaries and longer reflections",
        }
    }

    /// Highest prompt level asked at this depth (prompts carry 1..=3).
    pub fn max_prompt_level(&self) -> u8 {
        match self {
            DepthLevel::Light => 1,
            DepthLevel::Reflect => 2,
            DepthLevel::Deep => 3,
        }
    }
}

impl fmt::Display for DepthLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DepthLevel::Light => "light",
            DepthLevel::Reflect => "reflect",
            DepthLevel::Deep => "deep",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Error)]
#[error("unknown depth level (expected light, reflect, or deep)")]
pub struct ParseDepthError;

impl FromStr for DepthLevel {
    type Err = ParseDepthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "light" => Ok(DepthLevel::Light),
            "reflect" => Ok(DepthLevel::Reflect),
            "deep" => Ok(DepthLevel::Deep),
            _ => Err(ParseDepthError),
        }
    }
}

/// Remote sync endpoint settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Base URL of the sync service, e.g. `https://xyz.supabase.co`.
    #[serde(default)]
    pub url: String,
    /// Anonymous API key sent with every request.
    #[serde(default)]
    pub anon_key: String,
}

impl RemoteConfig {
    /// True when both endpoint fields are filled in.
    pub fn is_configured(&self) -> bool {
        !self.url.is_empty() && !self.anon_key.is_empty()
    }
}

/// User-facing configuration, stored as `config.toml` in the data
/// directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub depth: DepthLevel,
    #[serde(default)]
    pub remote: RemoteConfig,
    /// Ask the remote generator for recaps before falling back to the
    /// local heuristic.
    #[serde(default = "default_remote_insights")]
    pub remote_insights: bool,
}

fn default_remote_insights() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            depth: DepthLevel::default(),
            remote: RemoteConfig::default(),
            remote_insights: default_remote_insights(),
        }
    }
}

impl Config {
    fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from(CONFIG_FILE),
            message: e.to_string(),
        })?;
        Ok(dir.join(CONFIG_FILE))
    }

    /// Load the config, writing a default file on first run.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        if !path.exists() {
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }
        let raw = std::fs::read_to_string(&path).map_err(|e| ConfigError::LoadFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        toml::from_str(&raw).map_err(|e| ConfigError::LoadFailed {
            path,
            message: e.to_string(),
        })
    }

    /// Like [`Config::load`], but any failure yields the defaults.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path().map_err(|e| ConfigError::SaveFailed {
            path: PathBuf::from(CONFIG_FILE),
            message: e.to_string(),
        })?;
        let raw = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, raw).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }

    /// Read a setting by its dotted key.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "depth" => Some(self.depth.to_string()),
            "remote.url" => Some(self.remote.url.clone()),
            "remote.anon_key" => Some(self.remote.anon_key.clone()),
            "remote_insights" => Some(self.remote_insights.to_string()),
            _ => None,
        }
    }

    /// Set a setting by its dotted key and persist the result.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "depth" => {
                self.depth = value.parse().map_err(|e: ParseDepthError| {
                    ConfigError::InvalidValue {
                        key: key.to_string(),
                        message: e.to_string(),
                    }
                })?;
            }
            "remote.url" => self.remote.url = value.trim_end_matches('/').to_string(),
            "remote.anon_key" => self.remote.anon_key = value.to_string(),
            "remote_insights" => {
                self.remote_insights = value.parse().map_err(|_| ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: "expected true or false".to_string(),
                })?;
            }
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.depth, DepthLevel::Light);
        assert!(config.remote_insights);
        assert!(!config.remote.is_configured());
    }

    #[test]
    fn depth_level_parses_case_insensitively() {
        assert_eq!("light".parse::<DepthLevel>().unwrap(), DepthLevel::Light);
        assert_eq!("Reflect".parse::<DepthLevel>().unwrap(), DepthLevel::Reflect);
        assert_eq!("DEEP".parse::<DepthLevel>().unwrap(), DepthLevel::Deep);
        assert!("medium".parse::<DepthLevel>().is_err());
    }

    #[test]
    fn depth_levels_order_prompt_access() {
        assert_eq!(DepthLevel::Light.max_prompt_level(), 1);
        assert_eq!(DepthLevel::Reflect.max_prompt_level(), 2);
        assert_eq!(DepthLevel::Deep.max_prompt_level(), 3);
    }

    #[test]
    fn remote_config_needs_both_fields() {
        let mut remote = RemoteConfig::default();
        assert!(!remote.is_configured());
        remote.url = "https://example.supabase.co".to_string();
        assert!(!remote.is_configured());
        remote.anon_key = "anon".to_string();
        assert!(remote.is_configured());
    }

    #[test]
    fn get_known_keys() {
        let config = Config::default();
        assert_eq!(config.get("depth"), Some("light".to_string()));
        assert_eq!(config.get("remote_insights"), Some("true".to_string()));
        assert_eq!(config.get("bogus"), None);
    }

    #[test]
    fn config_round_trips_through_toml() {
        let mut config = Config::default();
        config.depth = DepthLevel::Deep;
        config.remote.url = "https://example.supabase.co".to_string();

        let raw = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&raw).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let parsed: Config = toml::from_str("depth = \"reflect\"\n").unwrap();
        assert_eq!(parsed.depth, DepthLevel::Reflect);
        assert!(parsed.remote_insights);
        assert_eq!(parsed.remote.url, "");
    }
}
