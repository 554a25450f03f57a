use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

fn default_base_url() -> String {
  "http://localhost:8000".to_string()
}

fn default_timeout_secs() -> u64 {
  12
}

fn default_language() -> String {
  "en".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
  #[serde(default)]
  pub api: ApiConfig,
  /// Custom title for the header (defaults to the service host)
  pub title: Option<String>,
  /// User id for personalized recommendations, if the service knows us
  pub user_id: Option<String>,
  /// Pre-selected language for the taste quiz
  #[serde(default = "default_language")]
  pub quiz_language: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
  /// Base URL of the movie service
  #[serde(default = "default_base_url")]
  pub base_url: String,
  /// Per-request timeout in seconds
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs: u64,
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      base_url: default_base_url(),
      timeout_secs: default_timeout_secs(),
    }
  }
}

impl Default for Config {
  fn default() -> Self {
    Self {
      api: ApiConfig::default(),
      title: None,
      user_id: None,
      quiz_language: default_language(),
    }
  }
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./flicks.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/flicks/config.yaml
  ///
  /// Unlike most of the config surface, a missing file is not an error:
  /// every field has a default, so the app runs unconfigured against a
  /// local service.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    match path {
      Some(p) => Self::load_from_path(&p),
      None => Ok(Self::default()),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("flicks.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("flicks").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    let config: Config = serde_yaml::from_str(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))?;

    Ok(config)
  }

  pub fn request_timeout(&self) -> Duration {
    Duration::from_secs(self.api.timeout_secs)
  }

  /// Title for the header: configured title, or the service host.
  pub fn display_title(&self) -> String {
    if let Some(title) = &self.title {
      return title.clone();
    }
    url::Url::parse(&self.api.base_url)
      .ok()
      .and_then(|u| u.host_str().map(String::from))
      .unwrap_or_else(|| self.api.base_url.clone())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_defaults_when_unconfigured() {
    let config = Config::default();
    assert_eq!(config.api.base_url, "http://localhost:8000");
    assert_eq!(config.request_timeout(), Duration::from_secs(12));
    assert_eq!(config.quiz_language, "en");
  }

  #[test]
  fn test_parse_partial_yaml() {
    let config: Config = serde_yaml::from_str("api:\n  base_url: https://movies.example\n").unwrap();
    assert_eq!(config.api.base_url, "https://movies.example");
    // Omitted fields fall back to defaults.
    assert_eq!(config.api.timeout_secs, 12);
    assert_eq!(config.display_title(), "movies.example");
  }

  #[test]
  fn test_display_title_prefers_configured_title() {
    let config: Config = serde_yaml::from_str("title: My Movies\n").unwrap();
    assert_eq!(config.display_title(), "My Movies");
  }
}
