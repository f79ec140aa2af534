use anyhow::{Context, Result, anyhow};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::providers::google_translate;
use crate::providers::google_vision;

/// Environment variable consulted when the config carries no API key
pub const API_KEY_ENV_VAR: &str = "GOOGLE_API_KEY";

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Default language of the documents being read (code or locale)
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Default language translations are made into
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Vocabulary database file; the user data directory when unset
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// Google Cloud settings
    #[serde(default)]
    pub google: GoogleConfig,

    /// Remember sentence translations for the lifetime of the process
    #[serde(default = "default_true")]
    pub sentence_cache_enabled: bool,

    /// Split Chinese, Japanese and Korean documents into words
    #[serde(default = "default_true")]
    pub tokenize_cjk: bool,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Google Cloud service configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GoogleConfig {
    /// API key for Cloud Translation and Cloud Vision
    #[serde(default)]
    pub api_key: String,

    /// Cloud Translation base URL
    #[serde(default = "default_translate_endpoint")]
    pub translate_endpoint: String,

    /// Cloud Vision base URL
    #[serde(default = "default_vision_endpoint")]
    pub vision_endpoint: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            translate_endpoint: default_translate_endpoint(),
            vision_endpoint: default_vision_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Log level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_source_language() -> String {
    "en-US".to_string()
}

fn default_target_language() -> String {
    "es".to_string()
}

fn default_translate_endpoint() -> String {
    google_translate::DEFAULT_ENDPOINT.to_string()
}

fn default_vision_endpoint() -> String {
    google_vision::DEFAULT_ENDPOINT.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load the configuration at `path`, writing the defaults there first
    /// if the file does not exist
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if path.exists() {
            let file = File::open(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;
            let config: Config = serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            return Ok(config);
        }

        warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        crate::language_utils::validate_language_code(&self.source_language)
            .context("Invalid source_language")?;
        crate::language_utils::validate_language_code(&self.target_language)
            .context("Invalid target_language")?;

        if self.google.timeout_secs == 0 {
            return Err(anyhow!("google.timeout_secs must be greater than zero"));
        }

        Ok(())
    }

    /// API key from the config file, or from `GOOGLE_API_KEY`
    pub fn api_key(&self) -> Option<String> {
        if !self.google.api_key.is_empty() {
            return Some(self.google.api_key.clone());
        }
        std::env::var(API_KEY_ENV_VAR).ok().filter(|k| !k.is_empty())
    }

    /// API key, failing when none is configured
    pub fn require_api_key(&self) -> Result<String> {
        self.api_key().ok_or_else(|| {
            anyhow!(
                "A Google API key is required: set google.api_key in the config or {}",
                API_KEY_ENV_VAR
            )
        })
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: default_source_language(),
            target_language: default_target_language(),
            database_path: None,
            google: GoogleConfig::default(),
            sentence_cache_enabled: true,
            tokenize_cjk: true,
            log_level: LogLevel::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_shouldBeValid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert!(config.sentence_cache_enabled);
        assert!(config.tokenize_cjk);
        assert_eq!(config.google.timeout_secs, 30);
    }

    #[test]
    fn test_deserialize_withPartialJson_shouldFillDefaults() {
        let config: Config = serde_json::from_str(r#"{"target_language": "fr", "log_level": "debug"}"#).unwrap();

        assert_eq!(config.source_language, "en-US");
        assert_eq!(config.target_language, "fr");
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.google.translate_endpoint, google_translate::DEFAULT_ENDPOINT);
        assert!(config.tokenize_cjk);
    }

    #[test]
    fn test_deserialize_withTokenizationOff_shouldKeepIt() {
        let config: Config = serde_json::from_str(r#"{"tokenize_cjk": false}"#).unwrap();
        assert!(!config.tokenize_cjk);
    }

    #[test]
    fn test_validate_withUnknownLanguage_shouldFail() {
        let config = Config {
            target_language: "zz".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_withZeroTimeout_shouldFail() {
        let mut config = Config::default();
        config.google.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_apiKey_fromConfig_shouldTakePrecedence() {
        let mut config = Config::default();
        config.google.api_key = "from-file".to_string();
        assert_eq!(config.api_key().as_deref(), Some("from-file"));
    }

    #[test]
    fn test_loadOrCreate_shouldWriteDefaultsThenReadThemBack() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conf.json");

        let created = Config::load_or_create(&path).unwrap();
        assert!(path.exists());

        let loaded = Config::load_or_create(&path).unwrap();
        assert_eq!(created, loaded);
    }

    #[test]
    fn test_loadOrCreate_withMalformedFile_shouldFail() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conf.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(Config::load_or_create(&path).is_err());
    }
}
