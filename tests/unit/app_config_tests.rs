/*!
 * Tests for configuration loading and saving
 */

use anyhow::Result;
use std::path::PathBuf;

use lector::app_config::{Config, LogLevel};
use crate::common;

#[test]
fn test_save_thenLoad_shouldRoundTripCustomValues() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = dir.path().join("conf.json");

    let mut config = Config::default();
    config.source_language = "ja-JP".to_string();
    config.target_language = "en".to_string();
    config.database_path = Some(PathBuf::from("/tmp/words.sqlite"));
    config.sentence_cache_enabled = false;
    config.log_level = LogLevel::Warn;
    config.save(&path)?;

    let loaded = Config::load_or_create(&path)?;
    assert_eq!(loaded, config);
    assert!(loaded.validate().is_ok());
    Ok(())
}

#[test]
fn test_loadOrCreate_withEmptyObject_shouldUseDefaults() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = dir.path().join("conf.json");
    std::fs::write(&path, "{}")?;

    let config = Config::load_or_create(&path)?;

    assert_eq!(config, Config::default());
    Ok(())
}

#[test]
fn test_validate_withInvalidSource_shouldNameTheField() {
    let config = Config {
        source_language: "qq".to_string(),
        ..Config::default()
    };

    let err = config.validate().unwrap_err();
    assert!(format!("{:#}", err).contains("source_language"));
}

#[test]
fn test_logLevel_shouldConvertToLevelFilter() {
    let filter: log::LevelFilter = LogLevel::Debug.into();
    assert_eq!(filter, log::LevelFilter::Debug);
}
