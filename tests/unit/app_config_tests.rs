/*!
 * Tests for configuration loading, defaults, and validation
 */

#![allow(non_snake_case)]

use std::str::FromStr;
use anyhow::Result;
use scrybe::app_config::{secs_to_ms, Config, OutputFormat, SubtitleSettings};
use crate::common;

/// Test default configuration values
#[test]
fn test_config_default_shouldMatchDocumentedDefaults() {
    let config = Config::default();

    assert_eq!(config.language, "auto");
    assert_eq!(config.output_format, OutputFormat::Srt);
    assert_eq!(config.engine.endpoint, "http://127.0.0.1:5123");
    assert_eq!(config.engine.timeout_secs, 600);

    let s = &config.subtitle;
    assert_eq!(s.max_chars_per_line, 42);
    assert_eq!(s.max_lines, 2);
    assert!((s.min_duration - 1.5).abs() < f64::EPSILON);
    assert!((s.max_duration - 7.0).abs() < f64::EPSILON);
    assert!((s.pause_between_subtitles - 0.2).abs() < f64::EPSILON);
    assert!((s.max_cps - 17.0).abs() < f64::EPSILON);
    assert_eq!(s.words_per_minute, 150);
    assert!(s.auto_split);
    assert!(s.merge_short_lines);
}

/// Test default configuration passes validation
#[test]
fn test_config_default_shouldValidate() {
    assert!(Config::default().validate().is_ok());
}

/// Test settings validation rejects impossible values
#[test]
fn test_settings_validate_withBadValues_shouldFail() {
    let mut settings = SubtitleSettings { max_chars_per_line: 0, ..Default::default() };
    assert!(settings.validate().is_err());

    settings = SubtitleSettings { max_lines: 0, ..Default::default() };
    assert!(settings.validate().is_err());

    settings = SubtitleSettings { min_duration: 0.0, ..Default::default() };
    assert!(settings.validate().is_err());

    settings = SubtitleSettings { min_duration: 5.0, max_duration: 2.0, ..Default::default() };
    assert!(settings.validate().is_err());

    settings = SubtitleSettings { pause_between_subtitles: -0.1, ..Default::default() };
    assert!(settings.validate().is_err());

    settings = SubtitleSettings { max_cps: 0.0, ..Default::default() };
    assert!(settings.validate().is_err());

    settings = SubtitleSettings { words_per_minute: 0, ..Default::default() };
    assert!(settings.validate().is_err());
}

/// Test config validation rejects an unknown language
#[test]
fn test_config_validate_withUnknownLanguage_shouldFail() {
    let config = Config { language: "zz".to_string(), ..Default::default() };
    assert!(config.validate().is_err());
}

/// Test millisecond derivations of the settings
#[test]
fn test_settings_derived_values_shouldConvertToMilliseconds() {
    let settings = SubtitleSettings::default();
    assert_eq!(settings.min_duration_ms(), 1500);
    assert_eq!(settings.max_duration_ms(), 7000);
    assert_eq!(settings.gap_ms(), 200);
    assert_eq!(settings.max_chars_per_cue(), 84);
}

/// Test second-to-millisecond conversion rounds
#[test]
fn test_secs_to_ms_shouldRoundAndClampNegatives() {
    assert_eq!(secs_to_ms(1.5), 1500);
    assert_eq!(secs_to_ms(0.2), 200);
    assert_eq!(secs_to_ms(0.0005), 1);
    assert_eq!(secs_to_ms(-1.0), 0);
}

/// Test output format string round trip
#[test]
fn test_output_format_fromstr_and_display_shouldRoundTrip() {
    for name in ["srt", "vtt", "ass", "json", "txt"] {
        let format = OutputFormat::from_str(name).unwrap();
        assert_eq!(format.to_string(), name);
        assert_eq!(format.extension(), name);
    }

    assert_eq!(OutputFormat::from_str("TEXT").unwrap(), OutputFormat::Txt);
    assert!(OutputFormat::from_str("docx").is_err());
}

/// Test saving and reloading a configuration file
#[test]
fn test_config_file_round_trip_shouldPreserveValues() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let mut config = Config::default();
    config.language = "pt".to_string();
    config.output_format = OutputFormat::Vtt;
    config.subtitle.max_chars_per_line = 30;
    config.save_to_file(&path)?;

    let loaded = Config::from_file(&path)?;
    assert_eq!(loaded.language, "pt");
    assert_eq!(loaded.output_format, OutputFormat::Vtt);
    assert_eq!(loaded.subtitle.max_chars_per_line, 30);
    Ok(())
}

/// Test partial config files fall back to per-field defaults
#[test]
fn test_config_from_file_withPartialJson_shouldFillDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", r#"{"language": "en"}"#)?;

    let config = Config::from_file(&path)?;
    assert_eq!(config.language, "en");
    assert_eq!(config.output_format, OutputFormat::Srt);
    assert_eq!(config.subtitle.max_chars_per_line, 42);
    Ok(())
}

/// Test missing and invalid files yield defaults
#[test]
fn test_config_from_file_or_default_withMissingOrBrokenFile_shouldUseDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;

    let missing = temp_dir.path().join("nope.json");
    assert_eq!(Config::from_file_or_default(&missing).language, "auto");

    let broken = common::create_test_file(temp_dir.path(), "broken.json", "{not json")?;
    assert_eq!(Config::from_file_or_default(&broken).language, "auto");
    Ok(())
}
