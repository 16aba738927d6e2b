/*!
 * Tests for setting presets and their persistence
 */

#![allow(non_snake_case)]

use anyhow::Result;
use uuid::Uuid;
use scrybe::app_config::SubtitleSettings;
use scrybe::presets::{built_in_presets, PresetStore};
use crate::common;

/// Test the shipped presets carry the expected profiles
#[test]
fn test_built_in_presets_shouldMatchShippedProfiles() {
    let presets = built_in_presets();
    assert_eq!(presets.len(), 3);

    let ids: Vec<&str> = presets.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["youtube", "shorts", "podcast"]);
    assert!(presets.iter().all(|p| p.built_in));
    assert!(presets.iter().all(|p| p.settings.validate().is_ok()));

    let youtube = &presets[0];
    assert_eq!(youtube.settings.max_chars_per_line, 42);
    assert!((youtube.settings.max_cps - 17.0).abs() < f64::EPSILON);

    let shorts = &presets[1];
    assert_eq!(shorts.settings.max_chars_per_line, 30);
    assert!((shorts.settings.max_duration - 4.0).abs() < f64::EPSILON);

    let podcast = &presets[2];
    assert_eq!(podcast.settings.max_chars_per_line, 50);
    assert!(!podcast.settings.merge_short_lines);
}

/// Test loading with no saved file yields the built-ins
#[test]
fn test_store_load_withMissingFile_shouldHaveBuiltInsOnly() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let store = PresetStore::load(&temp_dir.path().join("presets.json"))?;

    assert_eq!(store.presets().len(), 3);
    assert!(store.find("youtube").is_some());
    Ok(())
}

/// Test lookup works by id and by case-insensitive name
#[test]
fn test_store_find_shouldMatchIdAndName() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let store = PresetStore::load(&temp_dir.path().join("presets.json"))?;

    assert!(store.find("shorts").is_some());
    assert!(store.find("Shorts / Reels").is_some());
    assert!(store.find("SHORTS / REELS").is_some());
    assert!(store.find("nonexistent").is_none());
    Ok(())
}

/// Test adding a custom preset persists it with a UUID
#[test]
fn test_store_add_shouldPersistCustomPresetWithUuid() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("presets.json");

    let mut store = PresetStore::load(&path)?;
    let settings = SubtitleSettings { max_chars_per_line: 35, ..Default::default() };
    let id = store.add("My Preset", settings)?.id.clone();
    assert!(Uuid::parse_str(&id).is_ok());

    // A fresh load from the same file sees the custom preset
    let reloaded = PresetStore::load(&path)?;
    assert_eq!(reloaded.presets().len(), 4);
    let preset = reloaded.find("My Preset").unwrap();
    assert_eq!(preset.id, id);
    assert!(!preset.built_in);
    assert_eq!(preset.settings.max_chars_per_line, 35);
    Ok(())
}

/// Test duplicate names and invalid settings are rejected
#[test]
fn test_store_add_withBadInput_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let mut store = PresetStore::load(&temp_dir.path().join("presets.json"))?;

    // Name collides with a built-in
    assert!(store.add("YouTube", SubtitleSettings::default()).is_err());

    let invalid = SubtitleSettings { max_lines: 0, ..Default::default() };
    assert!(store.add("Broken", invalid).is_err());
    Ok(())
}

/// Test built-ins cannot be deleted and customs can
#[test]
fn test_store_delete_shouldProtectBuiltIns() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("presets.json");

    let mut store = PresetStore::load(&path)?;
    assert!(store.delete("youtube").is_err());
    assert!(store.delete("missing").is_err());

    store.add("Disposable", SubtitleSettings::default())?;
    store.delete("Disposable")?;
    assert!(store.find("Disposable").is_none());

    // The deletion persisted
    let reloaded = PresetStore::load(&path)?;
    assert_eq!(reloaded.presets().len(), 3);
    Ok(())
}
