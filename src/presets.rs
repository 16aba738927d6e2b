use anyhow::{anyhow, Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::app_config::SubtitleSettings;

// @module: Named subtitle setting presets with JSON persistence

/// A named bundle of subtitle settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preset {
    /// Stable identifier; fixed names for built-ins, UUIDs for custom presets
    pub id: String,
    /// Display name
    pub name: String,
    /// Whether this preset ships with the application
    #[serde(default)]
    pub built_in: bool,
    /// The settings the preset applies
    pub settings: SubtitleSettings,
}

impl Preset {
    /// Create a custom preset with a fresh UUID
    pub fn custom(name: &str, settings: SubtitleSettings) -> Self {
        Preset {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            built_in: false,
            settings,
        }
    }
}

/// The presets that ship with the application.
///
/// Tuned for the three publishing targets users actually export to; the
/// shorts preset trades line width for pace, the podcast preset does the
/// opposite and skips the merge pass to keep sentences apart.
pub fn built_in_presets() -> Vec<Preset> {
    vec![
        Preset {
            id: "youtube".to_string(),
            name: "YouTube".to_string(),
            built_in: true,
            settings: SubtitleSettings {
                max_chars_per_line: 42,
                max_lines: 2,
                min_duration: 1.5,
                max_duration: 7.0,
                pause_between_subtitles: 0.2,
                max_cps: 17.0,
                words_per_minute: 150,
                auto_split: true,
                merge_short_lines: true,
            },
        },
        Preset {
            id: "shorts".to_string(),
            name: "Shorts / Reels".to_string(),
            built_in: true,
            settings: SubtitleSettings {
                max_chars_per_line: 30,
                max_lines: 2,
                min_duration: 1.0,
                max_duration: 4.0,
                pause_between_subtitles: 0.1,
                max_cps: 20.0,
                words_per_minute: 160,
                auto_split: true,
                merge_short_lines: true,
            },
        },
        Preset {
            id: "podcast".to_string(),
            name: "Podcast".to_string(),
            built_in: true,
            settings: SubtitleSettings {
                max_chars_per_line: 50,
                max_lines: 2,
                min_duration: 2.0,
                max_duration: 10.0,
                pause_between_subtitles: 0.3,
                max_cps: 15.0,
                words_per_minute: 140,
                auto_split: true,
                merge_short_lines: false,
            },
        },
    ]
}

/// Store of built-in and user-defined presets.
///
/// Custom presets persist as a JSON array; built-ins live in code and are
/// merged in on load, so upgrades never touch user files.
#[derive(Debug)]
pub struct PresetStore {
    path: PathBuf,
    presets: Vec<Preset>,
}

impl PresetStore {
    /// Default location of the custom presets file
    pub fn default_path() -> Result<PathBuf> {
        let base = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine the user configuration directory"))?;
        Ok(base.join("scrybe").join("presets.json"))
    }

    /// Load the store from a file, merging built-ins with saved custom presets.
    ///
    /// A missing file is not an error; the store starts with built-ins only.
    pub fn load(path: &Path) -> Result<Self> {
        let mut presets = built_in_presets();

        if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read presets file: {}", path.display()))?;
            let custom: Vec<Preset> = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse presets file: {}", path.display()))?;

            debug!("Loaded {} custom preset(s) from {}", custom.len(), path.display());
            // Saved copies of built-ins from older versions are ignored
            presets.extend(custom.into_iter().filter(|p| !p.built_in));
        }

        Ok(PresetStore {
            path: path.to_path_buf(),
            presets,
        })
    }

    /// Load the store from its default location
    pub fn load_default() -> Result<Self> {
        Self::load(&Self::default_path()?)
    }

    /// All presets, built-ins first
    pub fn presets(&self) -> &[Preset] {
        &self.presets
    }

    /// Find a preset by id or by case-insensitive name
    pub fn find(&self, id_or_name: &str) -> Option<&Preset> {
        self.presets.iter()
            .find(|p| p.id == id_or_name || p.name.eq_ignore_ascii_case(id_or_name))
    }

    /// Add a custom preset and persist the store
    pub fn add(&mut self, name: &str, settings: SubtitleSettings) -> Result<&Preset> {
        settings.validate()
            .with_context(|| format!("Preset '{}' has invalid settings", name))?;
        if self.find(name).is_some() {
            return Err(anyhow!("A preset named '{}' already exists", name));
        }

        let preset = Preset::custom(name, settings);
        info!("Saving preset '{}' ({})", preset.name, preset.id);
        self.presets.push(preset);
        self.save()?;

        Ok(self.presets.last().ok_or_else(|| anyhow!("Preset list empty after insert"))?)
    }

    /// Delete a custom preset by id or name; built-ins cannot be deleted
    pub fn delete(&mut self, id_or_name: &str) -> Result<()> {
        let preset = self.find(id_or_name)
            .ok_or_else(|| anyhow!("No preset matches '{}'", id_or_name))?;

        if preset.built_in {
            return Err(anyhow!("Preset '{}' is built in and cannot be deleted", preset.name));
        }

        let id = preset.id.clone();
        self.presets.retain(|p| p.id != id);
        self.save()
    }

    /// Write the custom presets back to disk
    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let custom: Vec<&Preset> = self.presets.iter().filter(|p| !p.built_in).collect();
        let content = serde_json::to_string_pretty(&custom)
            .context("Failed to serialize presets")?;
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write presets file: {}", self.path.display()))
    }
}
