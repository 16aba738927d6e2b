use anyhow::{anyhow, Context, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs;
use std::path::Path;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Language code for recognition (ISO 639 or "auto")
    #[serde(default = "default_language")]
    pub language: String,

    /// Default output format
    #[serde(default)]
    pub output_format: OutputFormat,

    /// Recognition engine config
    #[serde(default)]
    pub engine: EngineConfig,

    /// Subtitle readability settings
    #[serde(default)]
    pub subtitle: SubtitleSettings,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Subtitle output format
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    // @format: SubRip
    #[default]
    Srt,
    // @format: WebVTT
    Vtt,
    // @format: Advanced SubStation Alpha
    Ass,
    // @format: JSON cue array
    Json,
    // @format: Plain text, no timing
    Txt,
}

impl OutputFormat {
    // @returns: Output file extension
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Srt => "srt",
            Self::Vtt => "vtt",
            Self::Ass => "ass",
            Self::Json => "json",
            Self::Txt => "txt",
        }
    }

    // @returns: Lowercase format identifier
    pub fn to_lowercase_string(&self) -> String {
        self.extension().to_string()
    }
}

// Implement Display trait for OutputFormat
impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

// Implement FromStr trait for OutputFormat
impl std::str::FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "srt" => Ok(Self::Srt),
            "vtt" => Ok(Self::Vtt),
            "ass" => Ok(Self::Ass),
            "json" => Ok(Self::Json),
            "txt" | "text" => Ok(Self::Txt),
            _ => Err(anyhow!("Invalid output format: {}", s)),
        }
    }
}

/// Recognition engine connection configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EngineConfig {
    /// Engine base URL on the local loopback
    #[serde(default = "default_engine_endpoint")]
    pub endpoint: String,

    /// Request timeout in seconds; transcription of long media is slow
    #[serde(default = "default_engine_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            endpoint: default_engine_endpoint(),
            timeout_secs: default_engine_timeout_secs(),
        }
    }
}

/// Readability constraints for cue segmentation and timing.
///
/// A pure value struct; no behavior attaches to it. The defaults are the
/// standard two-line / 42-character broadcast profile.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SubtitleSettings {
    /// Maximum characters per displayed line
    #[serde(default = "default_max_chars_per_line")]
    pub max_chars_per_line: usize,

    /// Maximum displayed lines per cue
    #[serde(default = "default_max_lines")]
    pub max_lines: usize,

    /// Minimum cue duration in seconds
    #[serde(default = "default_min_duration")]
    pub min_duration: f64,

    /// Maximum cue duration in seconds
    #[serde(default = "default_max_duration")]
    pub max_duration: f64,

    /// Silence enforced between consecutive cues, in seconds
    #[serde(default = "default_pause_between_subtitles")]
    pub pause_between_subtitles: f64,

    /// Reading-speed ceiling in characters per second
    #[serde(default = "default_max_cps")]
    pub max_cps: f64,

    /// Speaking rate assumed for untimed text, in words per minute
    #[serde(default = "default_words_per_minute")]
    pub words_per_minute: u32,

    /// Close a cue early at sentence-ending punctuation
    #[serde(default = "default_true")]
    pub auto_split: bool,

    /// Merge adjacent short cues that still fit the line budget
    #[serde(default = "default_true")]
    pub merge_short_lines: bool,
}

impl Default for SubtitleSettings {
    fn default() -> Self {
        Self {
            max_chars_per_line: default_max_chars_per_line(),
            max_lines: default_max_lines(),
            min_duration: default_min_duration(),
            max_duration: default_max_duration(),
            pause_between_subtitles: default_pause_between_subtitles(),
            max_cps: default_max_cps(),
            words_per_minute: default_words_per_minute(),
            auto_split: true,
            merge_short_lines: true,
        }
    }
}

impl SubtitleSettings {
    /// Validate the settings for consistency
    pub fn validate(&self) -> Result<()> {
        if self.max_chars_per_line == 0 {
            return Err(anyhow!("max_chars_per_line must be at least 1"));
        }
        if self.max_lines == 0 {
            return Err(anyhow!("max_lines must be at least 1"));
        }
        if self.min_duration <= 0.0 {
            return Err(anyhow!("min_duration must be positive"));
        }
        if self.max_duration < self.min_duration {
            return Err(anyhow!(
                "max_duration {} is below min_duration {}",
                self.max_duration, self.min_duration
            ));
        }
        if self.pause_between_subtitles < 0.0 {
            return Err(anyhow!("pause_between_subtitles cannot be negative"));
        }
        if self.max_cps <= 0.0 {
            return Err(anyhow!("max_cps must be positive"));
        }
        if self.words_per_minute == 0 {
            return Err(anyhow!("words_per_minute must be at least 1"));
        }
        Ok(())
    }

    /// Character budget of a whole cue
    pub fn max_chars_per_cue(&self) -> usize {
        self.max_chars_per_line * self.max_lines
    }

    /// Minimum cue duration in milliseconds
    pub fn min_duration_ms(&self) -> u64 {
        secs_to_ms(self.min_duration)
    }

    /// Maximum cue duration in milliseconds
    pub fn max_duration_ms(&self) -> u64 {
        secs_to_ms(self.max_duration)
    }

    /// Inter-cue gap in milliseconds
    pub fn gap_ms(&self) -> u64 {
        secs_to_ms(self.pause_between_subtitles)
    }
}

/// Convert seconds to whole milliseconds, rounding
pub fn secs_to_ms(secs: f64) -> u64 {
    (secs.max(0.0) * 1000.0).round() as u64
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_language() -> String {
    "auto".to_string()
}

fn default_engine_endpoint() -> String {
    // The engine serves on the local loopback only
    "http://127.0.0.1:5123".to_string()
}

fn default_engine_timeout_secs() -> u64 {
    600
}

fn default_max_chars_per_line() -> usize {
    42
}

fn default_max_lines() -> usize {
    2
}

fn default_min_duration() -> f64 {
    1.5
}

fn default_max_duration() -> f64 {
    7.0
}

fn default_pause_between_subtitles() -> f64 {
    0.2
}

fn default_max_cps() -> f64 {
    17.0
}

fn default_words_per_minute() -> u32 {
    150
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a JSON file
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Result<Config>` - The parsed, validated configuration or an error
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.validate()?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a file, or fall back to defaults.
    ///
    /// A missing file yields the defaults silently; an unreadable or invalid
    /// file is logged and also yields the defaults.
    pub fn from_file_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Config::default();
        }
        match Self::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("Ignoring config file {}: {}", path.display(), e);
                Config::default()
            }
        }
    }

    /// Save the configuration as pretty-printed JSON
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .context("Failed to serialize configuration")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        crate::language_utils::validate_language_or_auto(&self.language)?;
        self.subtitle.validate()?;

        if self.engine.endpoint.trim().is_empty() {
            return Err(anyhow!("Engine endpoint must not be empty"));
        }
        if self.engine.timeout_secs == 0 {
            return Err(anyhow!("Engine timeout must be at least 1 second"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            language: default_language(),
            output_format: OutputFormat::default(),
            engine: EngineConfig::default(),
            subtitle: SubtitleSettings::default(),
            log_level: LogLevel::default(),
        }
    }
}
