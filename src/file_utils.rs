use anyhow::{anyhow, Context, Result};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// @module: File system helpers for media discovery and output naming

/// Audio container extensions the engine accepts
const AUDIO_EXTENSIONS: [&str; 6] = ["mp3", "wav", "m4a", "flac", "ogg", "aac"];

/// Video container extensions the engine accepts
const VIDEO_EXTENSIONS: [&str; 6] = ["mp4", "mkv", "avi", "mov", "webm", "m4v"];

/// Subtitle file extensions
const SUBTITLE_EXTENSIONS: [&str; 3] = ["srt", "vtt", "ass"];

/// Kind of file, judged by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// Audio-only container
    Audio,
    /// Video container
    Video,
    /// An existing subtitle file
    Subtitle,
    /// Plain text
    Text,
    /// Anything else
    Unknown,
}

/// Helper for file operations
pub struct FileManager;

impl FileManager {
    /// Check whether a file exists and is a regular file
    pub fn file_exists(path: &Path) -> bool {
        path.is_file()
    }

    /// Create a directory and its parents if missing
    pub fn ensure_dir(path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {}", path.display()))?;
        }
        Ok(())
    }

    /// Read a file to a string
    pub fn read_to_string(path: &Path) -> Result<String> {
        fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))
    }

    /// Write a string to a file, creating parent directories as needed
    pub fn write_to_file(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            Self::ensure_dir(parent)?;
        }
        fs::write(path, content)
            .with_context(|| format!("Failed to write file: {}", path.display()))
    }

    /// Classify a file by its extension
    pub fn detect_kind(path: &Path) -> MediaKind {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return MediaKind::Unknown;
        };
        let ext = ext.to_lowercase();

        if AUDIO_EXTENSIONS.contains(&ext.as_str()) {
            MediaKind::Audio
        } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            MediaKind::Video
        } else if SUBTITLE_EXTENSIONS.contains(&ext.as_str()) {
            MediaKind::Subtitle
        } else if ext == "txt" {
            MediaKind::Text
        } else {
            MediaKind::Unknown
        }
    }

    /// Whether a path looks like media the engine can transcribe
    pub fn is_media_file(path: &Path) -> bool {
        matches!(Self::detect_kind(path), MediaKind::Audio | MediaKind::Video)
    }

    /// Output path next to the input: `name.{language}.{extension}`
    ///
    /// # Arguments
    /// * `input` - The source media or text file
    /// * `language` - Language tag inserted before the extension
    /// * `extension` - Output format extension, without the dot
    pub fn generate_output_path(input: &Path, language: &str, extension: &str) -> Result<PathBuf> {
        let stem = input.file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| anyhow!("Input path has no file name: {}", input.display()))?;

        let file_name = format!("{}.{}.{}", stem, language, extension);
        Ok(input.with_file_name(file_name))
    }

    /// Recursively collect media files under a directory, sorted by path
    pub fn find_media_files(dir: &Path) -> Result<Vec<PathBuf>> {
        if !dir.is_dir() {
            return Err(anyhow!("Not a directory: {}", dir.display()));
        }

        let mut files: Vec<PathBuf> = WalkDir::new(dir)
            .follow_links(false)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| Self::is_media_file(path))
            .collect();

        files.sort();
        debug!("Found {} media file(s) under {}", files.len(), dir.display());
        Ok(files)
    }
}
