/*!
 * Recognition engine clients.
 *
 * The speech-to-text work is delegated to an external Whisper-based engine
 * reached over local loopback HTTP. This module defines the wire types of
 * that interface, the trait the application talks through, and the client
 * implementations:
 * - whisper: the real HTTP client
 * - mock: a scriptable engine for tests
 */

use async_trait::async_trait;
use serde::{Serialize, Deserialize};
use std::fmt::Debug;

use crate::app_config::SubtitleSettings;
use crate::errors::EngineError;
use crate::subtitle::EngineSegment;

/// Request body for `POST /transcribe`
#[derive(Debug, Clone, Serialize)]
pub struct TranscribeRequest {
    /// Path of the audio or video file to transcribe
    pub file_path: String,
    /// Language code or "auto"
    pub language: String,
    /// Output format requested from the engine
    pub format: String,
    /// Maximum characters per line
    pub max_chars_per_line: usize,
    /// Maximum lines per cue
    pub max_lines: usize,
    /// Minimum cue duration in seconds
    pub min_duration: f64,
    /// Maximum cue duration in seconds
    pub max_duration: f64,
}

impl TranscribeRequest {
    /// Build a transcription request asking for JSON segments, the format
    /// the local pipeline re-times and re-segments itself
    pub fn json_segments(file_path: impl Into<String>, language: impl Into<String>, settings: &SubtitleSettings) -> Self {
        TranscribeRequest {
            file_path: file_path.into(),
            language: language.into(),
            format: "json".to_string(),
            max_chars_per_line: settings.max_chars_per_line,
            max_lines: settings.max_lines,
            min_duration: settings.min_duration,
            max_duration: settings.max_duration,
        }
    }
}

/// Request body for `POST /generate-from-text`
#[derive(Debug, Clone, Serialize)]
pub struct TextGenerationRequest {
    /// Raw text to turn into subtitles
    pub text: String,
    /// Output format requested from the engine
    pub format: String,
    /// Maximum characters per line
    pub max_chars_per_line: usize,
    /// Maximum lines per cue
    pub max_lines: usize,
    /// Minimum cue duration in seconds
    pub min_duration: f64,
    /// Maximum cue duration in seconds
    pub max_duration: f64,
    /// Gap between cues in seconds
    pub gap: f64,
    /// Reading speed ceiling in characters per second
    pub max_cps: f64,
    /// Assumed speaking rate in words per minute
    pub wpm: u32,
}

impl TextGenerationRequest {
    /// Build a text generation request from settings
    pub fn new(text: impl Into<String>, format: impl Into<String>, settings: &SubtitleSettings) -> Self {
        TextGenerationRequest {
            text: text.into(),
            format: format.into(),
            max_chars_per_line: settings.max_chars_per_line,
            max_lines: settings.max_lines,
            min_duration: settings.min_duration,
            max_duration: settings.max_duration,
            gap: settings.pause_between_subtitles,
            max_cps: settings.max_cps,
            wpm: settings.words_per_minute,
        }
    }
}

/// Response shared by both generation endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineResponse {
    /// Whether the engine completed the request
    pub success: bool,
    /// Serialized subtitles in the requested format
    #[serde(default)]
    pub subtitles: Option<String>,
    /// Media or timeline duration in seconds
    #[serde(default)]
    pub duration: Option<f64>,
    /// Detected or requested language
    #[serde(default)]
    pub language: Option<String>,
    /// Number of cues produced, when the engine reports it
    #[serde(default)]
    pub segment_count: Option<usize>,
    /// Error message when `success` is false
    #[serde(default)]
    pub error: Option<String>,
}

impl EngineResponse {
    /// Parse the `subtitles` payload of a JSON-format response into segments.
    ///
    /// The engine wraps the array in `{"segments": [...]}`; a bare array is
    /// accepted too.
    pub fn parse_segments(&self) -> Result<Vec<EngineSegment>, EngineError> {
        let payload = self.subtitles.as_deref()
            .ok_or_else(|| EngineError::ParseError("Response carries no subtitles payload".to_string()))?;

        #[derive(Deserialize)]
        struct SegmentsEnvelope {
            segments: Vec<EngineSegment>,
        }

        if let Ok(envelope) = serde_json::from_str::<SegmentsEnvelope>(payload) {
            return Ok(envelope.segments);
        }

        serde_json::from_str::<Vec<EngineSegment>>(payload)
            .map_err(|e| EngineError::ParseError(format!("Invalid segments payload: {}", e)))
    }
}

/// Response of `GET /status`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineStatus {
    /// Whether the engine has a model loaded and can transcribe
    pub ready: bool,
    /// Loaded model name
    #[serde(default)]
    pub model: Option<String>,
    /// Engine version string
    #[serde(default)]
    pub version: Option<String>,
    /// Error message when the engine failed to initialize
    #[serde(default)]
    pub error: Option<String>,
}

/// Common trait for recognition engine clients
///
/// This trait defines the interface the application talks to the engine
/// through, allowing the HTTP client and the test mock to be used
/// interchangeably.
#[async_trait]
pub trait SpeechEngine: Send + Sync + Debug {
    /// Transcribe an audio or video file
    ///
    /// # Arguments
    /// * `request` - The transcription request
    ///
    /// # Returns
    /// * `Result<EngineResponse, EngineError>` - The engine's response or an error
    async fn transcribe(&self, request: TranscribeRequest) -> Result<EngineResponse, EngineError>;

    /// Ask the engine to generate subtitles from raw text
    ///
    /// # Arguments
    /// * `request` - The text generation request
    ///
    /// # Returns
    /// * `Result<EngineResponse, EngineError>` - The engine's response or an error
    async fn generate_from_text(&self, request: TextGenerationRequest) -> Result<EngineResponse, EngineError>;

    /// Query whether the engine is up and has a model loaded
    async fn status(&self) -> Result<EngineStatus, EngineError>;
}

pub mod whisper;
pub mod mock;
