/*!
 * # Scrybe - Subtitle generation from speech and text
 *
 * A Rust library for generating readable subtitles from Whisper-style
 * recognition output or from raw text.
 *
 * ## Features
 *
 * - Transcribe audio and video through a local Whisper recognition engine
 * - Segment recognized words into cues honoring line-length, line-count,
 *   duration, and reading-speed constraints
 * - Synthesize a timeline for typed text with no source timestamps
 * - Sentence-aware cue splitting and short-cue merging
 * - Export to SRT, WebVTT, ASS, JSON, and plain text
 * - Named setting presets for common publishing targets
 * - ISO 639 language code support
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `subtitle`: Cue and document types, timestamp handling
 * - `generation`: The subtitle generation pipeline:
 *   - `generation::normalize`: Raw input into ordered token runs
 *   - `generation::segment`: Token runs into line groups
 *   - `generation::timing`: Line groups into timed cues
 * - `serializer`: Output format rendering
 * - `presets`: Named setting presets with persistence
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `language_utils`: ISO language code utilities
 * - `providers`: Recognition engine clients:
 *   - `providers::whisper`: The local Whisper engine HTTP client
 *   - `providers::mock`: Scriptable engine for tests
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod generation;
pub mod language_utils;
pub mod presets;
pub mod providers;
pub mod serializer;
pub mod subtitle;

// Re-export main types for easier usage
pub use app_config::{Config, OutputFormat, SubtitleSettings};
pub use generation::{SubtitleGenerator, TranscriptInput};
pub use language_utils::{get_language_name, language_codes_match};
pub use subtitle::{Cue, SubtitleDocument, Token};
pub use errors::{AppError, EngineError, GenerationError, SubtitleError};
