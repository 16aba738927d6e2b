/*!
 * Error types for the scrybe application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur when talking to the recognition engine
#[derive(Error, Debug)]
pub enum EngineError {
    /// Error when making an HTTP request fails
    #[error("Engine request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an engine response fails
    #[error("Failed to parse engine response: {0}")]
    ParseError(String),

    /// Error returned by the engine itself
    #[error("Engine responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the engine
        message: String
    },

    /// Error establishing or maintaining a connection (engine unreachable)
    #[error("Engine connection error: {0}")]
    ConnectionError(String),

    /// The engine answered but reported it is not ready to transcribe
    #[error("Engine is not ready: {0}")]
    NotReady(String),
}

/// Errors that can occur during subtitle generation
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// Empty text in text mode, or no usable input at the caller boundary
    #[error("No input to generate subtitles from: {0}")]
    EmptyInput(String),

    /// A settings value that makes generation impossible
    #[error("Invalid subtitle settings: {0}")]
    InvalidSettings(String),

    /// A malformed timestamp or time range
    #[error("Invalid time range: end time {end_ms} <= start time {start_ms}")]
    InvalidTimeRange {
        /// Start of the offending range in milliseconds
        start_ms: u64,
        /// End of the offending range in milliseconds
        end_ms: u64
    },
}

/// Errors that can occur across a full generation workflow
#[derive(Error, Debug)]
pub enum GenerationError {
    /// Error from the recognition engine
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Error with subtitle processing
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from the recognition engine
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Error from subtitle processing
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// Error from a generation workflow
    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
