use async_trait::async_trait;
use std::sync::Mutex;

use crate::errors::EngineError;
use crate::providers::{EngineResponse, EngineStatus, SpeechEngine, TextGenerationRequest, TranscribeRequest};
use crate::subtitle::EngineSegment;

// @module: Scriptable engine used by tests instead of a live Whisper process

/// Behavior the mock should exhibit on the next call
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Return the configured segments
    Succeed,
    /// Fail as if the engine process were not running
    Unreachable,
    /// Fail with an engine-side error message
    Fail(String),
}

/// A recognition engine that replays configured segments.
///
/// Calls are recorded so tests can assert on the requests the application
/// actually sent.
#[derive(Debug)]
pub struct MockEngine {
    segments: Vec<EngineSegment>,
    behavior: MockBehavior,
    ready: bool,
    transcribe_calls: Mutex<Vec<TranscribeRequest>>,
    text_calls: Mutex<Vec<TextGenerationRequest>>,
}

impl MockEngine {
    /// Create a mock that succeeds with the given segments
    pub fn with_segments(segments: Vec<EngineSegment>) -> Self {
        MockEngine {
            segments,
            behavior: MockBehavior::Succeed,
            ready: true,
            transcribe_calls: Mutex::new(Vec::new()),
            text_calls: Mutex::new(Vec::new()),
        }
    }

    /// Create a mock that behaves as if the engine were down
    pub fn unreachable() -> Self {
        MockEngine {
            segments: Vec::new(),
            behavior: MockBehavior::Unreachable,
            ready: false,
            transcribe_calls: Mutex::new(Vec::new()),
            text_calls: Mutex::new(Vec::new()),
        }
    }

    /// Create a mock that answers status checks but has no model loaded
    pub fn not_ready() -> Self {
        MockEngine {
            segments: Vec::new(),
            behavior: MockBehavior::Fail("no model loaded".to_string()),
            ready: false,
            transcribe_calls: Mutex::new(Vec::new()),
            text_calls: Mutex::new(Vec::new()),
        }
    }

    /// Create a mock that fails with an engine-side error
    pub fn failing(message: &str) -> Self {
        MockEngine {
            segments: Vec::new(),
            behavior: MockBehavior::Fail(message.to_string()),
            ready: true,
            transcribe_calls: Mutex::new(Vec::new()),
            text_calls: Mutex::new(Vec::new()),
        }
    }

    /// Requests received by `transcribe`
    pub fn transcribe_calls(&self) -> Vec<TranscribeRequest> {
        self.transcribe_calls.lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    /// Requests received by `generate_from_text`
    pub fn text_calls(&self) -> Vec<TextGenerationRequest> {
        self.text_calls.lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    fn respond(&self) -> Result<EngineResponse, EngineError> {
        match &self.behavior {
            MockBehavior::Succeed => {
                let payload = serde_json::json!({ "segments": self.segments }).to_string();
                let duration = self.segments.iter()
                    .map(|s| s.end)
                    .fold(0.0_f64, f64::max);
                Ok(EngineResponse {
                    success: true,
                    subtitles: Some(payload),
                    duration: Some(duration),
                    language: Some("en".to_string()),
                    segment_count: Some(self.segments.len()),
                    error: None,
                })
            }
            MockBehavior::Unreachable => Err(EngineError::ConnectionError(
                "Engine unreachable at http://127.0.0.1:5123: connection refused".to_string(),
            )),
            MockBehavior::Fail(message) => Err(EngineError::RequestFailed(message.clone())),
        }
    }
}

#[async_trait]
impl SpeechEngine for MockEngine {
    async fn transcribe(&self, request: TranscribeRequest) -> Result<EngineResponse, EngineError> {
        if let Ok(mut calls) = self.transcribe_calls.lock() {
            calls.push(request);
        }
        self.respond()
    }

    async fn generate_from_text(&self, request: TextGenerationRequest) -> Result<EngineResponse, EngineError> {
        if let Ok(mut calls) = self.text_calls.lock() {
            calls.push(request);
        }
        self.respond()
    }

    async fn status(&self) -> Result<EngineStatus, EngineError> {
        match &self.behavior {
            MockBehavior::Unreachable => Err(EngineError::ConnectionError(
                "Engine unreachable".to_string(),
            )),
            _ => Ok(EngineStatus {
                ready: self.ready,
                model: Some("mock-base".to_string()),
                version: Some("0.0.0".to_string()),
                error: None,
            }),
        }
    }
}
