use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use std::time::Duration;

use crate::errors::EngineError;
use crate::providers::{EngineResponse, EngineStatus, SpeechEngine, TextGenerationRequest, TranscribeRequest};

// @module: HTTP client for the local Whisper recognition engine

/// Client for the Whisper engine's loopback HTTP interface
#[derive(Debug, Clone)]
pub struct WhisperEngine {
    /// Base URL of the engine, e.g. `http://127.0.0.1:5123`
    endpoint: String,
    /// Shared HTTP client
    client: Client,
}

impl WhisperEngine {
    /// Create a new client for the given endpoint
    ///
    /// # Arguments
    /// * `endpoint` - Base URL of the engine
    /// * `timeout_secs` - Per-request timeout; transcription of long media is slow
    ///
    /// # Returns
    /// * `Result<Self, EngineError>` - The client or an error
    pub fn new(endpoint: &str, timeout_secs: u64) -> Result<Self, EngineError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| EngineError::RequestFailed(format!("Failed to create HTTP client: {}", e)))?;

        Ok(WhisperEngine {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// The configured endpoint
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// POST a JSON body and decode a JSON response
    async fn post_json<B: serde::Serialize>(&self, path: &str, body: &B) -> Result<EngineResponse, EngineError> {
        let url = format!("{}{}", self.endpoint, path);
        debug!("Sending request to engine: {}", url);

        let response = self.client.post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    EngineError::ConnectionError(format!("Engine unreachable at {}: {}", url, e))
                } else {
                    EngineError::RequestFailed(format!("Request to {} failed: {}", url, e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(EngineError::ApiError {
                status_code: status.as_u16(),
                message,
            });
        }

        let parsed: EngineResponse = response.json().await
            .map_err(|e| EngineError::ParseError(format!("Invalid engine response: {}", e)))?;

        if !parsed.success {
            let message = parsed.error
                .unwrap_or_else(|| "Engine reported failure without a message".to_string());
            return Err(EngineError::RequestFailed(message));
        }

        Ok(parsed)
    }
}

#[async_trait]
impl SpeechEngine for WhisperEngine {
    async fn transcribe(&self, request: TranscribeRequest) -> Result<EngineResponse, EngineError> {
        self.post_json("/transcribe", &request).await
    }

    async fn generate_from_text(&self, request: TextGenerationRequest) -> Result<EngineResponse, EngineError> {
        self.post_json("/generate-from-text", &request).await
    }

    async fn status(&self) -> Result<EngineStatus, EngineError> {
        let url = format!("{}/status", self.endpoint);
        debug!("Querying engine status: {}", url);

        let response = self.client.get(&url)
            .send()
            .await
            .map_err(|e| EngineError::ConnectionError(format!("Engine unreachable at {}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(EngineError::ApiError {
                status_code: status.as_u16(),
                message,
            });
        }

        response.json().await
            .map_err(|e| EngineError::ParseError(format!("Invalid status response: {}", e)))
    }
}
