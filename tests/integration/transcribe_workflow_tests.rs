/*!
 * Controller tests for the transcription workflow against a mock engine
 */

#![allow(non_snake_case)]

use std::sync::Arc;
use anyhow::Result;
use scrybe::app_config::{Config, OutputFormat};
use scrybe::app_controller::Controller;
use scrybe::providers::mock::MockEngine;
use scrybe::subtitle::SubtitleDocument;
use crate::common;

/// Test a full transcription run writes subtitles next to the input
#[tokio::test]
async fn test_run_transcribe_withMockEngine_shouldWriteSubtitleFile() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let media = common::create_test_file(temp_dir.path(), "episode.mp3", "fake audio")?;

    let config = Config { language: "en".to_string(), ..Default::default() };
    let mock = Arc::new(MockEngine::with_segments(common::sample_segments()));
    let controller = Controller::with_engine(config, mock.clone())?;

    let output = controller.run_transcribe(&media, None, false).await?;
    assert_eq!(output, temp_dir.path().join("episode.en.srt"));

    let content = std::fs::read_to_string(&output)?;
    let doc = SubtitleDocument::parse_srt_string(&content)?;
    assert!(!doc.is_empty());
    assert!(content.contains("Hello world today."));

    // The request the engine saw carried the file path and asked for JSON
    let calls = mock.transcribe_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].file_path, media.to_string_lossy());
    assert_eq!(calls[0].format, "json");
    assert_eq!(calls[0].language, "en");
    Ok(())
}

/// Test auto language uses the engine's detected language in the output name
#[tokio::test]
async fn test_run_transcribe_withAutoLanguage_shouldUseDetectedLanguage() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let media = common::create_test_file(temp_dir.path(), "clip.mp4", "fake video")?;

    let mock = Arc::new(MockEngine::with_segments(common::sample_segments()));
    let controller = Controller::with_engine(Config::default(), mock)?;

    let output = controller.run_transcribe(&media, None, false).await?;
    // The mock reports "en" as the detected language
    assert_eq!(output, temp_dir.path().join("clip.en.srt"));
    Ok(())
}

/// Test an explicit output path wins over the derived name
#[tokio::test]
async fn test_run_transcribe_withExplicitOutput_shouldUseIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let media = common::create_test_file(temp_dir.path(), "clip.mp4", "fake video")?;
    let wanted = temp_dir.path().join("custom-name.vtt");

    let config = Config { output_format: OutputFormat::Vtt, ..Default::default() };
    let mock = Arc::new(MockEngine::with_segments(common::sample_segments()));
    let controller = Controller::with_engine(config, mock)?;

    let output = controller.run_transcribe(&media, Some(wanted.clone()), false).await?;
    assert_eq!(output, wanted);
    assert!(std::fs::read_to_string(&wanted)?.starts_with("WEBVTT"));
    Ok(())
}

/// Test an unreachable engine fails with an actionable message
#[tokio::test]
async fn test_run_transcribe_withUnreachableEngine_shouldExplainFix() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let media = common::create_test_file(temp_dir.path(), "clip.mp4", "fake video")?;

    let controller = Controller::with_engine(Config::default(), Arc::new(MockEngine::unreachable()))?;

    let error = controller.run_transcribe(&media, None, false).await.unwrap_err();
    assert!(error.to_string().contains("not running"));
    Ok(())
}

/// Test an engine without a loaded model is rejected before transcription
#[tokio::test]
async fn test_run_transcribe_withEngineNotReady_shouldFailEarly() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let media = common::create_test_file(temp_dir.path(), "clip.mp4", "fake video")?;

    let mock = Arc::new(MockEngine::not_ready());
    let controller = Controller::with_engine(Config::default(), mock.clone())?;

    let error = controller.run_transcribe(&media, None, false).await.unwrap_err();
    assert!(error.to_string().contains("not ready"));
    assert!(mock.transcribe_calls().is_empty());
    Ok(())
}

/// Test non-media inputs are rejected before reaching the engine
#[tokio::test]
async fn test_run_transcribe_withNonMediaInput_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let text_file = common::create_test_file(temp_dir.path(), "notes.txt", "words")?;

    let mock = Arc::new(MockEngine::with_segments(common::sample_segments()));
    let controller = Controller::with_engine(Config::default(), mock.clone())?;

    assert!(controller.run_transcribe(&text_file, None, false).await.is_err());
    let missing = temp_dir.path().join("missing.mp3");
    assert!(controller.run_transcribe(&missing, None, false).await.is_err());
    assert!(mock.transcribe_calls().is_empty());
    Ok(())
}

/// Test an engine answer with no speech yields an error
#[tokio::test]
async fn test_run_transcribe_withNoSpeech_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let media = common::create_test_file(temp_dir.path(), "silence.wav", "fake audio")?;

    let controller = Controller::with_engine(
        Config::default(),
        Arc::new(MockEngine::with_segments(vec![])),
    )?;

    let error = controller.run_transcribe(&media, None, false).await.unwrap_err();
    assert!(error.to_string().contains("no speech"));
    Ok(())
}

/// Test existing outputs are preserved without the force flag
#[tokio::test]
async fn test_run_transcribe_withExistingOutput_shouldSkipWithoutForce() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let media = common::create_test_file(temp_dir.path(), "episode.mp3", "fake audio")?;
    let existing = common::create_test_file(temp_dir.path(), "episode.en.srt", "sentinel")?;

    let config = Config { language: "en".to_string(), ..Default::default() };
    let mock = Arc::new(MockEngine::with_segments(common::sample_segments()));
    let controller = Controller::with_engine(config.clone(), mock.clone())?;

    controller.run_transcribe(&media, None, false).await?;
    assert_eq!(std::fs::read_to_string(&existing)?, "sentinel");

    // Forcing overwrites the sentinel
    controller.run_transcribe(&media, None, true).await?;
    assert!(std::fs::read_to_string(&existing)?.contains("Hello world today."));
    Ok(())
}

/// Test folder mode transcribes every media file it finds
#[tokio::test]
async fn test_run_folder_withMixedFiles_shouldTranscribeAllMedia() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "one.mp3", "fake audio")?;
    common::create_test_file(temp_dir.path(), "two.mkv", "fake video")?;
    common::create_test_file(temp_dir.path(), "notes.txt", "not media")?;

    let config = Config { language: "en".to_string(), ..Default::default() };
    let mock = Arc::new(MockEngine::with_segments(common::sample_segments()));
    let controller = Controller::with_engine(config, mock.clone())?;

    controller.run_folder(temp_dir.path(), false).await?;

    assert!(temp_dir.path().join("one.en.srt").is_file());
    assert!(temp_dir.path().join("two.en.srt").is_file());
    assert!(!temp_dir.path().join("notes.en.srt").exists());
    assert_eq!(mock.transcribe_calls().len(), 2);
    Ok(())
}

/// Test folder mode fails on a directory without media
#[tokio::test]
async fn test_run_folder_withNoMedia_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "notes.txt", "not media")?;

    let controller = Controller::with_engine(
        Config::default(),
        Arc::new(MockEngine::with_segments(vec![])),
    )?;

    assert!(controller.run_folder(temp_dir.path(), false).await.is_err());
    Ok(())
}

/// Test the status check summarizes the engine state
#[tokio::test]
async fn test_engine_status_shouldSummarizeState() -> Result<()> {
    let ready = Controller::with_engine(
        Config::default(),
        Arc::new(MockEngine::with_segments(vec![])),
    )?;
    let message = ready.engine_status().await?;
    assert!(message.contains("Engine ready"));
    assert!(message.contains("mock-base"));

    let down = Controller::with_engine(Config::default(), Arc::new(MockEngine::unreachable()))?;
    assert!(down.engine_status().await.is_err());
    Ok(())
}
