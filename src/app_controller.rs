use anyhow::{anyhow, Context, Result};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::app_config::{Config, OutputFormat};
use crate::errors::EngineError;
use crate::file_utils::{FileManager, MediaKind};
use crate::generation::normalize::tokens_from_segments;
use crate::generation::{SubtitleGenerator, TranscriptInput};
use crate::providers::whisper::WhisperEngine;
use crate::providers::{SpeechEngine, TextGenerationRequest, TranscribeRequest};
use crate::serializer;
use crate::subtitle::SubtitleDocument;

// @module: Application controller for subtitle generation workflows

/// Main application controller wiring the engine client to the pipeline
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Recognition engine client
    engine: Arc<dyn SpeechEngine>,
    // @field: The generation pipeline
    generator: SubtitleGenerator,
}

/// Outcome of one file in folder mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileOutcome {
    Generated,
    Skipped,
    Failed,
}

impl Controller {
    /// Create a controller talking to the configured Whisper engine
    pub fn with_config(config: Config) -> Result<Self> {
        let engine = WhisperEngine::new(&config.engine.endpoint, config.engine.timeout_secs)
            .map_err(|e| anyhow!("Failed to create engine client: {}", e))?;
        Self::with_engine(config, Arc::new(engine))
    }

    /// Create a controller with an injected engine, used by tests
    pub fn with_engine(config: Config, engine: Arc<dyn SpeechEngine>) -> Result<Self> {
        config.validate()?;
        let generator = SubtitleGenerator::new(config.subtitle.clone())
            .map_err(|e| anyhow!("{}", e))?;

        Ok(Controller {
            config,
            engine,
            generator,
        })
    }

    /// The configuration this controller runs with
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Transcribe one media file and write the subtitle next to it.
    ///
    /// The engine returns timed segments; word timings are interpolated and
    /// the local pipeline re-segments and re-times them. When the configured
    /// language is "auto" the engine's detected language names the output.
    pub async fn run_transcribe(&self, input_file: &Path, output: Option<PathBuf>, force_overwrite: bool) -> Result<PathBuf> {
        let start_time = std::time::Instant::now();

        if !FileManager::file_exists(input_file) {
            return Err(anyhow!("Input file does not exist: {}", input_file.display()));
        }
        match FileManager::detect_kind(input_file) {
            MediaKind::Audio | MediaKind::Video => {}
            other => {
                return Err(anyhow!(
                    "Not a transcribable media file ({:?}): {}",
                    other, input_file.display()
                ));
            }
        }

        // Fail before the long-running request if the engine cannot serve it
        let status = self.engine.status().await
            .map_err(|e| self.describe_engine_error(e))?;
        if !status.ready {
            let reason = status.error.unwrap_or_else(|| "model still loading".to_string());
            return Err(EngineError::NotReady(reason).into());
        }

        info!("Transcribing {}", input_file.display());

        let request = TranscribeRequest::json_segments(
            input_file.to_string_lossy(),
            self.config.language.clone(),
            self.generator.settings(),
        );

        let response = self.engine.transcribe(request).await
            .map_err(|e| self.describe_engine_error(e))?;

        let segments = response.parse_segments()
            .map_err(|e| anyhow!("{}", e))?;
        debug!("Engine returned {} segment(s)", segments.len());

        let tokens = tokens_from_segments(&segments);
        let document = self.generator.generate(TranscriptInput::Timed(tokens));
        if document.is_empty() {
            return Err(anyhow!(
                "Engine produced no speech for {}",
                input_file.display()
            ));
        }

        let language = match self.config.language.as_str() {
            "auto" => response.language.as_deref().unwrap_or("auto").to_string(),
            lang => lang.to_string(),
        };

        let output_path = match output {
            Some(path) => path,
            None => FileManager::generate_output_path(
                input_file,
                &language,
                self.config.output_format.extension(),
            )?,
        };

        if output_path.exists() && !force_overwrite {
            warn!("Skipping file, output already exists (use -f to force overwrite)");
            return Ok(output_path);
        }

        self.write_document(&document, &output_path)?;
        info!(
            "Wrote {} cue(s) to {} in {}",
            document.len(),
            output_path.display(),
            Self::format_duration(start_time.elapsed())
        );

        Ok(output_path)
    }

    /// Generate subtitles from raw text on a synthetic timeline.
    ///
    /// Returns the rendered output; when `output` is given the result is also
    /// written there.
    pub fn run_text(&self, text: &str, output: Option<&Path>) -> Result<String> {
        if text.trim().is_empty() {
            return Err(anyhow!("No input to generate subtitles from: text is empty"));
        }

        let document = self.generator.generate(TranscriptInput::Plain(text.to_string()));
        if document.is_empty() {
            return Err(anyhow!("No input to generate subtitles from: text has no words"));
        }

        let rendered = serializer::render_document(&document, self.config.output_format)?;

        if let Some(path) = output {
            FileManager::write_to_file(path, &rendered)?;
            info!("Wrote {} cue(s) to {}", document.len(), path.display());
        }

        Ok(rendered)
    }

    /// Transcribe every media file under a directory.
    ///
    /// Files whose output already exists are skipped unless overwriting is
    /// forced. A failing file is logged and counted, not fatal.
    pub async fn run_folder(&self, input_dir: &Path, force_overwrite: bool) -> Result<()> {
        let start_time = std::time::Instant::now();

        let media_files = FileManager::find_media_files(input_dir)?;
        if media_files.is_empty() {
            return Err(anyhow!("No media files found in directory: {}", input_dir.display()));
        }

        let multi_progress = MultiProgress::new();
        let folder_pb = multi_progress.add(ProgressBar::new(media_files.len() as u64));
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        folder_pb.set_style(template_result.progress_chars("█▓▒░"));
        folder_pb.set_message("Transcribing files");

        let mut success_count = 0;
        let mut skip_count = 0;
        let mut error_count = 0;

        for media_file in &media_files {
            let file_name = media_file.file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            folder_pb.set_message(format!("Transcribing: {}", file_name));

            match self.transcribe_one(media_file, force_overwrite).await {
                Ok(FileOutcome::Generated) => success_count += 1,
                Ok(FileOutcome::Skipped) => skip_count += 1,
                Ok(FileOutcome::Failed) | Err(_) => error_count += 1,
            }
            folder_pb.inc(1);
        }

        folder_pb.finish_with_message(format!(
            "Done: {} generated, {} skipped, {} failed",
            success_count, skip_count, error_count
        ));
        info!(
            "Processed {} file(s) in {}: {} generated, {} skipped, {} failed",
            media_files.len(),
            Self::format_duration(start_time.elapsed()),
            success_count, skip_count, error_count
        );

        if success_count == 0 && error_count > 0 {
            return Err(anyhow!("All {} file(s) failed to transcribe", error_count));
        }
        Ok(())
    }

    /// Generate subtitles through the engine's text endpoint.
    ///
    /// Used when the engine should do the segmentation; the local pipeline
    /// equivalent is `run_text`. Text mode has everything it needs locally,
    /// so an unreachable engine degrades to the local estimated pipeline
    /// instead of failing.
    pub async fn run_text_remote(&self, text: &str, output: Option<&Path>) -> Result<String> {
        if text.trim().is_empty() {
            return Err(anyhow!("No input to generate subtitles from: text is empty"));
        }

        let request = TextGenerationRequest::new(
            text,
            self.config.output_format.to_lowercase_string(),
            self.generator.settings(),
        );
        let response = match self.engine.generate_from_text(request).await {
            Ok(response) => response,
            Err(EngineError::ConnectionError(msg)) => {
                warn!("Engine unreachable ({}), generating with estimated timing locally", msg);
                return self.run_text(text, output);
            }
            Err(e) => return Err(anyhow!("{}", e)),
        };

        let rendered = response.subtitles
            .ok_or_else(|| anyhow!("Engine returned no subtitles"))?;

        if let Some(path) = output {
            FileManager::write_to_file(path, &rendered)?;
            info!("Wrote engine output to {}", path.display());
        }

        Ok(rendered)
    }

    /// Report whether the engine is reachable and ready
    pub async fn engine_status(&self) -> Result<String> {
        match self.engine.status().await {
            Ok(status) if status.ready => Ok(format!(
                "Engine ready (model: {}, version: {})",
                status.model.as_deref().unwrap_or("unknown"),
                status.version.as_deref().unwrap_or("unknown"),
            )),
            Ok(status) => Ok(format!(
                "Engine running but not ready: {}",
                status.error.as_deref().unwrap_or("model still loading"),
            )),
            Err(EngineError::ConnectionError(msg)) => {
                Err(anyhow!("Engine unreachable: {}", msg))
            }
            Err(e) => Err(anyhow!("{}", e)),
        }
    }

    /// One file of the folder loop; failures are logged, not propagated
    async fn transcribe_one(&self, media_file: &Path, force_overwrite: bool) -> Result<FileOutcome> {
        let expected = FileManager::generate_output_path(
            media_file,
            &self.config.language,
            self.config.output_format.extension(),
        )?;
        if expected.exists() && !force_overwrite {
            debug!("Skipping {}, output already exists", media_file.display());
            return Ok(FileOutcome::Skipped);
        }

        match self.run_transcribe(media_file, None, force_overwrite).await {
            Ok(_) => Ok(FileOutcome::Generated),
            Err(e) => {
                error!("Failed to transcribe {}: {}", media_file.display(), e);
                Ok(FileOutcome::Failed)
            }
        }
    }

    /// Render and write a document in the configured output format
    fn write_document(&self, document: &SubtitleDocument, output_path: &Path) -> Result<()> {
        let rendered = serializer::render_document(document, self.config.output_format)
            .context("Failed to render subtitles")?;
        FileManager::write_to_file(output_path, &rendered)
    }

    /// Turn engine errors into messages that name the likely fix
    fn describe_engine_error(&self, error: EngineError) -> anyhow::Error {
        match error {
            EngineError::ConnectionError(msg) => anyhow!(
                "Recognition engine is not running ({}). Start it and retry, or check the endpoint {} in the configuration",
                msg, self.config.engine.endpoint
            ),
            other => anyhow!("{}", other),
        }
    }

    /// Human-readable elapsed time
    fn format_duration(duration: std::time::Duration) -> String {
        let seconds = duration.as_secs();
        if seconds >= 60 {
            format!("{}m {}s", seconds / 60, seconds % 60)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}

/// Format helper exposed for status output
pub fn describe_format(format: OutputFormat) -> &'static str {
    match format {
        OutputFormat::Srt => "SubRip (.srt)",
        OutputFormat::Vtt => "WebVTT (.vtt)",
        OutputFormat::Ass => "Advanced SubStation Alpha (.ass)",
        OutputFormat::Json => "JSON cue array (.json)",
        OutputFormat::Txt => "Plain text (.txt)",
    }
}
