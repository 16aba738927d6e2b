/*!
 * The subtitle generation pipeline.
 *
 * Three pure stages compose into one transformation:
 * - `normalize`: raw input into ordered token runs
 * - `segment`: token runs into line groups honoring readability limits
 * - `timing`: line groups into timed cues
 *
 * Each stage is a synchronous function over immutable data; the pipeline
 * holds no state across documents and is safe to run concurrently for
 * independent inputs.
 */

pub mod normalize;
pub mod segment;
pub mod timing;

use crate::app_config::SubtitleSettings;
use crate::errors::SubtitleError;
use crate::subtitle::{SubtitleDocument, Token};

/// Input to the pipeline, tagged by timing mode.
///
/// Timed input carries per-word recognition timestamps; plain input is typed
/// text whose timeline must be synthesized. Keeping the modes as variants
/// (rather than a flag threaded through every stage) keeps each mode's
/// invariants locally checkable.
#[derive(Debug, Clone)]
pub enum TranscriptInput {
    /// Recognized words with per-word timestamps
    Timed(Vec<Token>),
    /// Free-form typed text, no timing
    Plain(String),
}

/// The subtitle generation engine: settings plus the composed pipeline.
#[derive(Debug, Clone)]
pub struct SubtitleGenerator {
    settings: SubtitleSettings,
}

impl SubtitleGenerator {
    /// Create a generator, validating the settings once up front
    pub fn new(settings: SubtitleSettings) -> Result<Self, SubtitleError> {
        settings.validate()
            .map_err(|e| SubtitleError::InvalidSettings(e.to_string()))?;
        Ok(SubtitleGenerator { settings })
    }

    /// The settings this generator applies
    pub fn settings(&self) -> &SubtitleSettings {
        &self.settings
    }

    /// Run the full pipeline over one input.
    ///
    /// An input with no usable tokens yields an empty document rather than
    /// an error; rejecting empty input is the caller's decision.
    pub fn generate(&self, input: TranscriptInput) -> SubtitleDocument {
        self.generate_from(input, 0)
    }

    /// Run the full pipeline with an estimated-mode timeline offset.
    ///
    /// The offset shifts the synthetic timeline of plain-text input; timed
    /// input keeps its source timestamps and ignores the offset.
    pub fn generate_from(&self, input: TranscriptInput, start_offset_ms: u64) -> SubtitleDocument {
        let cues = match input {
            TranscriptInput::Timed(tokens) => {
                let runs = normalize::normalize_timed_tokens(tokens);
                let groups = segment::segment_runs(&runs, &self.settings);
                timing::resolve_timed(groups, &self.settings)
            }
            TranscriptInput::Plain(text) => {
                let runs = normalize::normalize_plain_text(&text);
                let groups = segment::segment_runs(&runs, &self.settings);
                timing::resolve_estimated(groups, &self.settings, start_offset_ms)
            }
        };

        SubtitleDocument::from_cues(cues)
    }
}
