use std::fmt;
use regex::Regex;
use once_cell::sync::Lazy;
use anyhow::{Result, Context, anyhow};
use log::warn;
use serde::{Serialize, Deserialize};

// @module: Subtitle data model and SRT round-trip parsing

// @const: SRT timestamp regex
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{2}):(\d{2}):(\d{2}),(\d{3}) --> (\d{2}):(\d{2}):(\d{2}),(\d{3})").unwrap()
});

/// Timing attached to a recognized word, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenTiming {
    /// Start time in ms
    pub start_ms: u64,
    /// End time in ms
    pub end_ms: u64,
}

impl TokenTiming {
    /// Create a timing span. The end is clamped up to the start so that
    /// `end_ms >= start_ms` always holds.
    pub fn new(start_ms: u64, end_ms: u64) -> Self {
        TokenTiming {
            start_ms,
            end_ms: end_ms.max(start_ms),
        }
    }
}

/// A minimal text unit: one word, optionally carrying recognition timestamps.
///
/// Timing is present for every token in timed mode (real speech output) and
/// absent for every token in estimated mode (typed text). The two modes never
/// mix inside one document.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// Word text, punctuation attached
    pub text: String,
    /// Recognition timestamps, when the word came from real speech
    pub timing: Option<TokenTiming>,
}

impl Token {
    /// A token without timing (estimated mode)
    pub fn plain(text: impl Into<String>) -> Self {
        Token { text: text.into(), timing: None }
    }

    /// A token with recognition timestamps (timed mode)
    pub fn timed(text: impl Into<String>, start_ms: u64, end_ms: u64) -> Self {
        Token {
            text: text.into(),
            timing: Some(TokenTiming::new(start_ms, end_ms)),
        }
    }

    /// Display width of the token in characters
    pub fn width(&self) -> usize {
        self.text.chars().count()
    }
}

// @struct: Single subtitle cue
#[derive(Debug, Clone, PartialEq)]
pub struct Cue {
    // @field: 1-based sequence number, unique within a document
    pub index: usize,

    // @field: Start time in ms
    pub start_ms: u64,

    // @field: End time in ms
    pub end_ms: u64,

    // @field: Displayed lines, top to bottom
    pub lines: Vec<String>,
}

impl Cue {
    /// Creates a new cue - used by tests and external consumers
    #[allow(dead_code)]
    pub fn new(index: usize, start_ms: u64, end_ms: u64, lines: Vec<String>) -> Self {
        Cue { index, start_ms, end_ms, lines }
    }

    // @creates: Validated cue
    // @validates: Time range and non-empty text
    pub fn new_validated(index: usize, start_ms: u64, end_ms: u64, lines: Vec<String>) -> Result<Self> {
        if end_ms <= start_ms {
            return Err(anyhow!(
                "Invalid time range: end time {} <= start time {}",
                end_ms, start_ms
            ));
        }

        let lines: Vec<String> = lines.into_iter()
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .collect();
        if lines.is_empty() {
            return Err(anyhow!("Empty cue text for entry {}", index));
        }

        Ok(Cue { index, start_ms, end_ms, lines })
    }

    /// Cue text with lines joined by newlines, as displayed
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Character count the reading-speed cap is measured against:
    /// the lines joined by a single space.
    pub fn char_count(&self) -> usize {
        let widths: usize = self.lines.iter().map(|l| l.chars().count()).sum();
        widths + self.lines.len().saturating_sub(1)
    }

    /// Displayed duration in milliseconds
    pub fn duration_ms(&self) -> u64 {
        self.end_ms.saturating_sub(self.start_ms)
    }

    /// Reading speed of this cue in characters per second
    pub fn chars_per_second(&self) -> f64 {
        let duration = self.duration_ms();
        if duration == 0 {
            return f64::INFINITY;
        }
        self.char_count() as f64 / (duration as f64 / 1000.0)
    }

    /// Convert start time to formatted SRT timestamp
    pub fn format_start_time(&self) -> String {
        format_timestamp(self.start_ms)
    }

    /// Convert end time to formatted SRT timestamp
    pub fn format_end_time(&self) -> String {
        format_timestamp(self.end_ms)
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.index)?;
        writeln!(f, "{} --> {}", self.format_start_time(), self.format_end_time())?;
        writeln!(f, "{}", self.text())?;
        writeln!(f)
    }
}

/// Format a timestamp in milliseconds to SRT format (HH:MM:SS,mmm)
pub fn format_timestamp(ms: u64) -> String {
    let hours = ms / 3_600_000;
    let minutes = (ms % 3_600_000) / 60_000;
    let seconds = (ms % 60_000) / 1_000;
    let millis = ms % 1_000;

    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
}

/// Parse an SRT timestamp (HH:MM:SS,mmm) to milliseconds
pub fn parse_timestamp(timestamp: &str) -> Result<u64> {
    let parts: Vec<&str> = timestamp.split(&[':', ',', '.'][..]).collect();

    if parts.len() != 4 {
        return Err(anyhow!("Invalid timestamp format: {}", timestamp));
    }

    let hours: u64 = parts[0].trim().parse().context("Failed to parse hours")?;
    let minutes: u64 = parts[1].parse().context("Failed to parse minutes")?;
    let seconds: u64 = parts[2].parse().context("Failed to parse seconds")?;
    let millis: u64 = parts[3].parse().context("Failed to parse milliseconds")?;

    if minutes >= 60 || seconds >= 60 || millis >= 1000 {
        return Err(anyhow!("Invalid time components in timestamp: {}", timestamp));
    }

    Ok(hours * 3_600_000 + minutes * 60_000 + seconds * 1_000 + millis)
}

/// An ordered sequence of cues forming one subtitle document.
///
/// Start times increase monotonically; cues target a configured gap of
/// silence between them but unavoidable overlap from source timestamps is
/// tolerated rather than rejected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubtitleDocument {
    /// Ordered cues, 1-based sequential indices
    pub cues: Vec<Cue>,
}

impl SubtitleDocument {
    /// Create an empty document
    pub fn new() -> Self {
        SubtitleDocument { cues: Vec::new() }
    }

    /// Build a document from cues, renumbering them sequentially
    pub fn from_cues(cues: Vec<Cue>) -> Self {
        let mut doc = SubtitleDocument { cues };
        doc.renumber();
        doc
    }

    /// Whether the document has no cues
    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    /// Number of cues
    pub fn len(&self) -> usize {
        self.cues.len()
    }

    /// End time of the last cue in milliseconds, 0 for an empty document
    pub fn total_duration_ms(&self) -> u64 {
        self.cues.last().map(|c| c.end_ms).unwrap_or(0)
    }

    /// Renumber cues to ensure sequential 1-based order
    pub fn renumber(&mut self) {
        for (i, cue) in self.cues.iter_mut().enumerate() {
            cue.index = i + 1;
        }
    }

    /// Parse SRT format string into a subtitle document
    pub fn parse_srt_string(content: &str) -> Result<Self> {
        let mut cues = Vec::new();

        // State variables for parsing
        let mut current_index: Option<usize> = None;
        let mut current_start_ms: Option<u64> = None;
        let mut current_end_ms: Option<u64> = None;
        let mut current_text = String::new();
        let mut line_count = 0;

        let mut add_current_cue = |index: usize, start_ms: u64, end_ms: u64, text: &str| {
            let lines: Vec<String> = text.lines().map(|l| l.to_string()).collect();
            match Cue::new_validated(index, start_ms, end_ms, lines) {
                Ok(cue) => cues.push(cue),
                Err(e) => warn!("Skipping invalid subtitle cue {}: {}", index, e),
            }
        };

        for line in content.lines() {
            line_count += 1;
            let trimmed = line.trim();

            // An empty line finalizes the cue being accumulated
            if trimmed.is_empty() {
                if let (Some(index), Some(start_ms), Some(end_ms)) = (current_index, current_start_ms, current_end_ms) {
                    if !current_text.is_empty() {
                        add_current_cue(index, start_ms, end_ms, &current_text);

                        current_index = None;
                        current_start_ms = None;
                        current_end_ms = None;
                        current_text.clear();
                    }
                }
                continue;
            }

            // Try to parse as sequence number (only when starting a new cue)
            if current_index.is_none() && current_text.is_empty() {
                if let Ok(num) = trimmed.parse::<usize>() {
                    current_index = Some(num);
                    continue;
                }
            }

            // Try to parse as timestamp
            if current_index.is_some() && current_start_ms.is_none() && current_end_ms.is_none() {
                if let Some(caps) = TIMESTAMP_REGEX.captures(trimmed) {
                    match (capture_to_ms(&caps, 1), capture_to_ms(&caps, 5)) {
                        (Ok(start_ms), Ok(end_ms)) => {
                            current_start_ms = Some(start_ms);
                            current_end_ms = Some(end_ms);
                            continue;
                        },
                        _ => {
                            warn!("Invalid timestamp format at line {}: {}", line_count, trimmed);
                        }
                    }
                }
            }

            // With index and timestamps in hand, this must be cue text
            if current_index.is_some() && current_start_ms.is_some() && current_end_ms.is_some() {
                if !current_text.is_empty() {
                    current_text.push('\n');
                }
                current_text.push_str(trimmed);
            } else {
                warn!("Unexpected text at line {} before sequence number or timestamp: {}", line_count, trimmed);
            }
        }

        // Add the last cue if there is one
        if let (Some(index), Some(start_ms), Some(end_ms)) = (current_index, current_start_ms, current_end_ms) {
            if !current_text.is_empty() {
                add_current_cue(index, start_ms, end_ms, &current_text);
            }
        }

        if cues.is_empty() {
            return Err(anyhow!("No valid subtitle cues were found in the SRT content"));
        }

        // Sort by start time to ensure correct order
        cues.sort_by_key(|cue| cue.start_ms);

        // Check for overlapping cues
        let mut overlap_count = 0;
        for i in 0..cues.len().saturating_sub(1) {
            if cues[i].end_ms > cues[i + 1].start_ms {
                overlap_count += 1;
            }
        }
        if overlap_count > 0 {
            warn!("Found {} overlapping subtitle cues", overlap_count);
        }

        Ok(SubtitleDocument::from_cues(cues))
    }
}

fn capture_to_ms(caps: &regex::Captures, start_idx: usize) -> Result<u64> {
    let hours: u64 = caps.get(start_idx)
        .map_or(0, |m| m.as_str().parse().unwrap_or(0));
    let minutes: u64 = caps.get(start_idx + 1)
        .map_or(0, |m| m.as_str().parse().unwrap_or(0));
    let seconds: u64 = caps.get(start_idx + 2)
        .map_or(0, |m| m.as_str().parse().unwrap_or(0));
    let millis: u64 = caps.get(start_idx + 3)
        .map_or(0, |m| m.as_str().parse().unwrap_or(0));

    Ok((hours * 3600 + minutes * 60 + seconds) * 1000 + millis)
}

impl fmt::Display for SubtitleDocument {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Subtitle Document")?;
        writeln!(f, "Cues: {}", self.cues.len())?;
        writeln!(f, "Duration: {}", format_timestamp(self.total_duration_ms()))?;
        Ok(())
    }
}

/// One transcription segment as returned by the recognition engine's JSON
/// output: segment-level timestamps around a run of words.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSegment {
    /// 1-based segment id
    #[serde(default)]
    pub id: usize,
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds
    pub end: f64,
    /// Recognized text
    pub text: String,
}
