use std::fmt::Write as _;
use anyhow::{Result, Context, anyhow};
use serde::{Serialize, Deserialize};

use crate::app_config::OutputFormat;
use crate::subtitle::SubtitleDocument;

// @module: Rendering a subtitle document into its output formats

// @const: ASS script header for plain dialogue lines
const ASS_HEADER: &str = r"[Script Info]
Title: scrybe
ScriptType: v4.00+
Collisions: Normal
PlayDepth: 0

[V4+ Styles]
Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding
Style: Default,Arial,48,&H00FFFFFF,&H000000FF,&H00000000,&H80000000,-1,0,0,0,100,100,0,0,1,2,1,2,20,20,20,1

[Events]
Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text
";

/// One cue in the JSON output format
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonCue {
    /// 1-based cue index
    pub index: usize,
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds
    pub end: f64,
    /// Cue text, lines joined by newlines
    pub text: String,
}

/// Render a document into the requested output format
pub fn render_document(document: &SubtitleDocument, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Srt => Ok(render_srt(document)),
        OutputFormat::Vtt => Ok(render_vtt(document)),
        OutputFormat::Ass => Ok(render_ass(document)),
        OutputFormat::Json => render_json(document),
        OutputFormat::Txt => Ok(render_txt(document)),
    }
}

/// Render as SubRip: numbered blocks, comma millisecond separator
pub fn render_srt(document: &SubtitleDocument) -> String {
    let mut out = String::new();
    for cue in &document.cues {
        // Cue's Display impl is the SRT block
        let _ = write!(out, "{}", cue);
    }
    out
}

/// Render as WebVTT: header line, dot millisecond separator, no indices
pub fn render_vtt(document: &SubtitleDocument) -> String {
    let mut out = String::from("WEBVTT\n\n");
    for cue in &document.cues {
        let _ = writeln!(
            out,
            "{} --> {}",
            format_vtt_timestamp(cue.start_ms),
            format_vtt_timestamp(cue.end_ms)
        );
        let _ = writeln!(out, "{}", cue.text());
        let _ = writeln!(out);
    }
    out
}

/// Render as ASS dialogue events under a fixed default style
pub fn render_ass(document: &SubtitleDocument) -> String {
    let mut out = String::from(ASS_HEADER);
    for cue in &document.cues {
        let text = cue.lines.join("\\N");
        let _ = writeln!(
            out,
            "Dialogue: 0,{},{},Default,,0,0,0,,{}",
            format_ass_timestamp(cue.start_ms),
            format_ass_timestamp(cue.end_ms),
            text
        );
    }
    out
}

/// Render as a JSON array of cue objects with float-second times
pub fn render_json(document: &SubtitleDocument) -> Result<String> {
    let cues: Vec<JsonCue> = document.cues.iter()
        .map(|cue| JsonCue {
            index: cue.index,
            start: cue.start_ms as f64 / 1000.0,
            end: cue.end_ms as f64 / 1000.0,
            text: cue.text(),
        })
        .collect();

    serde_json::to_string_pretty(&cues).context("Failed to serialize cues to JSON")
}

/// Render as plain text: cue lines only, no timing
pub fn render_txt(document: &SubtitleDocument) -> String {
    document.cues.iter()
        .map(|cue| cue.text())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a timestamp in milliseconds to VTT format (HH:MM:SS.mmm)
pub fn format_vtt_timestamp(ms: u64) -> String {
    let hours = ms / 3_600_000;
    let minutes = (ms % 3_600_000) / 60_000;
    let seconds = (ms % 60_000) / 1_000;
    let millis = ms % 1_000;

    format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, seconds, millis)
}

/// Parse a VTT timestamp (HH:MM:SS.mmm) to milliseconds
pub fn parse_vtt_timestamp(timestamp: &str) -> Result<u64> {
    let parts: Vec<&str> = timestamp.split(&[':', '.'][..]).collect();
    if parts.len() != 4 {
        return Err(anyhow!("Invalid VTT timestamp format: {}", timestamp));
    }

    let hours: u64 = parts[0].trim().parse().context("Failed to parse hours")?;
    let minutes: u64 = parts[1].parse().context("Failed to parse minutes")?;
    let seconds: u64 = parts[2].parse().context("Failed to parse seconds")?;
    let millis: u64 = parts[3].parse().context("Failed to parse milliseconds")?;

    if minutes >= 60 || seconds >= 60 || millis >= 1000 {
        return Err(anyhow!("Invalid time components in VTT timestamp: {}", timestamp));
    }

    Ok(hours * 3_600_000 + minutes * 60_000 + seconds * 1_000 + millis)
}

/// Format a timestamp in milliseconds to ASS format (H:MM:SS.cc, centiseconds)
pub fn format_ass_timestamp(ms: u64) -> String {
    let hours = ms / 3_600_000;
    let minutes = (ms % 3_600_000) / 60_000;
    let seconds = (ms % 60_000) / 1_000;
    let centis = (ms % 1_000) / 10;

    format!("{}:{:02}:{:02}.{:02}", hours, minutes, seconds, centis)
}

/// Parse an ASS timestamp (H:MM:SS.cc) to milliseconds, centisecond precision
pub fn parse_ass_timestamp(timestamp: &str) -> Result<u64> {
    let parts: Vec<&str> = timestamp.split(&[':', '.'][..]).collect();
    if parts.len() != 4 {
        return Err(anyhow!("Invalid ASS timestamp format: {}", timestamp));
    }

    let hours: u64 = parts[0].trim().parse().context("Failed to parse hours")?;
    let minutes: u64 = parts[1].parse().context("Failed to parse minutes")?;
    let seconds: u64 = parts[2].parse().context("Failed to parse seconds")?;
    let centis: u64 = parts[3].parse().context("Failed to parse centiseconds")?;

    if minutes >= 60 || seconds >= 60 || centis >= 100 {
        return Err(anyhow!("Invalid time components in ASS timestamp: {}", timestamp));
    }

    Ok(hours * 3_600_000 + minutes * 60_000 + seconds * 1_000 + centis * 10)
}
