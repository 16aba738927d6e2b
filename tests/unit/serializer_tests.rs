/*!
 * Tests for output format rendering
 */

#![allow(non_snake_case)]

use scrybe::app_config::OutputFormat;
use scrybe::serializer::{
    format_ass_timestamp, format_vtt_timestamp, parse_ass_timestamp, parse_vtt_timestamp,
    render_document, JsonCue,
};
use scrybe::subtitle::{Cue, SubtitleDocument};

fn sample_document() -> SubtitleDocument {
    SubtitleDocument::from_cues(vec![
        Cue::new(1, 1000, 3000, vec!["Hello world".to_string()]),
        Cue::new(2, 3200, 6000, vec!["Two lines".to_string(), "of text".to_string()]),
    ])
}

/// Test SRT rendering round trips through the SRT parser
#[test]
fn test_render_srt_shouldRoundTripThroughParser() {
    let doc = sample_document();
    let rendered = render_document(&doc, OutputFormat::Srt).unwrap();

    assert!(rendered.contains("1\n00:00:01,000 --> 00:00:03,000\nHello world"));
    assert!(rendered.contains("2\n00:00:03,200 --> 00:00:06,000\nTwo lines\nof text"));

    let parsed = SubtitleDocument::parse_srt_string(&rendered).unwrap();
    assert_eq!(parsed, doc);
}

/// Test VTT rendering uses the header and dot separator without indices
#[test]
fn test_render_vtt_shouldUseHeaderAndDotSeparator() {
    let rendered = render_document(&sample_document(), OutputFormat::Vtt).unwrap();

    assert!(rendered.starts_with("WEBVTT\n\n"));
    assert!(rendered.contains("00:00:01.000 --> 00:00:03.000\nHello world"));
    assert!(rendered.contains("00:00:03.200 --> 00:00:06.000\nTwo lines\nof text"));
    // No bare numeric cue identifiers
    assert!(!rendered.contains("\n1\n"));
}

/// Test ASS rendering emits the fixed header and dialogue events
#[test]
fn test_render_ass_shouldEmitHeaderAndDialogueLines() {
    let rendered = render_document(&sample_document(), OutputFormat::Ass).unwrap();

    assert!(rendered.starts_with("[Script Info]"));
    assert!(rendered.contains("[V4+ Styles]"));
    assert!(rendered.contains("[Events]"));
    assert!(rendered.contains("Dialogue: 0,0:00:01.00,0:00:03.00,Default,,0,0,0,,Hello world"));
    // Line breaks inside a cue become ASS soft breaks
    assert!(rendered.contains("Two lines\\Nof text"));
}

/// Test JSON rendering produces a flat array with float-second times
#[test]
fn test_render_json_shouldProduceFlatCueArray() {
    let rendered = render_document(&sample_document(), OutputFormat::Json).unwrap();
    let cues: Vec<JsonCue> = serde_json::from_str(&rendered).unwrap();

    assert_eq!(cues.len(), 2);
    assert_eq!(cues[0].index, 1);
    assert!((cues[0].start - 1.0).abs() < f64::EPSILON);
    assert!((cues[0].end - 3.0).abs() < f64::EPSILON);
    assert_eq!(cues[0].text, "Hello world");
    assert_eq!(cues[1].text, "Two lines\nof text");
}

/// Test plain text rendering drops all timing
#[test]
fn test_render_txt_shouldEmitLinesOnly() {
    let rendered = render_document(&sample_document(), OutputFormat::Txt).unwrap();

    assert_eq!(rendered, "Hello world\nTwo lines\nof text");
    assert!(!rendered.contains("-->"));
}

/// Test empty documents render to empty or header-only output
#[test]
fn test_render_document_withEmptyDocument_shouldNotFail() {
    let doc = SubtitleDocument::new();

    assert_eq!(render_document(&doc, OutputFormat::Srt).unwrap(), "");
    assert_eq!(render_document(&doc, OutputFormat::Vtt).unwrap(), "WEBVTT\n\n");
    assert_eq!(render_document(&doc, OutputFormat::Json).unwrap(), "[]");
    assert_eq!(render_document(&doc, OutputFormat::Txt).unwrap(), "");
}

/// Test VTT timestamp round trip
#[test]
fn test_vtt_timestamp_round_trip_shouldPreserveMilliseconds() {
    let formatted = format_vtt_timestamp(5025678);
    assert_eq!(formatted, "01:23:45.678");
    assert_eq!(parse_vtt_timestamp(&formatted).unwrap(), 5025678);
    assert!(parse_vtt_timestamp("1:2:3").is_err());
}

/// Test ASS timestamps truncate to centiseconds
#[test]
fn test_ass_timestamp_shouldTruncateToCentiseconds() {
    assert_eq!(format_ass_timestamp(1236), "0:00:01.23");
    assert_eq!(format_ass_timestamp(5025678), "1:23:45.67");
    assert_eq!(parse_ass_timestamp("0:00:01.23").unwrap(), 1230);
    assert!(parse_ass_timestamp("0:00:01").is_err());
}
