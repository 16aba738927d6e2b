/*!
 * Tests for input normalization into token runs
 */

#![allow(non_snake_case)]

use scrybe::generation::normalize::{
    normalize_plain_text, normalize_timed_tokens, tokens_from_segments,
};
use scrybe::subtitle::{EngineSegment, Token};

/// Test each input line becomes one run and whitespace collapses
#[test]
fn test_normalize_plain_text_withMultipleLines_shouldMakeOneRunPerLine() {
    let runs = normalize_plain_text("Hello   world\n\n  \nSecond line");

    assert_eq!(runs.len(), 2);
    let first: Vec<&str> = runs[0].tokens.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(first, vec!["Hello", "world"]);
    let second: Vec<&str> = runs[1].tokens.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(second, vec!["Second", "line"]);
}

/// Test empty or whitespace-only input yields no runs
#[test]
fn test_normalize_plain_text_withBlankInput_shouldYieldNoRuns() {
    assert!(normalize_plain_text("").is_empty());
    assert!(normalize_plain_text("   \n\t\n  ").is_empty());
}

/// Test plain tokens carry no timing
#[test]
fn test_normalize_plain_text_tokens_shouldBeUntimed() {
    let runs = normalize_plain_text("one two");
    assert!(runs[0].tokens.iter().all(|t| t.timing.is_none()));
}

/// Test timed normalization sorts by start and drops untimed strays
#[test]
fn test_normalize_timed_tokens_withUnsortedInput_shouldSortAndFilter() {
    let tokens = vec![
        Token::timed("world", 1000, 1500),
        Token::plain("stray"),
        Token::timed("Hello", 0, 800),
        Token::timed("  ", 2000, 2100),
    ];

    let runs = normalize_timed_tokens(tokens);
    assert_eq!(runs.len(), 1);
    let texts: Vec<&str> = runs[0].tokens.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, vec!["Hello", "world"]);
}

/// Test timed normalization of nothing usable yields no runs
#[test]
fn test_normalize_timed_tokens_withNoTimedTokens_shouldYieldNoRuns() {
    assert!(normalize_timed_tokens(vec![]).is_empty());
    assert!(normalize_timed_tokens(vec![Token::plain("word")]).is_empty());
}

/// Test word timing interpolation distributes the span by character weight
#[test]
fn test_tokens_from_segments_withEqualWords_shouldSplitSpanEvenly() {
    let segments = vec![EngineSegment { id: 1, start: 0.0, end: 2.0, text: "ab cd".to_string() }];

    let tokens = tokens_from_segments(&segments);
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].timing.unwrap().start_ms, 0);
    assert_eq!(tokens[0].timing.unwrap().end_ms, 1000);
    assert_eq!(tokens[1].timing.unwrap().start_ms, 1000);
    assert_eq!(tokens[1].timing.unwrap().end_ms, 2000);
}

/// Test longer words receive a larger share of the span
#[test]
fn test_tokens_from_segments_withUnevenWords_shouldWeightByLength() {
    let segments = vec![EngineSegment { id: 1, start: 0.0, end: 4.0, text: "a bcd".to_string() }];

    let tokens = tokens_from_segments(&segments);
    assert_eq!(tokens[0].timing.unwrap().end_ms, 1000);
    assert_eq!(tokens[1].timing.unwrap().start_ms, 1000);
    assert_eq!(tokens[1].timing.unwrap().end_ms, 4000);
}

/// Test the last word of each segment ends exactly on the segment end
#[test]
fn test_tokens_from_segments_lastWord_shouldEndOnSegmentBoundary() {
    let segments = vec![
        EngineSegment { id: 1, start: 0.5, end: 2.3, text: "uneven split here".to_string() },
        EngineSegment { id: 2, start: 2.9, end: 5.111, text: "next one".to_string() },
    ];

    let tokens = tokens_from_segments(&segments);
    assert_eq!(tokens[2].timing.unwrap().end_ms, 2300);
    assert_eq!(tokens[3].timing.unwrap().start_ms, 2900);
    assert_eq!(tokens.last().unwrap().timing.unwrap().end_ms, 5111);
}

/// Test empty segments are skipped
#[test]
fn test_tokens_from_segments_withEmptyText_shouldSkipSegment() {
    let segments = vec![
        EngineSegment { id: 1, start: 0.0, end: 1.0, text: "   ".to_string() },
        EngineSegment { id: 2, start: 1.0, end: 2.0, text: "word".to_string() },
    ];

    let tokens = tokens_from_segments(&segments);
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].text, "word");
}
