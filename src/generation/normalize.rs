use crate::app_config::secs_to_ms;
use crate::subtitle::{EngineSegment, Token};

// @module: Text normalization into token runs

/// A run of tokens that must stay together in one stretch of cues.
///
/// Runs come from hard breaks in the input: every newline in typed text
/// starts a new run, and the segmenter never merges cues across runs.
#[derive(Debug, Clone, Default)]
pub struct TokenRun {
    /// Ordered tokens of this run
    pub tokens: Vec<Token>,
}

impl TokenRun {
    /// Wrap a token list in a run
    pub fn new(tokens: Vec<Token>) -> Self {
        TokenRun { tokens }
    }
}

/// Normalize free-form typed text into token runs.
///
/// Each input line becomes one run; empty or whitespace-only lines are
/// dropped. Tokens are produced by whitespace splitting and carry no
/// timestamps.
pub fn normalize_plain_text(text: &str) -> Vec<TokenRun> {
    text.lines()
        .map(|line| {
            line.split_whitespace()
                .map(Token::plain)
                .collect::<Vec<_>>()
        })
        .filter(|tokens| !tokens.is_empty())
        .map(TokenRun::new)
        .collect()
}

/// Normalize recognized tokens into a single run in time order.
///
/// Recognition output has no hard breaks, so all timed tokens form one run.
/// Tokens without timing are dropped; a stray untimed word in otherwise
/// timed output has no place on the timeline.
pub fn normalize_timed_tokens(mut tokens: Vec<Token>) -> Vec<TokenRun> {
    tokens.retain(|t| t.timing.is_some() && !t.text.trim().is_empty());
    tokens.sort_by_key(|t| t.timing.map(|timing| timing.start_ms).unwrap_or(0));

    if tokens.is_empty() {
        Vec::new()
    } else {
        vec![TokenRun::new(tokens)]
    }
}

/// Expand engine segments into per-word timed tokens.
///
/// The engine reports one timestamp pair per segment. Word times are
/// interpolated across the segment's span proportionally to each word's
/// character weight, so long words get more of the span than short ones.
pub fn tokens_from_segments(segments: &[EngineSegment]) -> Vec<Token> {
    let mut tokens = Vec::new();

    for segment in segments {
        let words: Vec<&str> = segment.text.split_whitespace().collect();
        if words.is_empty() {
            continue;
        }

        let start_ms = secs_to_ms(segment.start);
        let end_ms = secs_to_ms(segment.end).max(start_ms);
        let span_ms = end_ms - start_ms;

        let total_weight: usize = words.iter().map(|w| w.chars().count()).sum();
        if total_weight == 0 {
            continue;
        }

        let mut cursor_ms = start_ms;
        let mut consumed_weight = 0usize;
        for word in &words {
            consumed_weight += word.chars().count();
            // Cumulative split keeps the last word's end exactly on the segment end
            let word_end_ms = start_ms
                + ((span_ms as f64) * (consumed_weight as f64) / (total_weight as f64)).round() as u64;
            tokens.push(Token::timed(*word, cursor_ms, word_end_ms));
            cursor_ms = word_end_ms;
        }
    }

    tokens
}
