use log::debug;

use crate::app_config::SubtitleSettings;
use crate::generation::normalize::TokenRun;
use crate::generation::timing::estimate_duration_ms;
use crate::subtitle::{Token, TokenTiming};

// @module: Greedy cue segmentation with auto-split and merge passes

/// Tokens grouped into the lines of one future cue.
#[derive(Debug, Clone, Default)]
pub struct LineGroup {
    /// Lines of the cue, each an ordered token list
    pub lines: Vec<Vec<Token>>,
}

impl LineGroup {
    /// Rendered lines, tokens joined by single spaces
    pub fn text_lines(&self) -> Vec<String> {
        self.lines.iter()
            .map(|line| {
                line.iter()
                    .map(|t| t.text.as_str())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect()
    }

    /// Character count of the whole group, lines joined by a single space
    pub fn char_count(&self) -> usize {
        let token_count = self.token_count();
        let widths: usize = self.lines.iter()
            .flat_map(|line| line.iter())
            .map(|t| t.width())
            .sum();
        widths + token_count.saturating_sub(1)
    }

    /// Total number of tokens in the group
    pub fn token_count(&self) -> usize {
        self.lines.iter().map(|line| line.len()).sum()
    }

    /// Whether every token carries recognition timestamps
    pub fn is_timed(&self) -> bool {
        self.token_count() > 0
            && self.lines.iter().flat_map(|line| line.iter()).all(|t| t.timing.is_some())
    }

    /// Source time span of the group, when it is fully timed
    pub fn timing_span(&self) -> Option<TokenTiming> {
        if !self.is_timed() {
            return None;
        }
        let first = self.lines.first()?.first()?.timing?;
        let last = self.lines.last()?.last()?.timing?;
        Some(TokenTiming::new(first.start_ms, last.end_ms))
    }

    /// All tokens of the group in display order
    pub fn into_tokens(self) -> Vec<Token> {
        self.lines.into_iter().flatten().collect()
    }
}

/// Segment token runs into line groups honoring the settings.
///
/// Two explicit passes per run: greedy word wrap (closing groups early at
/// sentence boundaries when `auto_split` is on), then an optional merge of
/// adjacent short groups. Runs are hard breaks; neither pass crosses them.
pub fn segment_runs(runs: &[TokenRun], settings: &SubtitleSettings) -> Vec<LineGroup> {
    let mut groups = Vec::new();

    for run in runs {
        let mut run_groups = wrap_tokens(&run.tokens, settings, settings.auto_split);
        if settings.merge_short_lines {
            run_groups = merge_short_groups(run_groups, settings);
        }
        groups.append(&mut run_groups);
    }

    groups
}

/// Greedily wrap a token sequence into line groups.
///
/// A token that does not fit the current line starts a new one; a line that
/// does not fit the current group starts a new group. A single token wider
/// than `max_chars_per_line` occupies its own line unsplit; mid-word breaks
/// are never invented.
pub fn wrap_tokens(tokens: &[Token], settings: &SubtitleSettings, auto_split: bool) -> Vec<LineGroup> {
    let max_chars = settings.max_chars_per_line;
    let max_lines = settings.max_lines;

    let mut groups: Vec<LineGroup> = Vec::new();
    let mut group_lines: Vec<Vec<Token>> = Vec::new();
    let mut line: Vec<Token> = Vec::new();
    let mut line_width = 0usize;

    for (i, token) in tokens.iter().enumerate() {
        let width = token.width();

        // An empty line accepts any token, even one wider than the limit
        let fits = line.is_empty() || line_width + 1 + width <= max_chars;

        if fits {
            if !line.is_empty() {
                line_width += 1;
            }
            line_width += width;
            line.push(token.clone());
            if width > max_chars {
                debug!("Token '{}' is wider than the {}-char line limit, keeping it unsplit", token.text, max_chars);
            }
        } else {
            group_lines.push(std::mem::take(&mut line));
            if group_lines.len() == max_lines {
                groups.push(LineGroup { lines: std::mem::take(&mut group_lines) });
            }
            line.push(token.clone());
            line_width = width;
        }

        // Sentence-ending punctuation closes the group early, taking priority
        // over filling remaining capacity
        if auto_split
            && ends_sentence(&token.text)
            && tokens.get(i + 1).is_none_or(|next| starts_sentence(&next.text))
        {
            group_lines.push(std::mem::take(&mut line));
            line_width = 0;
            groups.push(LineGroup { lines: std::mem::take(&mut group_lines) });
        }
    }

    if !line.is_empty() {
        group_lines.push(line);
    }
    if !group_lines.is_empty() {
        groups.push(LineGroup { lines: group_lines });
    }

    groups
}

/// Merge adjacent groups whose combined text still fits the cue budget.
///
/// A merge is rejected when the combined text cannot re-wrap into a single
/// group, or when the merged cue would exceed `max_duration` once timing is
/// resolved; rejected pairs remain separate.
fn merge_short_groups(groups: Vec<LineGroup>, settings: &SubtitleSettings) -> Vec<LineGroup> {
    let mut merged: Vec<LineGroup> = Vec::new();

    for group in groups {
        if let Some(prev) = merged.last() {
            if let Some(combined) = try_merge(prev, &group, settings) {
                debug!("Merged two short groups into one {}-char cue", combined.char_count());
                merged.pop();
                merged.push(combined);
                continue;
            }
        }
        merged.push(group);
    }

    merged
}

/// Attempt to merge two adjacent groups, returning the merged group on success
fn try_merge(first: &LineGroup, second: &LineGroup, settings: &SubtitleSettings) -> Option<LineGroup> {
    let combined_chars = first.char_count() + 1 + second.char_count();
    if combined_chars > settings.max_chars_per_cue() {
        return None;
    }

    if !merged_duration_fits(first, second, settings) {
        return None;
    }

    let mut tokens = first.clone().into_tokens();
    tokens.extend(second.clone().into_tokens());

    // Re-wrap without auto-split: the merge pass deliberately joins whole
    // sentences that the first pass separated
    let rewrapped = wrap_tokens(&tokens, settings, false);
    match rewrapped.len() {
        1 => rewrapped.into_iter().next(),
        _ => None,
    }
}

/// Check that the merged cue would not break the max-duration constraint
/// once timing is resolved
fn merged_duration_fits(first: &LineGroup, second: &LineGroup, settings: &SubtitleSettings) -> bool {
    let max_ms = settings.max_duration_ms();

    match (first.timing_span(), second.timing_span()) {
        (Some(a), Some(b)) => {
            // Timed mode: the merged cue spans the source timestamps
            b.end_ms.saturating_sub(a.start_ms) <= max_ms
        }
        _ => {
            // Estimated mode: the unclamped reading-time estimate must fit
            let chars = first.char_count() + 1 + second.char_count();
            let words = first.token_count() + second.token_count();
            estimate_duration_ms(chars, words, settings) <= max_ms
        }
    }
}

/// Whether a token ends a sentence
fn ends_sentence(text: &str) -> bool {
    let trimmed = text.trim_end_matches(['"', '\'', ')', ']', '»', '”', '’']);
    trimmed.ends_with(['.', '!', '?', '…'])
}

/// Whether a token plausibly opens a new sentence
fn starts_sentence(text: &str) -> bool {
    let trimmed = text.trim_start_matches(['"', '\'', '(', '[', '«', '“', '‘']);
    trimmed.chars().next().is_some_and(|c| c.is_uppercase() || c.is_numeric())
}
