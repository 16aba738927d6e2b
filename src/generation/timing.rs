use log::warn;

use crate::app_config::{secs_to_ms, SubtitleSettings};
use crate::generation::segment::LineGroup;
use crate::subtitle::{Cue, TokenTiming};

// @module: Cue timing resolution for timed and estimated modes

/// Reading-time estimate for a stretch of text, unclamped.
///
/// The larger of the CPS-based and WPM-based estimates wins, so a cue is
/// never shorter than either a comfortable reading speed or the assumed
/// speaking rate would demand.
pub fn estimate_duration_ms(char_count: usize, word_count: usize, settings: &SubtitleSettings) -> u64 {
    let by_cps = char_count as f64 / settings.max_cps;
    let by_wpm = (word_count as f64 / settings.words_per_minute as f64) * 60.0;
    secs_to_ms(by_cps.max(by_wpm))
}

/// Assign timing to groups whose tokens carry recognition timestamps.
///
/// Each cue starts where its first token starts; the start is never moved
/// earlier. The raw end is clamped into `[min_duration, max_duration]`,
/// except that a minimum-duration extension stops at the next cue's start
/// minus the gap rather than creating an overlap. A cue over the CPS ceiling
/// is extended toward `max_duration` (and the same next-cue slack); if the
/// ceiling still cannot be met the violation is accepted and logged.
pub fn resolve_timed(groups: Vec<LineGroup>, settings: &SubtitleSettings) -> Vec<Cue> {
    let min_ms = settings.min_duration_ms();
    let max_ms = settings.max_duration_ms();
    let gap_ms = settings.gap_ms();

    let spans: Vec<Option<TokenTiming>> = groups.iter().map(|g| g.timing_span()).collect();
    let mut cues = Vec::with_capacity(groups.len());

    for (i, group) in groups.into_iter().enumerate() {
        let Some(span) = spans[i] else {
            warn!("Dropping group without source timestamps in timed mode");
            continue;
        };

        let start_ms = span.start_ms;
        let raw_end_ms = span.end_ms.max(start_ms + 1);
        let mut end_ms = raw_end_ms;

        // The next cue's source start bounds how far this cue may grow
        let slack_end_ms = spans.get(i + 1)
            .and_then(|s| *s)
            .map(|next| next.start_ms.saturating_sub(gap_ms));

        // Too short: extend up to min_duration, stopping at the slack bound;
        // a raw span already past the bound is kept as-is
        if end_ms - start_ms < min_ms {
            let mut extended = start_ms + min_ms;
            if let Some(bound) = slack_end_ms {
                extended = extended.min(bound);
            }
            end_ms = end_ms.max(extended);
        }

        // Too long: truncate, text was already sized by the segmenter
        if end_ms - start_ms > max_ms {
            end_ms = start_ms + max_ms;
        }

        // Reading speed over the ceiling: extend toward max_duration
        let char_count = group.char_count();
        let cps = char_count as f64 / ((end_ms - start_ms) as f64 / 1000.0);
        if cps > settings.max_cps {
            let needed_ms = ((char_count as f64 / settings.max_cps) * 1000.0).ceil() as u64;
            let mut target = start_ms + needed_ms.min(max_ms);
            if let Some(bound) = slack_end_ms {
                target = target.min(bound.max(end_ms));
            }
            end_ms = end_ms.max(target);

            let final_cps = char_count as f64 / ((end_ms - start_ms) as f64 / 1000.0);
            if final_cps > settings.max_cps {
                warn!(
                    "Cue {} stays at {:.1} cps (ceiling {:.1}): {} chars do not fit the available time",
                    i + 1, final_cps, settings.max_cps, char_count
                );
            }
        }

        cues.push(Cue::new(i + 1, start_ms, end_ms, group.text_lines()));
    }

    cues
}

/// Lay out groups on a synthetic timeline starting at `start_offset_ms`.
///
/// Durations come from the reading-time estimate clamped into
/// `[min_duration, max_duration]`; consecutive cues are separated by exactly
/// the configured gap, so the timeline is monotonic and overlap-free by
/// construction.
pub fn resolve_estimated(groups: Vec<LineGroup>, settings: &SubtitleSettings, start_offset_ms: u64) -> Vec<Cue> {
    let min_ms = settings.min_duration_ms();
    let max_ms = settings.max_duration_ms();
    let gap_ms = settings.gap_ms();

    let mut cues = Vec::with_capacity(groups.len());
    let mut cursor_ms = start_offset_ms;

    for (i, group) in groups.into_iter().enumerate() {
        let char_count = group.char_count();
        let duration_ms = estimate_duration_ms(char_count, group.token_count(), settings)
            .clamp(min_ms, max_ms);

        let cps = char_count as f64 / (duration_ms as f64 / 1000.0);
        if cps > settings.max_cps {
            warn!(
                "Cue {} stays at {:.1} cps (ceiling {:.1}): {} chars do not fit the available time",
                i + 1, cps, settings.max_cps, char_count
            );
        }

        cues.push(Cue::new(i + 1, cursor_ms, cursor_ms + duration_ms, group.text_lines()));
        cursor_ms += duration_ms + gap_ms;
    }

    cues
}
