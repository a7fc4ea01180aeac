//! Re-timing tokens onto a trimmed timeline.
//!
//! Kept intervals are laid back to back starting at 0. A token survives
//! only when it lies wholly inside one kept interval; tokens touching a
//! removed stretch are dropped, never truncated.

use serde::Serialize;
use tracing::debug;
use vcut_models::{TimeSpan, TimedToken};

use crate::error::TimelineResult;
use crate::interval::{validate_spans, OffsetMap, TIME_EPSILON};
use crate::metrics;
use crate::transcript::{pause_ms, validate_tokens};

/// Where a remapped token came from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TokenOrigin {
    /// Index in the original token stream.
    pub source_index: usize,
    /// Original start (seconds).
    pub original_start: f64,
    /// Original end (seconds).
    pub original_end: f64,
}

/// Remapped tokens plus what was lost.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RemapOutcome {
    /// Tokens on the trimmed timeline, with pauses recomputed.
    pub tokens: Vec<TimedToken>,
    /// Provenance of each entry in `tokens`.
    pub origins: Vec<TokenOrigin>,
    /// Tokens that were cut or straddled a cut boundary.
    pub dropped_tokens: usize,
    /// Sum of kept durations.
    pub trimmed_duration: f64,
}

/// Translate `tokens` onto the timeline left by `keeps`.
///
/// Both inputs must be chronological and non-overlapping; either being out
/// of order fails with `InputMalformed`. Runs in one merged pass over tokens
/// and keep intervals.
pub fn remap_tokens<S: TimeSpan>(tokens: &[TimedToken], keeps: &[S]) -> TimelineResult<RemapOutcome> {
    validate_tokens(tokens)?;
    validate_spans(keeps)?;

    let map = OffsetMap::new(keeps);
    let entries = map.entries();

    let mut outcome = RemapOutcome {
        tokens: Vec::with_capacity(tokens.len()),
        origins: Vec::with_capacity(tokens.len()),
        dropped_tokens: 0,
        trimmed_duration: map.trimmed_duration(),
    };
    let mut cursor = 0;

    for (source_index, token) in tokens.iter().enumerate() {
        while cursor < entries.len() && entries[cursor].keep.end_sec < token.end - TIME_EPSILON {
            cursor += 1;
        }

        let Some(entry) = entries.get(cursor) else {
            outcome.dropped_tokens += 1;
            continue;
        };
        let inside = token.start >= entry.keep.start_sec - TIME_EPSILON
            && token.end <= entry.keep.end_sec + TIME_EPSILON;
        if !inside {
            outcome.dropped_tokens += 1;
            continue;
        }

        let start = entry.translate(token.start);
        let end = entry.translate(token.end);
        let pause_before_ms = outcome
            .tokens
            .last()
            .map(|prev| pause_ms(prev.end, start))
            .unwrap_or(0);

        outcome.tokens.push(TimedToken {
            text: token.text.clone(),
            start,
            end,
            pause_before_ms,
        });
        outcome.origins.push(TokenOrigin {
            source_index,
            original_start: token.start,
            original_end: token.end,
        });
    }

    if outcome.dropped_tokens > 0 {
        metrics::record_tokens_dropped(outcome.dropped_tokens);
    }
    debug!(
        kept = outcome.tokens.len(),
        dropped = outcome.dropped_tokens,
        trimmed_duration = outcome.trimmed_duration,
        "Remapped tokens onto trimmed timeline"
    );

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TimelineError;
    use vcut_models::KeepInterval;

    fn unit_tokens(n: usize) -> Vec<TimedToken> {
        (0..n)
            .map(|i| TimedToken::new(format!("w{i}"), i as f64, i as f64 + 1.0))
            .collect()
    }

    #[test]
    fn test_cut_list_remap() {
        let keeps = [KeepInterval::new(0.0, 1.0), KeepInterval::new(3.0, 5.0)];
        let outcome = remap_tokens(&unit_tokens(5), &keeps).unwrap();

        let spans: Vec<_> = outcome.tokens.iter().map(|t| (t.start, t.end)).collect();
        assert_eq!(spans, vec![(0.0, 1.0), (1.0, 2.0), (2.0, 3.0)]);
        assert_eq!(outcome.dropped_tokens, 2);
        assert_eq!(outcome.trimmed_duration, 3.0);
        assert_eq!(outcome.origins[1].source_index, 3);
        assert_eq!(outcome.origins[1].original_start, 3.0);
    }

    #[test]
    fn test_straddling_token_dropped() {
        let tokens = [
            TimedToken::new("kept", 0.2, 0.8),
            TimedToken::new("straddle", 1.8, 2.4),
            TimedToken::new("after", 2.5, 2.9),
        ];
        let keeps = [KeepInterval::new(0.0, 2.0), KeepInterval::new(2.2, 3.0)];
        let outcome = remap_tokens(&tokens, &keeps).unwrap();

        let texts: Vec<_> = outcome.tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["kept", "after"]);
        assert!((outcome.tokens[1].start - 2.3).abs() < 1e-9);
        assert_eq!(outcome.tokens[1].pause_before_ms, 1500);
    }

    #[test]
    fn test_pauses_shrink_across_cut() {
        let tokens = [
            TimedToken::new("before", 0.0, 1.0),
            TimedToken::new("after", 9.0, 10.0).with_pause_before_ms(8000),
        ];
        let keeps = [KeepInterval::new(0.0, 1.2), KeepInterval::new(8.9, 10.0)];
        let outcome = remap_tokens(&tokens, &keeps).unwrap();
        assert_eq!(outcome.tokens[1].pause_before_ms, 300);
    }

    #[test]
    fn test_adjacent_segments_keep_every_token() {
        let segments = [(0.0, 1.0), (1.0, 2.0), (2.0, 5.0)];
        let outcome = remap_tokens(&unit_tokens(5), &segments).unwrap();
        assert_eq!(outcome.tokens.len(), 5);
        assert_eq!(outcome.dropped_tokens, 0);
        assert_eq!(outcome.tokens[4].end, 5.0);
    }

    #[test]
    fn test_no_keeps_drops_everything() {
        let outcome = remap_tokens::<KeepInterval>(&unit_tokens(3), &[]).unwrap();
        assert!(outcome.tokens.is_empty());
        assert_eq!(outcome.dropped_tokens, 3);
        assert_eq!(outcome.trimmed_duration, 0.0);
    }

    #[test]
    fn test_output_sorted_and_bounded() {
        let tokens: Vec<_> = (0..200)
            .map(|i| TimedToken::new("x", i as f64 * 0.5, i as f64 * 0.5 + 0.4))
            .collect();
        let keeps = [
            KeepInterval::new(0.0, 10.0),
            KeepInterval::new(20.0, 35.0),
            KeepInterval::new(60.0, 100.0),
        ];
        let outcome = remap_tokens(&tokens, &keeps).unwrap();
        for pair in outcome.tokens.windows(2) {
            assert!(pair[0].end <= pair[1].start + 1e-9);
        }
        let last = outcome.tokens.last().unwrap();
        assert!(last.end <= outcome.trimmed_duration + 1e-9);
    }

    #[test]
    fn test_unsorted_tokens_rejected() {
        let tokens = [
            TimedToken::new("late", 3.5, 4.0),
            TimedToken::new("early", 0.2, 0.5),
        ];
        let keeps = [KeepInterval::new(0.0, 1.0), KeepInterval::new(3.0, 5.0)];
        assert!(matches!(
            remap_tokens(&tokens, &keeps),
            Err(TimelineError::InputMalformed { index: 1, .. })
        ));
    }

    #[test]
    fn test_unsorted_keeps_rejected() {
        let tokens = [
            TimedToken::new("early", 0.2, 0.5),
            TimedToken::new("late", 3.5, 4.0),
        ];
        let keeps = [KeepInterval::new(3.0, 5.0), KeepInterval::new(0.0, 1.0)];
        assert!(matches!(
            remap_tokens(&tokens, &keeps),
            Err(TimelineError::InputMalformed { index: 1, .. })
        ));

        let overlapping = [KeepInterval::new(0.0, 4.0), KeepInterval::new(3.0, 5.0)];
        assert!(remap_tokens(&tokens, &overlapping).is_err());
    }
}
