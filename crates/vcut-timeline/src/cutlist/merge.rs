//! Cut enrichment and merging.

use serde::Serialize;
use tracing::warn;
use vcut_models::{CutInterval, CutSuggestion, TimedToken};

use crate::error::{TimelineError, TimelineResult};
use crate::interval::merge_sorted;

/// A cut that was skipped instead of applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedCut {
    /// First referenced token.
    pub start_idx: usize,
    /// Last referenced token (inclusive).
    pub end_idx: usize,
    /// The cut's stated reason.
    pub reason: String,
    /// Why it was skipped.
    pub message: String,
}

/// Check that `start_idx..=end_idx` addresses a stream of `token_count`.
pub fn check_cut_reference(start_idx: usize, end_idx: usize, token_count: usize) -> TimelineResult<()> {
    if start_idx >= token_count || end_idx >= token_count || start_idx > end_idx {
        return Err(TimelineError::InvalidCutReference {
            start_idx,
            end_idx,
            token_count,
        });
    }
    Ok(())
}

/// Attach timestamps to word-indexed suggestions.
///
/// A cut spans from its first token's start to its last token's end.
/// Suggestions with out-of-range indices are skipped with a warning and
/// returned alongside the valid cuts.
pub fn enrich_cuts(
    suggestions: &[CutSuggestion],
    tokens: &[TimedToken],
) -> (Vec<CutInterval>, Vec<SkippedCut>) {
    let mut cuts = Vec::with_capacity(suggestions.len());
    let mut skipped = Vec::new();

    for suggestion in suggestions {
        let (start_idx, end_idx) = (suggestion.start_word_idx, suggestion.end_word_idx);

        if let Err(e) = check_cut_reference(start_idx, end_idx, tokens.len()) {
            warn!(start_idx, end_idx, error = %e, "Skipping invalid cut");
            skipped.push(SkippedCut {
                start_idx,
                end_idx,
                reason: suggestion.reason.clone(),
                message: e.to_string(),
            });
            continue;
        }

        cuts.push(CutInterval {
            start_sec: tokens[start_idx].start,
            end_sec: tokens[end_idx].end,
            start_token_idx: start_idx,
            end_token_idx: end_idx,
            reason: suggestion.reason.clone(),
        });
    }

    (cuts, skipped)
}

/// Sort cuts by start and merge any that overlap or lie within `tolerance`.
///
/// The merged interval keeps the first cut's start, takes the furthest end
/// and last token, and joins reasons with `" + "`. Applying this to its
/// own output returns it unchanged.
pub fn merge_cuts(mut cuts: Vec<CutInterval>, tolerance: f64) -> Vec<CutInterval> {
    cuts.sort_by(|a, b| a.start_sec.total_cmp(&b.start_sec));

    merge_sorted(cuts, tolerance, |running, next| {
        running.end_sec = running.end_sec.max(next.end_sec);
        running.end_token_idx = running.end_token_idx.max(next.end_token_idx);
        running.reason = format!("{} + {}", running.reason, next.reason);
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> Vec<TimedToken> {
        (0..n)
            .map(|i| TimedToken::new(format!("w{i}"), i as f64, i as f64 + 1.0))
            .collect()
    }

    fn cut(start: f64, end: f64, reason: &str) -> CutInterval {
        CutInterval {
            start_sec: start,
            end_sec: end,
            start_token_idx: start as usize,
            end_token_idx: end as usize - 1,
            reason: reason.to_string(),
        }
    }

    #[test]
    fn test_enrich_uses_token_times() {
        let suggestions = [CutSuggestion {
            start_word_idx: 1,
            end_word_idx: 2,
            reason: "filler".to_string(),
            words: None,
        }];
        let (cuts, skipped) = enrich_cuts(&suggestions, &words(5));
        assert!(skipped.is_empty());
        assert_eq!(cuts[0].start_sec, 1.0);
        assert_eq!(cuts[0].end_sec, 3.0);
    }

    #[test]
    fn test_enrich_skips_out_of_range() {
        let suggestions = [
            CutSuggestion {
                start_word_idx: 3,
                end_word_idx: 9,
                reason: "retake".to_string(),
                words: None,
            },
            CutSuggestion {
                start_word_idx: 4,
                end_word_idx: 2,
                reason: "backwards".to_string(),
                words: None,
            },
            CutSuggestion {
                start_word_idx: 0,
                end_word_idx: 0,
                reason: "um".to_string(),
                words: None,
            },
        ];
        let (cuts, skipped) = enrich_cuts(&suggestions, &words(5));
        assert_eq!(cuts.len(), 1);
        assert_eq!(skipped.len(), 2);
        assert_eq!(skipped[0].reason, "retake");
        assert!(skipped[0].message.contains("5 tokens"));
    }

    #[test]
    fn test_merge_overlapping_and_adjacent() {
        let merged = merge_cuts(
            vec![cut(5.0, 6.0, "c"), cut(0.0, 2.0, "a"), cut(2.05, 3.0, "b")],
            0.1,
        );
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].start_sec, 0.0);
        assert_eq!(merged[0].end_sec, 3.0);
        assert_eq!(merged[0].end_token_idx, 2);
        assert_eq!(merged[0].reason, "a + b");
        assert_eq!(merged[1].reason, "c");
    }

    #[test]
    fn test_merge_keeps_outer_end_for_contained_cut() {
        let merged = merge_cuts(vec![cut(0.0, 10.0, "long"), cut(2.0, 3.0, "inner")], 0.1);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].end_sec, 10.0);
        assert_eq!(merged[0].end_token_idx, 9);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let once = merge_cuts(
            vec![cut(0.0, 2.0, "a"), cut(1.0, 4.0, "b"), cut(8.0, 9.0, "c")],
            0.1,
        );
        let twice = merge_cuts(once.clone(), 0.1);
        assert_eq!(once, twice);
    }
}
