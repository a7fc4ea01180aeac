//! Pause-based sentence segmentation.
//!
//! The fine-grained analogue of the chunk splitter: word timestamps
//! instead of audio candidates, seconds instead of minutes.
//!
//! ```text
//! tokens ──► boundaries (pause / punctuation) ──► token ranges ──► clips
//!                 │ fewer than two?                                  │
//!                 └──► synthesized every target_clip_sec             ▼
//!                                                   partition of [0, total]
//! ```

mod boundaries;
mod grouping;

pub use boundaries::{find_sentence_boundaries, synthesize_boundaries};
pub use grouping::{group_into_ranges, TokenRange};

use serde::Serialize;
use tracing::{debug, warn};
use vcut_models::{Clip, Segment, TimedToken};

use crate::config::SentenceConfig;
use crate::error::{TimelineError, TimelineResult};
use crate::interval::TIME_EPSILON;
use crate::metrics;
use crate::transcript::validate_tokens;

/// Result of sentence segmentation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentencePlan {
    /// Token indices that start a sentence (detected or synthesized).
    pub boundaries: Vec<usize>,
    /// Clips in order; their segments partition `[0, total_duration]`.
    pub clips: Vec<Clip>,
    /// Boundaries were synthesized because the stream had no usable pauses.
    pub fallback_used: bool,
}

impl SentencePlan {
    /// The clips' partition segments.
    pub fn segments(&self) -> Vec<Segment> {
        self.clips.iter().map(|c| c.segment).collect()
    }
}

/// Split a token stream into sentence-aligned clips covering
/// `[0, total_duration]`.
///
/// Clip edges sit at the midpoint of the silence between neighbouring
/// clips; the first clip starts at 0 and the last ends at `total_duration`.
pub fn segment_sentences(
    tokens: &[TimedToken],
    total_duration: f64,
    config: &SentenceConfig,
) -> TimelineResult<SentencePlan> {
    config.validate()?;
    if !total_duration.is_finite() || total_duration < 0.0 {
        return Err(TimelineError::malformed(
            0,
            format!("total duration must be a non-negative number, got {total_duration}"),
        ));
    }
    validate_tokens(tokens)?;

    let Some(last) = tokens.last() else {
        return Ok(SentencePlan {
            boundaries: Vec::new(),
            clips: Vec::new(),
            fallback_used: false,
        });
    };
    if total_duration < last.end - TIME_EPSILON {
        return Err(TimelineError::malformed(
            tokens.len() - 1,
            format!(
                "token ends at {:.3}s past the {:.3}s timeline",
                last.end, total_duration
            ),
        ));
    }

    let mut boundaries = find_sentence_boundaries(tokens, config);
    let fallback_used = boundaries.len() <= 1;
    if fallback_used {
        warn!(
            tokens = tokens.len(),
            target_clip_sec = config.target_clip_sec,
            "No sentence boundaries found, synthesizing fixed-interval boundaries"
        );
        metrics::record_fallback("sentence");
        boundaries = synthesize_boundaries(tokens, config.target_clip_sec);
    }

    let ranges = group_into_ranges(tokens, &boundaries, config);
    let clips = build_clips(tokens, &ranges, total_duration);

    debug!(
        tokens = tokens.len(),
        boundaries = boundaries.len(),
        clips = clips.len(),
        fallback_used,
        "Sentence segmentation complete"
    );

    Ok(SentencePlan {
        boundaries,
        clips,
        fallback_used,
    })
}

fn build_clips(tokens: &[TimedToken], ranges: &[TokenRange], total_duration: f64) -> Vec<Clip> {
    let mut clips = Vec::with_capacity(ranges.len());
    let mut edge = 0.0_f64;

    for (i, &(first, last)) in ranges.iter().enumerate() {
        let end = match ranges.get(i + 1) {
            Some(&(next_first, _)) => (tokens[last].end + tokens[next_first].start) / 2.0,
            None => total_duration,
        };

        let text = tokens[first..=last]
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        clips.push(Clip {
            segment: Segment::new(i, edge, end),
            first_token: first,
            last_token: last,
            speech_start_sec: tokens[first].start,
            speech_end_sec: tokens[last].end,
            text,
            token_count: last - first + 1,
        });
        edge = end;
    }

    clips
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::with_computed_pauses;

    fn sentence(words: &[&str], start: f64) -> Vec<TimedToken> {
        words
            .iter()
            .enumerate()
            .map(|(i, w)| {
                let s = start + i as f64 * 0.5;
                TimedToken::new(*w, s, s + 0.4)
            })
            .collect()
    }

    #[test]
    fn test_clips_partition_timeline() {
        let mut raw = Vec::new();
        let mut start = 0.3;
        for _ in 0..6 {
            let words = ["this", "is", "one", "full", "sentence", "of", "speech", "here."];
            raw.extend(sentence(&words, start));
            start += 5.0;
        }
        let tokens = with_computed_pauses(&raw);
        let plan = segment_sentences(&tokens, 31.0, &SentenceConfig::default()).unwrap();

        assert!(!plan.fallback_used);
        assert_eq!(plan.clips[0].segment.start_sec, 0.0);
        assert_eq!(plan.clips.last().unwrap().segment.end_sec, 31.0);
        for pair in plan.clips.windows(2) {
            assert_eq!(pair[0].segment.end_sec, pair[1].segment.start_sec);
            assert_eq!(pair[0].last_token + 1, pair[1].first_token);
        }
        let total: usize = plan.clips.iter().map(|c| c.token_count).sum();
        assert_eq!(total, tokens.len());
    }

    #[test]
    fn test_clip_edges_at_silence_midpoint() {
        let mut raw = sentence(&["first", "part", "ends", "here."], 0.0);
        raw.extend(sentence(&["second", "part."], 12.0));
        let tokens = with_computed_pauses(&raw);
        let config = SentenceConfig::default().with_clip_bounds(0.5, 1.5, 15.0);

        let plan = segment_sentences(&tokens, 14.0, &config).unwrap();
        assert_eq!(plan.clips.len(), 2);
        // "here." ends at 1.9, "second" starts at 12.0
        assert!((plan.clips[0].segment.end_sec - 6.95).abs() < 1e-9);
        assert_eq!(plan.clips[0].text, "first part ends here.");
        assert_eq!(plan.clips[1].token_count, 2);
    }

    #[test]
    fn test_monotone_stream_uses_fallback() {
        let raw: Vec<_> = (0..60)
            .map(|i| TimedToken::new("la", i as f64 * 0.5, i as f64 * 0.5 + 0.45))
            .collect();
        let tokens = with_computed_pauses(&raw);
        let plan = segment_sentences(&tokens, 30.0, &SentenceConfig::default()).unwrap();

        assert!(plan.fallback_used);
        assert!(plan.boundaries.len() > 1);
        assert!(plan.clips.len() >= 2);
        for clip in &plan.clips {
            assert!(clip.speech_duration_sec() <= 15.0 + 1e-9);
        }
    }

    #[test]
    fn test_empty_stream() {
        let plan = segment_sentences(&[], 10.0, &SentenceConfig::default()).unwrap();
        assert!(plan.clips.is_empty());
        assert!(!plan.fallback_used);
    }

    #[test]
    fn test_non_finite_total_rejected() {
        let tokens = sentence(&["a"], 0.0);
        for total in [f64::NAN, f64::INFINITY] {
            assert!(matches!(
                segment_sentences(&tokens, total, &SentenceConfig::default()),
                Err(TimelineError::InputMalformed { index: 0, .. })
            ));
        }
    }

    #[test]
    fn test_tokens_past_total_rejected() {
        let tokens = sentence(&["too", "long"], 9.0);
        assert!(matches!(
            segment_sentences(&tokens, 9.5, &SentenceConfig::default()),
            Err(TimelineError::InputMalformed { index: 1, .. })
        ));
    }

    #[test]
    fn test_overlapping_tokens_rejected() {
        let tokens = vec![TimedToken::new("a", 0.0, 1.0), TimedToken::new("b", 0.5, 1.5)];
        assert!(segment_sentences(&tokens, 2.0, &SentenceConfig::default()).is_err());
    }
}
