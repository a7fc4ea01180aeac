//! Grouping tokens into duration-bounded clips.

use tracing::trace;
use vcut_models::TimedToken;

use crate::config::SentenceConfig;

/// Inclusive token range `(first, last)` of one clip.
pub type TokenRange = (usize, usize);

/// Walk the stream and cut it into clips that prefer sentence boundaries.
///
/// A clip grows token by token while its span stays within
/// `max_clip_sec`. Once it reaches `target_clip_sec` it stops at the next
/// boundary if that is the following token, or extends to a boundary up
/// to `lookahead_tokens` ahead when that still fits in `max_clip_sec`.
/// A lone token longer than `max_clip_sec` becomes its own clip.
///
/// The ranges cover every token exactly once, in order.
pub fn group_into_ranges(
    tokens: &[TimedToken],
    boundaries: &[usize],
    config: &SentenceConfig,
) -> Vec<TokenRange> {
    let n = tokens.len();
    let mut ranges = Vec::new();
    let mut current = 0;

    while current < n {
        let start_idx = current;
        let start_sec = tokens[start_idx].start;
        let mut end_idx = start_idx;

        for idx in start_idx + 1..n {
            let duration = tokens[idx].end - start_sec;
            if duration > config.max_clip_sec {
                break;
            }
            end_idx = idx;

            if duration >= config.target_clip_sec {
                let next = idx + 1;
                if next >= n || boundaries.binary_search(&next).is_ok() {
                    break;
                }
                let upcoming = boundaries.partition_point(|&b| b <= idx);
                if let Some(&b) = boundaries.get(upcoming) {
                    if b <= idx + config.lookahead_tokens
                        && tokens[b - 1].end - start_sec <= config.max_clip_sec
                    {
                        end_idx = b - 1;
                    }
                }
                break;
            }
        }

        trace!(first = start_idx, last = end_idx, "Clip range");
        ranges.push((start_idx, end_idx));
        current = end_idx + 1;
    }

    merge_short_tail(tokens, &mut ranges, config);
    ranges
}

/// Fold a final clip shorter than `min_clip_sec` into its predecessor when
/// the combined span still fits in `max_clip_sec`.
fn merge_short_tail(tokens: &[TimedToken], ranges: &mut Vec<TokenRange>, config: &SentenceConfig) {
    if ranges.len() < 2 {
        return;
    }

    let (tail_first, tail_last) = ranges[ranges.len() - 1];
    let (prev_first, _) = ranges[ranges.len() - 2];

    let tail_span = tokens[tail_last].end - tokens[tail_first].start;
    let merged_span = tokens[tail_last].end - tokens[prev_first].start;

    if tail_span < config.min_clip_sec && merged_span <= config.max_clip_sec {
        ranges.pop();
        if let Some(prev) = ranges.last_mut() {
            prev.1 = tail_last;
        }
    }
}
