//! Sentence boundary detection from pauses and punctuation.

use vcut_models::TimedToken;

use crate::config::SentenceConfig;

/// Indices of tokens that start a sentence. Index 0 always does.
///
/// Token `i` starts a sentence when its pause reaches `min_pause_ms`, or
/// when the previous token ends a sentence and the pause reaches
/// `punctuation_pause_ms`.
pub fn find_sentence_boundaries(tokens: &[TimedToken], config: &SentenceConfig) -> Vec<usize> {
    if tokens.is_empty() {
        return Vec::new();
    }

    let mut boundaries = vec![0];

    for (i, pair) in tokens.windows(2).enumerate() {
        let (prev, token) = (&pair[0], &pair[1]);
        let pause = token.pause_before_ms;

        if pause >= config.min_pause_ms
            || (prev.ends_sentence() && pause >= config.punctuation_pause_ms)
        {
            boundaries.push(i + 1);
        }
    }

    boundaries
}

/// Artificial boundaries every `target_sec` of speech.
///
/// Used when a monotone stream has no usable pauses, so grouping can
/// still proceed.
pub fn synthesize_boundaries(tokens: &[TimedToken], target_sec: f64) -> Vec<usize> {
    let Some(first) = tokens.first() else {
        return Vec::new();
    };

    let mut boundaries = vec![0];
    let mut anchor = first.start;

    for (i, token) in tokens.iter().enumerate().skip(1) {
        if token.start - anchor >= target_sec {
            boundaries.push(i);
            anchor = token.start;
        }
    }

    boundaries
}
