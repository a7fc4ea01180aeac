//! Token stream utilities: validation, pauses, indexing and alignment.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;
use vcut_models::{seconds_to_ms, TimedToken};

use crate::error::{TimelineError, TimelineResult};
use crate::interval::TIME_EPSILON;

/// Reject a token stream that is unsorted, overlapping or has negative spans.
///
/// Streams are validated once at entry and never repaired.
pub fn validate_tokens(tokens: &[TimedToken]) -> TimelineResult<()> {
    let mut prev_end = 0.0_f64;

    for (i, token) in tokens.iter().enumerate() {
        if !token.start.is_finite() || !token.end.is_finite() {
            return Err(TimelineError::malformed(i, "timestamp is not a finite number"));
        }
        if token.start < 0.0 {
            return Err(TimelineError::malformed(
                i,
                format!("negative start {:.3}s", token.start),
            ));
        }
        if token.end < token.start {
            return Err(TimelineError::malformed(
                i,
                format!("ends at {:.3}s before it starts at {:.3}s", token.end, token.start),
            ));
        }
        if i > 0 && token.start < prev_end - TIME_EPSILON {
            return Err(TimelineError::malformed(
                i,
                format!(
                    "starts at {:.3}s before the previous token ends at {:.3}s",
                    token.start, prev_end
                ),
            ));
        }
        prev_end = token.end;
    }

    Ok(())
}

/// Copy of `tokens` with `pause_before_ms` derived from the timestamps.
///
/// The first token gets no pause.
pub fn with_computed_pauses(tokens: &[TimedToken]) -> Vec<TimedToken> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut prev_end: Option<f64> = None;

    for token in tokens {
        let pause = prev_end.map_or(0, |end| pause_ms(end, token.start));
        out.push(token.clone().with_pause_before_ms(pause));
        prev_end = Some(token.end);
    }

    out
}

/// Silence between two instants in whole milliseconds.
pub(crate) fn pause_ms(prev_end: f64, next_start: f64) -> u32 {
    u32::try_from(seconds_to_ms(next_start - prev_end)).unwrap_or(u32::MAX)
}

/// Render `[i]text` pairs so a remote model can address tokens by index.
pub fn format_indexed_transcript(tokens: &[TimedToken]) -> String {
    tokens
        .iter()
        .enumerate()
        .map(|(i, t)| format!("[{}]{}", i, t.text))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Identity of a tokenisation: token count plus SHA-256 over the texts.
///
/// The semantic-cut service echoes the fingerprint of the stream it was
/// shown; word indices are only meaningful if it matches the aligner's.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenFingerprint {
    pub count: usize,
    pub digest: String,
}

impl TokenFingerprint {
    /// Fingerprint a token stream.
    pub fn of(tokens: &[TimedToken]) -> Self {
        let mut hasher = Sha256::new();
        for token in tokens {
            hasher.update(token.text.trim().as_bytes());
            hasher.update([0u8]);
        }

        Self {
            count: tokens.len(),
            digest: format!("{:x}", hasher.finalize()),
        }
    }

    /// Check that `tokens` has this fingerprint.
    pub fn verify(&self, tokens: &[TimedToken]) -> TimelineResult<()> {
        let actual = Self::of(tokens);
        if actual == *self {
            return Ok(());
        }

        Err(TimelineError::TokenStreamMismatch {
            expected_count: self.count,
            actual_count: actual.count,
            expected_digest: self.digest.clone(),
            actual_digest: actual.digest,
        })
    }
}

/// Tokens transcribed from one chunk, timed relative to the chunk start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkTranscript {
    /// Position of the chunk in the recording.
    pub index: usize,
    /// Chunk start on the global timeline (seconds).
    pub offset_sec: f64,
    /// Chunk-relative tokens.
    pub tokens: Vec<TimedToken>,
}

/// Gather per-chunk transcripts into one global token stream.
///
/// Chunks are ordered by index, every token is shifted by its chunk's
/// offset, pauses are recomputed across chunk seams and the result is
/// validated.
pub fn merge_chunk_transcripts(mut chunks: Vec<ChunkTranscript>) -> TimelineResult<Vec<TimedToken>> {
    chunks.sort_by_key(|c| c.index);

    let shifted: Vec<TimedToken> = chunks
        .iter()
        .flat_map(|chunk| chunk.tokens.iter().map(move |t| t.shifted(chunk.offset_sec)))
        .collect();

    let merged = with_computed_pauses(&shifted);
    validate_tokens(&merged)?;

    debug!(
        chunks = chunks.len(),
        tokens = merged.len(),
        "Merged chunk transcripts"
    );

    Ok(merged)
}
