//! Time-stamped speech tokens.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::span::TimeSpan;
use crate::timestamp::seconds_to_ms;

/// Punctuation that closes a sentence (Latin and CJK forms).
pub const SENTENCE_ENDERS: &[char] = &['.', '!', '?', '。', '！', '？', '；', '…'];

/// Whether `text` ends with sentence-final punctuation (ignoring trailing whitespace).
pub fn is_sentence_final(text: &str) -> bool {
    text.trim_end()
        .chars()
        .next_back()
        .is_some_and(|c| SENTENCE_ENDERS.contains(&c))
}

/// A word or character with its position on the timeline.
///
/// Produced by the speech-alignment service. Streams are ordered by
/// `start`, and consecutive tokens never overlap (a zero gap is legal).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TimedToken {
    /// Token text as transcribed
    pub text: String,

    /// Start time in seconds
    pub start: f64,

    /// End time in seconds
    pub end: f64,

    /// Silence before this token in milliseconds (0 for the first token)
    #[serde(default, alias = "pauseBefore", alias = "pause_before")]
    pub pause_before_ms: u32,
}

impl TimedToken {
    /// Create a token with no recorded pause.
    pub fn new(text: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            text: text.into(),
            start,
            end,
            pause_before_ms: 0,
        }
    }

    /// Builder-style setter for the preceding pause.
    pub fn with_pause_before_ms(mut self, pause_ms: u32) -> Self {
        self.pause_before_ms = pause_ms;
        self
    }

    /// Start time in whole milliseconds.
    pub fn start_ms(&self) -> u64 {
        seconds_to_ms(self.start)
    }

    /// End time in whole milliseconds.
    pub fn end_ms(&self) -> u64 {
        seconds_to_ms(self.end)
    }

    /// Whether this token closes a sentence.
    pub fn ends_sentence(&self) -> bool {
        is_sentence_final(&self.text)
    }

    /// Copy of this token shifted by `offset` seconds.
    pub fn shifted(&self, offset: f64) -> Self {
        Self {
            text: self.text.clone(),
            start: self.start + offset,
            end: self.end + offset,
            pause_before_ms: self.pause_before_ms,
        }
    }
}

impl TimeSpan for TimedToken {
    fn start_sec(&self) -> f64 {
        self.start
    }

    fn end_sec(&self) -> f64 {
        self.end
    }
}
