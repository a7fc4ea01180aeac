//! Error types for timeline operations.

use thiserror::Error;

/// Result type for timeline operations.
pub type TimelineResult<T> = Result<T, TimelineError>;

/// Errors that can occur while segmenting or re-timing a timeline.
///
/// A degenerate signal (no usable boundary candidates) is not an error:
/// stages fall back to fixed intervals and flag it in their result.
#[derive(Debug, Error)]
pub enum TimelineError {
    #[error("Malformed input at index {index}: {reason}")]
    InputMalformed { index: usize, reason: String },

    #[error("Cut references tokens {start_idx}..={end_idx} but the stream has {token_count} tokens")]
    InvalidCutReference {
        start_idx: usize,
        end_idx: usize,
        token_count: usize,
    },

    #[error("No content remains after cutting {total_duration:.3}s timeline ({dropped_count} micro-segments dropped)")]
    NoContentRemaining {
        total_duration: f64,
        dropped_count: usize,
    },

    #[error("Unsatisfiable thresholds: {0}")]
    ThresholdUnsatisfiable(String),

    #[error("Token stream mismatch: expected {expected_count} tokens ({expected_digest}), got {actual_count} ({actual_digest})")]
    TokenStreamMismatch {
        expected_count: usize,
        actual_count: usize,
        expected_digest: String,
        actual_digest: String,
    },

    #[error("Invalid audio: {0}")]
    InvalidAudio(String),

    #[error("Cut response parse error: {0}")]
    CutResponse(#[from] serde_json::Error),
}

impl TimelineError {
    /// Create a malformed-input error.
    pub fn malformed(index: usize, reason: impl Into<String>) -> Self {
        Self::InputMalformed {
            index,
            reason: reason.into(),
        }
    }

    /// Create an unsatisfiable-threshold error.
    pub fn unsatisfiable(message: impl Into<String>) -> Self {
        Self::ThresholdUnsatisfiable(message.into())
    }

    /// Create an invalid-audio error.
    pub fn invalid_audio(message: impl Into<String>) -> Self {
        Self::InvalidAudio(message.into())
    }

    /// Whether the stage can continue after this error.
    ///
    /// Only a bad cut reference is recoverable: that single cut is skipped.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::InvalidCutReference { .. })
    }
}
