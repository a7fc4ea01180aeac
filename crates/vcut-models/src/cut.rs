//! Cut suggestions, cut intervals and keep intervals.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::span::TimeSpan;

/// A word range the semantic-cut service wants removed.
///
/// Indices address the token stream the service was shown and are
/// inclusive on both ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CutSuggestion {
    /// First token to remove
    pub start_word_idx: usize,
    /// Last token to remove (inclusive)
    pub end_word_idx: usize,
    /// Why the range should go (filler, repetition, false start, ...)
    #[serde(default)]
    pub reason: String,
    /// A few words of context echoed back by the service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub words: Option<String>,
}

/// Structured response from the semantic-cut service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CutSuggestionBatch {
    /// Ranges to remove
    #[serde(default)]
    pub cuts: Vec<CutSuggestion>,
}

impl CutSuggestionBatch {
    /// Parse a model response, accepting bare JSON or a fenced ```json block.
    pub fn from_model_response(text: &str) -> Result<Self, serde_json::Error> {
        let trimmed = text.trim();
        let body = trimmed
            .strip_prefix("```json")
            .or_else(|| trimmed.strip_prefix("```"))
            .and_then(|rest| rest.trim_end().strip_suffix("```"))
            .unwrap_or(trimmed);
        serde_json::from_str(body.trim())
    }
}

/// A removal interval in original-timeline coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CutInterval {
    /// Start of the first removed token in seconds
    pub start_sec: f64,
    /// End of the last removed token in seconds
    pub end_sec: f64,
    /// First removed token index
    pub start_token_idx: usize,
    /// Last removed token index (inclusive)
    pub end_token_idx: usize,
    /// Reason, or " + "-joined reasons after merging
    pub reason: String,
}

impl TimeSpan for CutInterval {
    fn start_sec(&self) -> f64 {
        self.start_sec
    }

    fn end_sec(&self) -> f64 {
        self.end_sec
    }
}

/// A stretch of the original timeline that survives into the edit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct KeepInterval {
    /// Start time in seconds
    pub start_sec: f64,
    /// End time in seconds
    pub end_sec: f64,
}

impl KeepInterval {
    /// Create a keep interval.
    pub fn new(start_sec: f64, end_sec: f64) -> Self {
        Self { start_sec, end_sec }
    }
}

impl TimeSpan for KeepInterval {
    fn start_sec(&self) -> f64 {
        self.start_sec
    }

    fn end_sec(&self) -> f64 {
        self.end_sec
    }
}
