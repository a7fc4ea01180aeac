//! Caption display units.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::token::TimedToken;

/// A group of consecutive tokens shown together as one caption.
///
/// `start_ms` equals the first token's start and `end_ms` the last token's
/// end; `tokens` are kept for word-level highlighting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Phrase {
    /// Token texts joined by single spaces
    pub text: String,
    /// Display start in milliseconds
    pub start_ms: u64,
    /// Display end in milliseconds
    pub end_ms: u64,
    /// Constituent tokens in stream order
    #[serde(rename = "words")]
    pub tokens: Vec<TimedToken>,
}

impl Phrase {
    /// Build a phrase from a non-empty run of tokens.
    ///
    /// Returns `None` for an empty run.
    pub fn from_tokens(tokens: Vec<TimedToken>) -> Option<Self> {
        let start_ms = tokens.first()?.start_ms();
        let end_ms = tokens.last()?.end_ms();
        let text = tokens
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        Some(Self {
            text,
            start_ms,
            end_ms,
            tokens,
        })
    }

    /// Display duration in milliseconds.
    pub fn duration_ms(&self) -> u64 {
        self.end_ms.saturating_sub(self.start_ms)
    }
}

/// A pop-up section title stamped on the trimmed timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SectionMarker {
    /// Title to display
    pub title: String,
    /// Display start in the trimmed timeline (milliseconds)
    pub start_ms: u64,
    /// Display duration in milliseconds
    pub duration_ms: u64,
}
