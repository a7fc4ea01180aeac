//! Timeline partition elements.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::span::TimeSpan;

/// One element of a partition of the timeline.
///
/// For an ordered list covering a timeline: the first segment starts at 0,
/// each segment ends where the next begins, and the last ends at the total
/// duration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Segment {
    /// Position in the partition (0-indexed)
    pub index: usize,
    /// Start time in seconds
    pub start_sec: f64,
    /// End time in seconds
    pub end_sec: f64,
    /// `end_sec - start_sec`
    pub duration_sec: f64,
}

impl Segment {
    /// Create a segment; the duration is derived from the bounds.
    pub fn new(index: usize, start_sec: f64, end_sec: f64) -> Self {
        Self {
            index,
            start_sec,
            end_sec,
            duration_sec: end_sec - start_sec,
        }
    }
}

impl TimeSpan for Segment {
    fn start_sec(&self) -> f64 {
        self.start_sec
    }

    fn end_sec(&self) -> f64 {
        self.end_sec
    }
}

/// A sentence-aligned clip: a partition segment plus the tokens it owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Clip {
    /// Partition bounds of the clip
    pub segment: Segment,
    /// Index of the first token in the clip
    pub first_token: usize,
    /// Index of the last token in the clip (inclusive)
    pub last_token: usize,
    /// Start of the first token in seconds
    pub speech_start_sec: f64,
    /// End of the last token in seconds
    pub speech_end_sec: f64,
    /// Token texts joined by single spaces
    pub text: String,
    /// Number of tokens in the clip
    pub token_count: usize,
}

impl Clip {
    /// Duration of actual speech (first token start to last token end).
    pub fn speech_duration_sec(&self) -> f64 {
        self.speech_end_sec - self.speech_start_sec
    }
}

impl TimeSpan for Clip {
    fn start_sec(&self) -> f64 {
        self.segment.start_sec
    }

    fn end_sec(&self) -> f64 {
        self.segment.end_sec
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_duration() {
        let segment = Segment::new(2, 175.0, 355.0);
        assert_eq!(segment.index, 2);
        assert!((segment.duration_sec - 180.0).abs() < 1e-9);
        assert!((segment.duration_sec() - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_segment_serializes_duration() {
        let json = serde_json::to_value(Segment::new(0, 0.0, 2.5)).unwrap();
        assert_eq!(json["duration_sec"], 2.5);
    }
}
