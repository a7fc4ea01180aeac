//! Boundary candidates reported by silence and energy analysis.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Which analysis pass produced a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CandidateSource {
    Silence,
    Energy,
}

/// A silence interval long enough to be a likely sentence break.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SilenceGap {
    /// Midpoint of the silence in seconds (the preferred cut point)
    pub midpoint: f64,
    /// Length of the silence in seconds
    pub duration: f64,
    /// Confidence that this is a natural break, in [0, 1]
    pub confidence: f64,
}

impl SilenceGap {
    /// Gap length at which confidence saturates.
    pub const SATURATION_SECS: f64 = 1.0;

    /// Build a gap from its bounds; confidence grows with length and
    /// saturates at 1.0 for gaps of one second or more.
    pub fn from_bounds(start: f64, end: f64) -> Self {
        let duration = (end - start).max(0.0);
        Self {
            midpoint: start + duration / 2.0,
            duration,
            confidence: (duration / Self::SATURATION_SECS).min(1.0),
        }
    }
}

/// Signal level of one fixed-size analysis window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EnergySample {
    /// Window start in seconds
    pub timestamp: f64,
    /// RMS level in dBFS (lower is quieter)
    pub level_db: f64,
}

/// A uniform view over both candidate kinds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BoundaryCandidate {
    /// Candidate cut point in seconds
    pub timestamp: f64,
    /// Confidence in [0, 1]
    pub strength: f64,
    /// Producing pass
    pub source: CandidateSource,
}

impl From<SilenceGap> for BoundaryCandidate {
    fn from(gap: SilenceGap) -> Self {
        Self {
            timestamp: gap.midpoint,
            strength: gap.confidence,
            source: CandidateSource::Silence,
        }
    }
}

impl EnergySample {
    /// Convert to a candidate whose strength is the window's quietness
    /// relative to the given level range.
    pub fn to_candidate(&self, quietest_db: f64, loudest_db: f64) -> BoundaryCandidate {
        let range = loudest_db - quietest_db;
        let strength = if range > 0.0 {
            ((loudest_db - self.level_db) / range).clamp(0.0, 1.0)
        } else {
            0.0
        };
        BoundaryCandidate {
            timestamp: self.timestamp,
            strength,
            source: CandidateSource::Energy,
        }
    }
}
