//! Timeline metrics collection.
//!
//! Counters and histograms recorded through the `metrics` facade. The
//! library installs no recorder; the embedding service decides where they go.

use metrics::{counter, histogram};

// =============================================================================
// Metric Names
// =============================================================================

/// Metric name constants for consistency.
pub mod names {
    /// Cut intervals absorbed into a neighbour while merging.
    pub const CUTS_MERGED_TOTAL: &str = "vcut_cuts_merged_total";

    /// Cut suggestions skipped for out-of-range token indices.
    pub const INVALID_CUTS_TOTAL: &str = "vcut_invalid_cuts_total";

    /// Keep intervals dropped by the jitter filter.
    pub const MICRO_SEGMENTS_DROPPED_TOTAL: &str = "vcut_micro_segments_dropped_total";

    /// Split points placed at the target because no candidate was in range.
    pub const FORCED_SPLITS_TOTAL: &str = "vcut_forced_splits_total";

    /// Fixed-interval fallbacks by stage.
    pub const FALLBACKS_TOTAL: &str = "vcut_fallbacks_total";

    /// Tokens dropped while remapping to the trimmed timeline.
    pub const TOKENS_DROPPED_TOTAL: &str = "vcut_tokens_dropped_total";

    /// Caption phrases emitted by profile.
    pub const PHRASES_TOTAL: &str = "vcut_phrases_total";

    /// Fraction of the original timeline kept by a trim.
    pub const KEEP_RATIO: &str = "vcut_keep_ratio";
}

// =============================================================================
// Recording Functions
// =============================================================================

/// Record the outcome of a cut resolution.
pub fn record_cut_resolution(merged: usize, invalid: usize, micro_dropped: usize) {
    counter!(names::CUTS_MERGED_TOTAL).increment(merged as u64);
    counter!(names::INVALID_CUTS_TOTAL).increment(invalid as u64);
    counter!(names::MICRO_SEGMENTS_DROPPED_TOTAL).increment(micro_dropped as u64);
}

/// Record forced split points from the chunk selector.
pub fn record_forced_splits(count: usize) {
    counter!(names::FORCED_SPLITS_TOTAL).increment(count as u64);
}

/// Record a degenerate-signal fallback.
pub fn record_fallback(stage: &'static str) {
    counter!(names::FALLBACKS_TOTAL, "stage" => stage).increment(1);
}

/// Record tokens lost to cut boundaries.
pub fn record_tokens_dropped(count: usize) {
    counter!(names::TOKENS_DROPPED_TOTAL).increment(count as u64);
}

/// Record phrases produced for one caption profile.
pub fn record_phrases(profile: &'static str, count: usize) {
    counter!(names::PHRASES_TOTAL, "profile" => profile).increment(count as u64);
}

/// Record the kept fraction of a trimmed timeline.
pub fn record_keep_ratio(ratio: f64) {
    histogram!(names::KEEP_RATIO).record(ratio);
}

// =============================================================================
// Tests
// =============================================================================
