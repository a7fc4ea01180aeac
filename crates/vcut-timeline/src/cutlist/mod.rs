//! Cut-list resolution for precision trimming.
//!
//! Word-indexed removal suggestions become a chronological list of keep
//! intervals:
//!
//! ```text
//! suggestions ─► enrich (token times) ─► merge (±tolerance) ─► complement
//!                  │ bad index                                     │
//!                  └─► skipped                jitter filter ◄──────┘
//!                                                  │
//!                                          keeps + dropped report
//! ```

mod merge;
mod review;

pub use merge::{check_cut_reference, enrich_cuts, merge_cuts, SkippedCut};
pub use review::format_cut_review;

use serde::Serialize;
use tracing::{debug, warn};
use vcut_models::{CutInterval, CutSuggestion, KeepInterval, TimeSpan, TimedToken};

use crate::config::TrimConfig;
use crate::error::{TimelineError, TimelineResult};
use crate::interval::{complement_within, compute_span_stats, label_timeline, SpanStats};
use crate::metrics;
use crate::transcript::validate_tokens;

/// Keep intervals removed by the jitter filter, plus slivers too short to
/// ever become keeps.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DroppedReport {
    /// Number of keep intervals shorter than the minimum.
    pub count: usize,
    /// Their combined duration in seconds.
    pub duration_sec: f64,
    /// The dropped intervals, in order.
    pub intervals: Vec<KeepInterval>,
    /// Combined duration of gaps between cuts too short to keep (seconds).
    pub sliver_sec: f64,
}

impl DroppedReport {
    /// Everything neither cut nor kept.
    pub fn total_sec(&self) -> f64 {
        self.duration_sec + self.sliver_sec
    }
}

/// The resolver's result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CutResolution {
    /// Merged, chronological removal intervals.
    pub merged_cuts: Vec<CutInterval>,
    /// Chronological keep intervals, all at least the minimum length.
    pub keeps: Vec<KeepInterval>,
    /// What the jitter filter removed.
    pub dropped: DroppedReport,
    /// Cuts skipped for bad token references.
    pub skipped: Vec<SkippedCut>,
    /// Number of input cuts absorbed while merging.
    pub merged_count: usize,
    /// Length of the original timeline.
    pub total_duration: f64,
}

impl CutResolution {
    /// Total removed by merged cuts, clamped to the timeline.
    pub fn cut_duration(&self) -> f64 {
        self.merged_cuts
            .iter()
            .map(|c| (c.end_sec.min(self.total_duration) - c.start_sec.max(0.0)).max(0.0))
            .sum()
    }

    /// Length of the trimmed timeline.
    pub fn kept_duration(&self) -> f64 {
        self.keeps.iter().map(|k| k.duration_sec()).sum()
    }

    /// Keep/Cut accounting over the original timeline.
    pub fn stats(&self) -> SpanStats {
        compute_span_stats(&label_timeline(&self.keeps, self.total_duration))
    }
}

/// Keep intervals between merged cuts, skipping gaps of `min_gap_sec` or less.
pub fn derive_keep_intervals(
    merged_cuts: &[CutInterval],
    total_duration: f64,
    config: &TrimConfig,
) -> Vec<KeepInterval> {
    complement_within(merged_cuts, total_duration, config.min_gap_sec)
}

/// Drop keep intervals shorter than `min_keep_sec`.
///
/// Flanking intervals are not re-joined across a dropped one.
pub fn filter_micro_keeps(keeps: Vec<KeepInterval>, min_keep_sec: f64) -> (Vec<KeepInterval>, DroppedReport) {
    let mut kept = Vec::with_capacity(keeps.len());
    let mut dropped = DroppedReport::default();

    for keep in keeps {
        if keep.duration_sec() >= min_keep_sec {
            kept.push(keep);
        } else {
            dropped.count += 1;
            dropped.duration_sec += keep.duration_sec();
            dropped.intervals.push(keep);
        }
    }

    (kept, dropped)
}

/// Resolve enriched cuts into keep intervals over `[0, total_duration]`.
///
/// Cuts referencing tokens outside `0..token_count` are skipped. Fails
/// with [`TimelineError::NoContentRemaining`] when nothing survives.
pub fn resolve_cuts(
    cuts: &[CutInterval],
    token_count: usize,
    total_duration: f64,
    config: &TrimConfig,
) -> TimelineResult<CutResolution> {
    if !total_duration.is_finite() || total_duration <= 0.0 {
        return Err(TimelineError::malformed(
            0,
            format!("total duration must be positive, got {total_duration}"),
        ));
    }
    config.validate_for(total_duration)?;

    let mut valid = Vec::with_capacity(cuts.len());
    let mut skipped = Vec::new();

    for (i, cut) in cuts.iter().enumerate() {
        if let Err(e) = check_cut_reference(cut.start_token_idx, cut.end_token_idx, token_count) {
            warn!(
                start_idx = cut.start_token_idx,
                end_idx = cut.end_token_idx,
                error = %e,
                "Skipping invalid cut"
            );
            skipped.push(SkippedCut {
                start_idx: cut.start_token_idx,
                end_idx: cut.end_token_idx,
                reason: cut.reason.clone(),
                message: e.to_string(),
            });
            continue;
        }
        if !cut.start_sec.is_finite() || !cut.end_sec.is_finite() || cut.end_sec < cut.start_sec {
            return Err(TimelineError::malformed(
                i,
                format!("cut spans {:.3}s..{:.3}s", cut.start_sec, cut.end_sec),
            ));
        }
        valid.push(cut.clone());
    }

    resolve_valid(valid, skipped, total_duration, config)
}

/// Enrich word-indexed suggestions against `tokens` and resolve them.
///
/// `tokens` must be chronological and non-overlapping; anything else is
/// rejected before a single cut is enriched.
pub fn resolve_suggestions(
    suggestions: &[CutSuggestion],
    tokens: &[TimedToken],
    total_duration: f64,
    config: &TrimConfig,
) -> TimelineResult<CutResolution> {
    if !total_duration.is_finite() || total_duration <= 0.0 {
        return Err(TimelineError::malformed(
            0,
            format!("total duration must be positive, got {total_duration}"),
        ));
    }
    config.validate_for(total_duration)?;
    validate_tokens(tokens)?;

    let (cuts, skipped) = enrich_cuts(suggestions, tokens);
    resolve_valid(cuts, skipped, total_duration, config)
}

fn resolve_valid(
    cuts: Vec<CutInterval>,
    skipped: Vec<SkippedCut>,
    total_duration: f64,
    config: &TrimConfig,
) -> TimelineResult<CutResolution> {
    let input_count = cuts.len();
    let merged_cuts = merge_cuts(cuts, config.merge_tolerance_sec);
    let merged_count = input_count - merged_cuts.len();

    let raw_keeps = derive_keep_intervals(&merged_cuts, total_duration, config);
    let (keeps, mut dropped) = filter_micro_keeps(raw_keeps, config.min_keep_sec);

    let mut resolution = CutResolution {
        merged_cuts,
        keeps,
        dropped: DroppedReport::default(),
        skipped,
        merged_count,
        total_duration,
    };

    let raw_keep_sec = resolution.kept_duration() + dropped.duration_sec;
    dropped.sliver_sec = (total_duration - resolution.cut_duration() - raw_keep_sec).max(0.0);
    resolution.dropped = dropped;

    metrics::record_cut_resolution(
        resolution.merged_count,
        resolution.skipped.len(),
        resolution.dropped.count,
    );

    if resolution.dropped.count > 0 {
        warn!(
            count = resolution.dropped.count,
            duration_sec = resolution.dropped.duration_sec,
            min_keep_sec = config.min_keep_sec,
            "Dropped micro-segments to reduce jitter"
        );
    }

    if resolution.keeps.is_empty() {
        return Err(TimelineError::NoContentRemaining {
            total_duration,
            dropped_count: resolution.dropped.count,
        });
    }

    debug!(
        cuts = input_count,
        merged_cuts = resolution.merged_cuts.len(),
        keeps = resolution.keeps.len(),
        skipped = resolution.skipped.len(),
        kept_sec = resolution.kept_duration(),
        total_sec = total_duration,
        "Cut resolution complete"
    );

    Ok(resolution)
}
