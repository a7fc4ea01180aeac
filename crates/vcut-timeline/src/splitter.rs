//! Constrained split-point selection for coarse chunking.
//!
//! A greedy left-to-right pass places one split per window around
//! `current + target`, preferring natural breaks:
//!
//! 1. the silence gap with the best distance-penalised confidence,
//! 2. otherwise the quietest energy window,
//! 3. otherwise the target itself (forced split).
//!
//! Consecutive splits are always between `min_sec` and `max_sec` apart;
//! only the tail after the last split may be shorter.

use serde::Serialize;
use tracing::{debug, trace, warn};
use vcut_models::{EnergySample, Segment, SilenceGap};

use crate::config::SplitConfig;
use crate::detector::DetectionReport;
use crate::error::{TimelineError, TimelineResult};
use crate::interval::{partition, TIME_EPSILON};
use crate::metrics;

/// Weight of the distance-to-target penalty in the silence score.
pub const DISTANCE_PENALTY: f64 = 0.3;

/// Which priority level produced a split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitSource {
    Silence,
    Energy,
    Forced,
}

/// One chosen split and the window it was searched in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SplitPick {
    pub timestamp: f64,
    pub source: SplitSource,
    pub window_start: f64,
    pub window_end: f64,
}

/// The selector's result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SplitPlan {
    /// Chunk start times, beginning with 0.
    pub split_points: Vec<f64>,
    /// The partition of `[0, total]` these points produce.
    pub segments: Vec<Segment>,
    /// One entry per split after 0.
    pub picks: Vec<SplitPick>,
    /// No candidates were supplied; every split is a fixed interval.
    pub degenerate: bool,
}

impl SplitPlan {
    /// Number of splits placed without a candidate.
    pub fn forced_count(&self) -> usize {
        self.picks
            .iter()
            .filter(|p| p.source == SplitSource::Forced)
            .count()
    }
}

/// Plan chunk splits from a detection report.
pub fn plan_splits(report: &DetectionReport, config: &SplitConfig) -> TimelineResult<SplitPlan> {
    select_split_points(report.duration_sec, config, &report.gaps, &report.energy)
}

/// Choose split points over `[0, total]`.
pub fn select_split_points(
    total: f64,
    config: &SplitConfig,
    gaps: &[SilenceGap],
    energy: &[EnergySample],
) -> TimelineResult<SplitPlan> {
    config.validate()?;
    if !total.is_finite() || total < 0.0 {
        return Err(TimelineError::malformed(
            0,
            format!("total duration must be a non-negative number, got {total}"),
        ));
    }

    let degenerate = gaps.is_empty() && energy.is_empty();
    if degenerate {
        warn!(
            total_sec = total,
            "No boundary candidates, falling back to fixed-interval splits"
        );
        metrics::record_fallback("splitter");
    }

    let mut split_points = vec![0.0];
    let mut picks = Vec::new();
    let mut current = 0.0_f64;

    while current + config.min_sec < total {
        let target = current + config.target_sec;
        let window_start = (current + config.min_sec).max(target - config.search_window_sec);
        let window_end = total
            .min(target + config.search_window_sec)
            .min(current + config.max_sec);

        let chosen = best_silence(gaps, window_start, window_end, target, config.search_window_sec)
            .map(|t| (t, SplitSource::Silence))
            .or_else(|| quietest_energy(energy, window_start, window_end).map(|t| (t, SplitSource::Energy)));

        let (timestamp, source) = match chosen {
            Some(pick) => pick,
            None => {
                // The tail is shorter than the target: let it absorb the rest.
                let forced = target.min(total);
                if forced >= total - TIME_EPSILON {
                    break;
                }
                (forced, SplitSource::Forced)
            }
        };

        trace!(
            timestamp,
            ?source,
            window_start,
            window_end,
            "Split point selected"
        );

        split_points.push(timestamp);
        picks.push(SplitPick {
            timestamp,
            source,
            window_start,
            window_end,
        });
        current = timestamp;
    }

    let plan = SplitPlan {
        segments: partition(&split_points, total),
        split_points,
        picks,
        degenerate,
    };

    metrics::record_forced_splits(plan.forced_count());
    debug!(
        total_sec = total,
        segments = plan.segments.len(),
        forced = plan.forced_count(),
        degenerate,
        "Split plan complete"
    );

    Ok(plan)
}

/// Highest-scoring gap midpoint inside `[lo, hi]`; the first wins ties.
fn best_silence(gaps: &[SilenceGap], lo: f64, hi: f64, target: f64, window: f64) -> Option<f64> {
    let mut best: Option<(f64, f64)> = None;

    for gap in gaps.iter().filter(|g| g.midpoint >= lo && g.midpoint <= hi) {
        let score = gap.confidence - DISTANCE_PENALTY * (gap.midpoint - target).abs() / window;
        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((gap.midpoint, score));
        }
    }

    best.map(|(t, _)| t)
}

/// Quietest energy window inside `[lo, hi]`; the first wins ties.
fn quietest_energy(energy: &[EnergySample], lo: f64, hi: f64) -> Option<f64> {
    let mut best: Option<&EnergySample> = None;

    for sample in energy.iter().filter(|s| s.timestamp >= lo && s.timestamp <= hi) {
        if best.map_or(true, |b| sample.level_db < b.level_db) {
            best = Some(sample);
        }
    }

    best.map(|s| s.timestamp)
}
