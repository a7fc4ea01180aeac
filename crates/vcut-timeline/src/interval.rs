//! Shared interval core.
//!
//! Every stage of the engine works on ordered, non-overlapping stretches of
//! one timeline. This module holds the operations they share:
//!
//! - [`merge_sorted`]: left fold merging near-adjacent intervals
//! - [`complement_within`]: keep intervals left between removals
//! - [`partition`]: split points to a gapless [`Segment`] list
//! - [`validate_spans`]: chronological order check for caller-supplied lists
//! - [`OffsetMap`]: original time to trimmed time (cumulative offset)
//! - [`label_timeline`] / [`compute_span_stats`]: Keep/Cut accounting
//!
//! ```text
//!  original  |==keep==|--cut--|====keep====|-cut-|==keep==|
//!  trimmed   |==keep==|====keep====|==keep==|
//!            0        offset₁      offset₂   trimmed_duration
//! ```

use serde::{Deserialize, Serialize};
use vcut_models::{KeepInterval, Segment, TimeSpan};

use crate::error::{TimelineError, TimelineResult};

/// Tolerance for comparing timestamps derived from float arithmetic.
pub const TIME_EPSILON: f64 = 1e-6;

/// Label indicating whether a stretch survives into the edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntervalLabel {
    /// Keep this stretch in the output.
    Keep,
    /// Remove this stretch from the output.
    Cut,
}

/// A stretch of the original timeline with a Keep or Cut label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabeledSpan {
    /// Start time in seconds.
    pub start_sec: f64,
    /// End time in seconds.
    pub end_sec: f64,
    /// Whether to keep or cut this stretch.
    pub label: IntervalLabel,
}

impl TimeSpan for LabeledSpan {
    fn start_sec(&self) -> f64 {
        self.start_sec
    }

    fn end_sec(&self) -> f64 {
        self.end_sec
    }
}

/// Merge intervals already sorted by start.
///
/// An interval whose start lies within `tolerance` of the running
/// interval's end is folded into it by `combine`; otherwise it opens a new
/// running interval. `combine` decides how the bounds and payload merge.
pub fn merge_sorted<T, F>(items: Vec<T>, tolerance: f64, mut combine: F) -> Vec<T>
where
    T: TimeSpan,
    F: FnMut(&mut T, T),
{
    let mut merged: Vec<T> = Vec::with_capacity(items.len());

    for item in items {
        match merged.last_mut() {
            Some(running) if item.start_sec() <= running.end_sec() + tolerance => {
                combine(running, item);
            }
            _ => merged.push(item),
        }
    }

    merged
}

/// Keep intervals left inside `[0, total]` once `removals` are taken out.
///
/// `removals` must be sorted and non-overlapping. Gaps of `min_gap` or less
/// never become keep intervals.
pub fn complement_within<S: TimeSpan>(removals: &[S], total: f64, min_gap: f64) -> Vec<KeepInterval> {
    let mut keeps = Vec::with_capacity(removals.len() + 1);
    let mut cursor = 0.0_f64;

    for removal in removals {
        let start = removal.start_sec().clamp(0.0, total);
        if start - cursor > min_gap {
            keeps.push(KeepInterval::new(cursor, start));
        }
        cursor = cursor.max(removal.end_sec().clamp(0.0, total));
    }

    if total - cursor > min_gap {
        keeps.push(KeepInterval::new(cursor, total));
    }

    keeps
}

/// Reject a span list that is out of chronological order or holds a
/// reversed or non-finite span.
pub fn validate_spans<S: TimeSpan>(spans: &[S]) -> TimelineResult<()> {
    let mut prev_end = 0.0_f64;

    for (i, span) in spans.iter().enumerate() {
        let (start, end) = (span.start_sec(), span.end_sec());
        if !start.is_finite() || !end.is_finite() || end < start {
            return Err(TimelineError::malformed(
                i,
                format!("interval spans {start:.3}s..{end:.3}s"),
            ));
        }
        if i > 0 && start < prev_end - TIME_EPSILON {
            return Err(TimelineError::malformed(
                i,
                format!("interval starts at {start:.3}s before the previous one ends at {prev_end:.3}s"),
            ));
        }
        prev_end = end;
    }

    Ok(())
}

/// Turn split points into a gapless partition of `[0, total]`.
///
/// Points are taken in order; a point at or before the previous boundary,
/// or at or past `total`, is ignored. The first segment always starts at 0
/// and the last always ends at `total`.
pub fn partition(points: &[f64], total: f64) -> Vec<Segment> {
    if total <= 0.0 {
        return Vec::new();
    }

    let mut segments = Vec::with_capacity(points.len() + 1);
    let mut start = 0.0_f64;

    for &point in points {
        if point <= start + TIME_EPSILON || point >= total - TIME_EPSILON {
            continue;
        }
        segments.push(Segment::new(segments.len(), start, point));
        start = point;
    }

    segments.push(Segment::new(segments.len(), start, total));
    segments
}

/// One kept stretch and where it lands in the trimmed timeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffsetEntry {
    /// Kept stretch in original time.
    pub keep: KeepInterval,
    /// Trimmed-timeline time at which `keep.start_sec` lands.
    pub offset: f64,
}

impl OffsetEntry {
    /// Translate an original timestamp inside this entry's keep interval.
    pub fn translate(&self, t: f64) -> f64 {
        t - self.keep.start_sec + self.offset
    }
}

/// Cumulative-offset translation from original to trimmed time.
///
/// Each kept interval is shifted left by the total duration removed before
/// it, so kept intervals sit back to back starting at 0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OffsetMap {
    entries: Vec<OffsetEntry>,
    trimmed_duration: f64,
}

impl OffsetMap {
    /// Build the map from chronologically ordered keep intervals.
    pub fn new<S: TimeSpan>(keeps: &[S]) -> Self {
        let mut entries = Vec::with_capacity(keeps.len());
        let mut offset = 0.0;

        for keep in keeps {
            entries.push(OffsetEntry {
                keep: KeepInterval::new(keep.start_sec(), keep.end_sec()),
                offset,
            });
            offset += keep.duration_sec();
        }

        Self {
            entries,
            trimmed_duration: offset,
        }
    }

    /// Entries in chronological order.
    pub fn entries(&self) -> &[OffsetEntry] {
        &self.entries
    }

    /// Length of the trimmed timeline (sum of kept durations).
    pub fn trimmed_duration(&self) -> f64 {
        self.trimmed_duration
    }

    /// Trimmed-timeline start of the `index`-th keep interval.
    pub fn offset_of(&self, index: usize) -> Option<f64> {
        self.entries.get(index).map(|e| e.offset)
    }

    /// Translate an original timestamp, or `None` if it was cut.
    pub fn map_time(&self, t: f64) -> Option<f64> {
        self.entry_for(t)
            .filter(|e| t <= e.keep.end_sec + TIME_EPSILON)
            .map(|e| e.translate(t))
    }

    /// Translate a span that must lie wholly inside one keep interval.
    ///
    /// Spans crossing a removed boundary yield `None`; they are never
    /// truncated.
    pub fn map_span(&self, start: f64, end: f64) -> Option<(f64, f64)> {
        self.entry_for(start)
            .filter(|e| end <= e.keep.end_sec + TIME_EPSILON)
            .map(|e| (e.translate(start), e.translate(end)))
    }

    fn entry_for(&self, t: f64) -> Option<&OffsetEntry> {
        let idx = self
            .entries
            .partition_point(|e| e.keep.start_sec <= t + TIME_EPSILON);
        idx.checked_sub(1).map(|i| &self.entries[i])
    }
}

/// Label the whole of `[0, total]`: keeps as given, everything between as Cut.
pub fn label_timeline<S: TimeSpan>(keeps: &[S], total: f64) -> Vec<LabeledSpan> {
    let mut spans = Vec::with_capacity(keeps.len() * 2 + 1);
    let mut cursor = 0.0_f64;

    for keep in keeps {
        if keep.start_sec() > cursor + TIME_EPSILON {
            spans.push(LabeledSpan {
                start_sec: cursor,
                end_sec: keep.start_sec(),
                label: IntervalLabel::Cut,
            });
        }
        spans.push(LabeledSpan {
            start_sec: keep.start_sec(),
            end_sec: keep.end_sec(),
            label: IntervalLabel::Keep,
        });
        cursor = keep.end_sec();
    }

    if total > cursor + TIME_EPSILON {
        spans.push(LabeledSpan {
            start_sec: cursor,
            end_sec: total,
            label: IntervalLabel::Cut,
        });
    }

    spans
}

/// Calculate Keep/Cut totals over a labeled timeline.
pub fn compute_span_stats(spans: &[LabeledSpan]) -> SpanStats {
    let mut stats = SpanStats::default();

    for span in spans {
        let duration = span.duration_sec();
        match span.label {
            IntervalLabel::Keep => {
                stats.total_keep_sec += duration;
                stats.keep_count += 1;
            }
            IntervalLabel::Cut => {
                stats.total_cut_sec += duration;
                stats.cut_count += 1;
            }
        }
    }

    let total = stats.total_keep_sec + stats.total_cut_sec;
    stats.keep_ratio = if total > 0.0 {
        stats.total_keep_sec / total
    } else {
        1.0
    };

    stats
}

/// Statistics about Keep/Cut spans.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SpanStats {
    /// Total kept duration in seconds.
    pub total_keep_sec: f64,
    /// Total cut duration in seconds.
    pub total_cut_sec: f64,
    /// Number of Keep spans.
    pub keep_count: usize,
    /// Number of Cut spans.
    pub cut_count: usize,
    /// Ratio of kept content (0.0 to 1.0).
    pub keep_ratio: f64,
}
