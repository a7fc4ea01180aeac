//! Trim filter graph for the external media tool.
//!
//! Each keep interval becomes a `trim`/`atrim` pair whose timestamps are
//! reset, and all pairs feed one `concat` filter:
//!
//! ```text
//! [0:v]trim=start=0.000:end=4.200,setpts=PTS-STARTPTS[v0];
//! [0:a]atrim=start=0.000:end=4.200,asetpts=PTS-STARTPTS[a0];
//! ...
//! [v0][a0][v1][a1]concat=n=2:v=1:a=1[outv][outa]
//! ```
//!
//! Long edits produce graphs too large for a command line; those should
//! be handed over with `-filter_complex_script` instead.

use serde::Serialize;
use tracing::debug;
use vcut_models::TimeSpan;

use crate::error::{TimelineError, TimelineResult};

/// Output video pad of the concat filter.
pub const VIDEO_OUT_PAD: &str = "outv";

/// Output audio pad of the concat filter.
pub const AUDIO_OUT_PAD: &str = "outa";

/// A rendered filter graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConcatFilter {
    /// The `-filter_complex` value.
    pub graph: String,
    /// Number of kept intervals joined.
    pub segment_count: usize,
    /// Whether the graph should be passed as a script file.
    pub use_script_file: bool,
}

/// Build the trim/concat filter graph that keeps only `keeps` out of a
/// `total_duration` recording.
///
/// Fails on an empty list: the media tool rejects `concat=n=0`.
pub fn build_concat_filter<S: TimeSpan>(
    keeps: &[S],
    total_duration: f64,
    max_inline_segments: usize,
) -> TimelineResult<ConcatFilter> {
    if keeps.is_empty() {
        return Err(TimelineError::NoContentRemaining {
            total_duration,
            dropped_count: 0,
        });
    }

    let mut parts = Vec::with_capacity(keeps.len() * 2 + 1);
    let mut pads = String::with_capacity(keeps.len() * 10);

    for (i, keep) in keeps.iter().enumerate() {
        let (start, end) = (keep.start_sec(), keep.end_sec());
        parts.push(format!(
            "[0:v]trim=start={start:.3}:end={end:.3},setpts=PTS-STARTPTS[v{i}]"
        ));
        parts.push(format!(
            "[0:a]atrim=start={start:.3}:end={end:.3},asetpts=PTS-STARTPTS[a{i}]"
        ));
        pads.push_str(&format!("[v{i}][a{i}]"));
    }

    parts.push(format!(
        "{pads}concat=n={}:v=1:a=1[{VIDEO_OUT_PAD}][{AUDIO_OUT_PAD}]",
        keeps.len()
    ));

    let filter = ConcatFilter {
        graph: parts.join(";"),
        segment_count: keeps.len(),
        use_script_file: keeps.len() > max_inline_segments,
    };

    debug!(
        segments = filter.segment_count,
        graph_len = filter.graph.len(),
        use_script_file = filter.use_script_file,
        "Built concat filter graph"
    );

    Ok(filter)
}
