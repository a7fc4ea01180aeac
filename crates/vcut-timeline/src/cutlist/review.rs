//! Human-readable summary of a resolved cut list.

use vcut_models::{format_millis, seconds_to_ms};

use super::CutResolution;

const RULE_WIDTH: usize = 60;

fn stamp(seconds: f64) -> String {
    format_millis(seconds_to_ms(seconds))
}

/// Render a cut summary for review before the edit is applied.
pub fn format_cut_review(resolution: &CutResolution) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let total = resolution.total_duration;
    let cut = resolution.cut_duration();
    let kept = resolution.kept_duration();
    let pct = if total > 0.0 { 100.0 * kept / total } else { 0.0 };

    let mut lines = vec![
        rule.clone(),
        "PRECISION CUT ANALYSIS".to_string(),
        rule,
        String::new(),
        format!("Original duration: {total:.1}s"),
        format!("Total to cut: {cut:.1}s"),
        format!("Estimated final: {kept:.1}s ({pct:.0}%)"),
        String::new(),
        "CUTS (by token index):".to_string(),
    ];

    for (i, c) in resolution.merged_cuts.iter().enumerate() {
        lines.push(format!(
            "  {}. Tokens [{}-{}] {} - {}",
            i + 1,
            c.start_token_idx,
            c.end_token_idx,
            stamp(c.start_sec),
            stamp(c.end_sec)
        ));
        lines.push(format!("     Reason: {}", c.reason));
    }

    if !resolution.skipped.is_empty() {
        lines.push(String::new());
        lines.push(format!("SKIPPED ({}):", resolution.skipped.len()));
        lines.extend(
            resolution
                .skipped
                .iter()
                .map(|s| format!("  Tokens [{}-{}]: {}", s.start_idx, s.end_idx, s.message)),
        );
    }

    if resolution.dropped.count > 0 {
        lines.push(String::new());
        lines.push(format!(
            "DROPPED {} micro-segment(s), {:.2}s total:",
            resolution.dropped.count, resolution.dropped.duration_sec
        ));
        lines.extend(
            resolution
                .dropped
                .intervals
                .iter()
                .map(|k| format!("  {} - {}", stamp(k.start_sec), stamp(k.end_sec))),
        );
    }

    lines.join("\n")
}
