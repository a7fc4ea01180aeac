//! Timestamp conversion and formatting utilities.
//!
//! The alignment service reports seconds as `f64`; caption consumers want
//! whole milliseconds and review output wants `HH:MM:SS.mmm`.

/// Convert seconds to whole milliseconds, rounding to nearest.
///
/// Negative and non-finite inputs clamp to zero.
pub fn seconds_to_ms(seconds: f64) -> u64 {
    if !seconds.is_finite() || seconds <= 0.0 {
        return 0;
    }
    (seconds * 1000.0).round() as u64
}

/// Format milliseconds as HH:MM:SS.mmm (always with the millisecond part).
pub fn format_millis(total_ms: u64) -> String {
    let hours = total_ms / 3_600_000;
    let mins = (total_ms % 3_600_000) / 60_000;
    let secs = (total_ms % 60_000) / 1000;
    let millis = total_ms % 1000;
    format!("{:02}:{:02}:{:02}.{:03}", hours, mins, secs, millis)
}
