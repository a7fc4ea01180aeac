//! Common view over anything that occupies a stretch of the timeline.

/// A half-open `[start, end)` stretch of the timeline, in seconds.
pub trait TimeSpan {
    /// Start time in seconds.
    fn start_sec(&self) -> f64;

    /// End time in seconds.
    fn end_sec(&self) -> f64;

    /// Duration in seconds (never negative).
    fn duration_sec(&self) -> f64 {
        (self.end_sec() - self.start_sec()).max(0.0)
    }

    /// Whether `other` lies entirely inside this span.
    fn contains_span<S: TimeSpan + ?Sized>(&self, other: &S) -> bool {
        other.start_sec() >= self.start_sec() && other.end_sec() <= self.end_sec()
    }
}

impl TimeSpan for (f64, f64) {
    fn start_sec(&self) -> f64 {
        self.0
    }

    fn end_sec(&self) -> f64 {
        self.1
    }
}
