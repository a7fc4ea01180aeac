//! Fixed-threshold silence detection.
//!
//! # State Machine
//!
//! ```text
//!                     frame peak < noise floor
//!     ┌─────────────────────────────────────────────────┐
//!     │                                                 ▼
//! ┌─────────┐                                     ┌─────────┐
//! │ InSound │◄────────────────────────────────────│InSilence│
//! └─────────┘     frame peak >= noise floor       └─────────┘
//!                 (report gap if long enough)
//! ```

use tracing::trace;
use vcut_models::SilenceGap;

use super::AudioBuffer;
use crate::config::DetectorConfig;

enum State {
    InSound,
    InSilence { silence_start: f64 },
}

/// Converts a stream of per-frame silence decisions into silence gaps.
pub struct SilenceTracker {
    min_gap_sec: f64,
    state: State,
    gaps: Vec<SilenceGap>,
}

impl SilenceTracker {
    /// Create a tracker reporting silences of at least `min_gap_sec`.
    pub fn new(min_gap_sec: f64) -> Self {
        Self {
            min_gap_sec,
            state: State::InSound,
            gaps: Vec::new(),
        }
    }

    /// Process one analysis frame starting at `timestamp` seconds.
    pub fn ingest_frame(&mut self, is_silent: bool, timestamp: f64) {
        match (&self.state, is_silent) {
            (State::InSound, true) => {
                self.state = State::InSilence {
                    silence_start: timestamp,
                };
            }
            (State::InSilence { silence_start }, false) => {
                let duration = timestamp - silence_start;
                if duration >= self.min_gap_sec {
                    trace!(start = silence_start, end = timestamp, "Silence gap");
                    self.gaps
                        .push(SilenceGap::from_bounds(*silence_start, timestamp));
                }
                self.state = State::InSound;
            }
            _ => {}
        }
    }

    /// Finish and return all gaps.
    ///
    /// Silence still open at the end of the signal is not reported: no
    /// speech follows it, so it is no boundary.
    pub fn finalize(self) -> Vec<SilenceGap> {
        self.gaps
    }

    /// Number of gaps found so far.
    pub fn gap_count(&self) -> usize {
        self.gaps.len()
    }
}

/// Find silences whose frame peaks stay below `threshold_db`.
pub fn detect_silence_gaps(buffer: &AudioBuffer, config: &DetectorConfig) -> Vec<SilenceGap> {
    let frame_size =
        ((buffer.sample_rate() as u64 * config.frame_ms as u64) / 1000).max(1) as usize;
    let noise_floor = 10f64.powf(config.threshold_db / 20.0);

    let mut tracker = SilenceTracker::new(config.min_gap_sec);

    for (i, frame) in buffer.samples().chunks(frame_size).enumerate() {
        let peak = frame
            .iter()
            .filter(|s| s.is_finite())
            .fold(0.0_f64, |acc, s| acc.max(f64::from(s.abs())));
        tracker.ingest_frame(peak < noise_floor, buffer.time_at(i * frame_size));
    }

    tracker.finalize()
}
