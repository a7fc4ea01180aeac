//! Boundary candidate detection from raw audio.
//!
//! Two independent passes run over the same mono signal:
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌───────────────┐
//! │ f32 samples  │───►│ peak frames  │───►│ silence gaps  │
//! │ (mono PCM)   │    │ vs noise dB  │    │ {mid,dur,conf}│
//! └──────────────┘    └──────────────┘    └───────────────┘
//!        │            ┌──────────────┐    ┌───────────────┐
//!        └───────────►│ RMS windows  │───►│ energy samples│
//!                     └──────────────┘    └───────────────┘
//! ```
//!
//! A signal that yields neither gaps nor a usable energy track is
//! degenerate; the split selector then places fixed-interval splits.

mod batch;
mod energy;
mod silence;

pub use batch::{detect_batch, AudioChunk};
pub use energy::sample_energy;
pub use silence::{detect_silence_gaps, SilenceTracker};

use tracing::debug;
use vcut_models::{BoundaryCandidate, EnergySample, SilenceGap};

use crate::config::DetectorConfig;
use crate::error::{TimelineError, TimelineResult};

/// Mono PCM audio held in memory.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl AudioBuffer {
    /// Wrap decoded samples.
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> TimelineResult<Self> {
        if sample_rate == 0 {
            return Err(TimelineError::invalid_audio("sample rate must be positive"));
        }
        Ok(Self {
            samples,
            sample_rate,
        })
    }

    /// Decode raw 32-bit float little-endian mono PCM.
    pub fn from_f32le_bytes(bytes: &[u8], sample_rate: u32) -> TimelineResult<Self> {
        if bytes.len() % 4 != 0 {
            return Err(TimelineError::invalid_audio(format!(
                "{} bytes is not a whole number of f32 samples",
                bytes.len()
            )));
        }

        let samples = bytes
            .chunks_exact(4)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect();

        Self::new(samples, sample_rate)
    }

    /// Samples in playback order.
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Samples per second.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Playback length in seconds.
    pub fn duration_sec(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Timestamp of the sample at `index`.
    pub(crate) fn time_at(&self, index: usize) -> f64 {
        index as f64 / self.sample_rate as f64
    }
}

/// Both candidate lists for one signal, each sorted by timestamp.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetectionReport {
    /// Terminated silences of at least the configured minimum length.
    pub gaps: Vec<SilenceGap>,
    /// RMS level per window, empty when the track is too flat to use.
    pub energy: Vec<EnergySample>,
    /// Length of the analysed signal in seconds.
    pub duration_sec: f64,
}

impl DetectionReport {
    /// Whether neither pass produced a usable candidate.
    pub fn is_degenerate(&self) -> bool {
        self.gaps.is_empty() && self.energy.is_empty()
    }

    /// Both lists as uniform candidates, sorted by timestamp.
    ///
    /// Energy strength is the window's quietness relative to the track's
    /// dynamic range.
    pub fn candidates(&self) -> Vec<BoundaryCandidate> {
        let (quietest, loudest) = level_range(&self.energy);

        let mut candidates: Vec<BoundaryCandidate> = self
            .gaps
            .iter()
            .copied()
            .map(BoundaryCandidate::from)
            .chain(self.energy.iter().map(|s| s.to_candidate(quietest, loudest)))
            .collect();

        candidates.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));
        candidates
    }
}

/// Run both analysis passes over one signal.
pub fn detect(buffer: &AudioBuffer, config: &DetectorConfig) -> TimelineResult<DetectionReport> {
    config.validate()?;

    let gaps = detect_silence_gaps(buffer, config);
    let energy = sample_energy(buffer, config);

    let report = DetectionReport {
        gaps,
        energy,
        duration_sec: buffer.duration_sec(),
    };

    debug!(
        duration_sec = report.duration_sec,
        gaps = report.gaps.len(),
        energy_samples = report.energy.len(),
        degenerate = report.is_degenerate(),
        "Boundary detection complete"
    );

    Ok(report)
}

/// Quietest and loudest level in an energy track.
pub(crate) fn level_range(samples: &[EnergySample]) -> (f64, f64) {
    samples.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), s| {
        (lo.min(s.level_db), hi.max(s.level_db))
    })
}

#[cfg(test)]
pub(crate) mod test_signal {
    /// Square wave of amplitude 0.5 (about -6 dBFS).
    pub fn tone(samples: usize) -> Vec<f32> {
        (0..samples)
            .map(|i| if i % 2 == 0 { 0.5 } else { -0.5 })
            .collect()
    }

    /// Digital silence.
    pub fn silence(samples: usize) -> Vec<f32> {
        vec![0.0; samples]
    }

    /// Concatenate signal parts.
    pub fn concat(parts: &[Vec<f32>]) -> Vec<f32> {
        parts.iter().flatten().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::test_signal::*;
    use super::*;
    use vcut_models::CandidateSource;

    #[test]
    fn test_from_f32le_bytes() {
        let bytes: Vec<u8> = [0.25f32, -0.5, 1.0]
            .iter()
            .flat_map(|s| s.to_le_bytes())
            .collect();
        let buffer = AudioBuffer::from_f32le_bytes(&bytes, 16000).unwrap();
        assert_eq!(buffer.samples(), &[0.25, -0.5, 1.0]);

        assert!(matches!(
            AudioBuffer::from_f32le_bytes(&bytes[..5], 16000),
            Err(TimelineError::InvalidAudio(_))
        ));
        assert!(AudioBuffer::new(vec![0.0], 0).is_err());
    }

    #[test]
    fn test_duration() {
        let buffer = AudioBuffer::new(silence(24000), 16000).unwrap();
        assert!((buffer.duration_sec() - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_detect_speech_pause_speech() {
        let samples = concat(&[tone(1000), silence(600), tone(1000)]);
        let buffer = AudioBuffer::new(samples, 1000).unwrap();
        let report = detect(&buffer, &DetectorConfig::default()).unwrap();

        assert!(!report.is_degenerate());
        assert_eq!(report.gaps.len(), 1);
        assert!((report.gaps[0].midpoint - 1.3).abs() < 1e-6);

        let candidates = report.candidates();
        assert!(candidates
            .windows(2)
            .all(|w| w[0].timestamp <= w[1].timestamp));
        assert!(candidates
            .iter()
            .any(|c| c.source == CandidateSource::Silence));
    }

    #[test]
    fn test_pure_silence_is_degenerate() {
        let buffer = AudioBuffer::new(silence(5000), 1000).unwrap();
        let report = detect(&buffer, &DetectorConfig::default()).unwrap();
        assert!(report.is_degenerate());
        assert!(report.candidates().is_empty());
    }

    #[test]
    fn test_steady_tone_is_degenerate() {
        let buffer = AudioBuffer::new(tone(5000), 1000).unwrap();
        let report = detect(&buffer, &DetectorConfig::default()).unwrap();
        assert!(report.is_degenerate());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let buffer = AudioBuffer::new(tone(100), 1000).unwrap();
        let config = DetectorConfig::default().with_min_gap_sec(0.0);
        assert!(detect(&buffer, &config).is_err());
    }
}
