//! Fixed-window RMS energy sampling.

use tracing::debug;
use vcut_models::EnergySample;

use super::{level_range, AudioBuffer};
use crate::config::DetectorConfig;

/// Level reported for digital silence.
pub const FLOOR_DB: f64 = -100.0;

/// Sample the RMS level of every `energy_window_sec` window.
///
/// Timestamps mark each window's start. A track whose levels span less
/// than `min_energy_range_db` has no meaningful dips and comes back empty.
pub fn sample_energy(buffer: &AudioBuffer, config: &DetectorConfig) -> Vec<EnergySample> {
    let window = ((config.energy_window_sec * buffer.sample_rate() as f64).round() as usize).max(1);

    let samples: Vec<EnergySample> = buffer
        .samples()
        .chunks(window)
        .enumerate()
        .map(|(i, chunk)| EnergySample {
            timestamp: buffer.time_at(i * window),
            level_db: rms_db(chunk),
        })
        .collect();

    let (quietest, loudest) = level_range(&samples);
    if samples.is_empty() || loudest - quietest < config.min_energy_range_db {
        debug!(
            windows = samples.len(),
            range_db = if samples.is_empty() { 0.0 } else { loudest - quietest },
            "Energy track too flat, discarding"
        );
        return Vec::new();
    }

    samples
}

/// RMS level of `chunk` in dBFS, floored at [`FLOOR_DB`].
fn rms_db(chunk: &[f32]) -> f64 {
    let (sum, count) = chunk
        .iter()
        .filter(|s| s.is_finite())
        .fold((0.0_f64, 0usize), |(sum, n), s| {
            let s = f64::from(*s);
            (sum + s * s, n + 1)
        });

    if count == 0 {
        return FLOOR_DB;
    }

    let rms = (sum / count as f64).sqrt();
    if rms > 0.0 {
        (20.0 * rms.log10()).max(FLOOR_DB)
    } else {
        FLOOR_DB
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_signal::*;
    use super::*;

    #[test]
    fn test_rms_levels() {
        assert_eq!(rms_db(&[0.0; 8]), FLOOR_DB);
        assert_eq!(rms_db(&[]), FLOOR_DB);
        assert!((rms_db(&[1.0, -1.0]) - 0.0).abs() < 1e-9);
        assert!((rms_db(&[0.5, -0.5]) - (-6.0206)).abs() < 1e-3);
    }

    #[test]
    fn test_quietest_window_is_in_the_pause() {
        let samples = concat(&[tone(1000), silence(600), tone(1000)]);
        let buffer = AudioBuffer::new(samples, 1000).unwrap();
        let energy = sample_energy(&buffer, &DetectorConfig::default());

        assert_eq!(energy.len(), 9);
        assert!(energy.windows(2).all(|w| w[0].timestamp < w[1].timestamp));

        let quietest = energy
            .iter()
            .min_by(|a, b| a.level_db.total_cmp(&b.level_db))
            .unwrap();
        assert!((quietest.timestamp - 1.2).abs() < 1e-9);
        assert_eq!(quietest.level_db, FLOOR_DB);
    }

    #[test]
    fn test_flat_track_discarded() {
        let buffer = AudioBuffer::new(tone(3000), 1000).unwrap();
        assert!(sample_energy(&buffer, &DetectorConfig::default()).is_empty());

        let empty = AudioBuffer::new(Vec::new(), 1000).unwrap();
        assert!(sample_energy(&empty, &DetectorConfig::default()).is_empty());
    }
}
