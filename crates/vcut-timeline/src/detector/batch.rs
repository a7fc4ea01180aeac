//! Parallel detection over independently decoded chunks.

use rayon::prelude::*;
use tracing::debug;

use super::{detect, AudioBuffer, DetectionReport};
use crate::config::DetectorConfig;
use crate::error::TimelineResult;

/// One slice of a longer recording, analysed on its own.
#[derive(Debug, Clone)]
pub struct AudioChunk {
    /// Position of the chunk in the recording.
    pub index: usize,
    /// Start of the chunk on the global timeline (seconds).
    pub offset_sec: f64,
    /// Decoded chunk audio.
    pub buffer: AudioBuffer,
}

/// Analyse chunks in parallel and gather one global report.
///
/// Every chunk is processed to completion on the rayon pool with no
/// dependency on the others. Results are concatenated in chunk-index order
/// with each chunk's offset applied.
pub fn detect_batch(chunks: &[AudioChunk], config: &DetectorConfig) -> TimelineResult<DetectionReport> {
    let results: TimelineResult<Vec<(usize, f64, DetectionReport)>> = chunks
        .par_iter()
        .map(|chunk| {
            detect(&chunk.buffer, config).map(|report| (chunk.index, chunk.offset_sec, report))
        })
        .collect();

    let mut results = results?;
    results.sort_by_key(|(index, _, _)| *index);

    let mut merged = DetectionReport::default();
    for (_, offset, report) in results {
        merged.gaps.extend(report.gaps.into_iter().map(|mut gap| {
            gap.midpoint += offset;
            gap
        }));
        merged.energy.extend(report.energy.into_iter().map(|mut sample| {
            sample.timestamp += offset;
            sample
        }));
        merged.duration_sec = merged.duration_sec.max(offset + report.duration_sec);
    }

    merged.gaps.sort_by(|a, b| a.midpoint.total_cmp(&b.midpoint));
    merged
        .energy
        .sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));

    debug!(
        chunks = chunks.len(),
        gaps = merged.gaps.len(),
        energy_samples = merged.energy.len(),
        duration_sec = merged.duration_sec,
        "Batch detection complete"
    );

    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::super::test_signal::*;
    use super::*;

    fn chunk(index: usize, offset_sec: f64, samples: Vec<f32>) -> AudioChunk {
        AudioChunk {
            index,
            offset_sec,
            buffer: AudioBuffer::new(samples, 1000).unwrap(),
        }
    }

    #[test]
    fn test_gather_in_index_order_with_offsets() {
        let pause = || concat(&[tone(1000), silence(600), tone(1000)]);
        // Submitted out of order; the gather must not depend on it.
        let chunks = vec![chunk(1, 2.6, pause()), chunk(0, 0.0, pause())];

        let report = detect_batch(&chunks, &DetectorConfig::default()).unwrap();
        assert_eq!(report.gaps.len(), 2);
        assert!((report.gaps[0].midpoint - 1.3).abs() < 1e-6);
        assert!((report.gaps[1].midpoint - 3.9).abs() < 1e-6);
        assert!((report.duration_sec - 5.2).abs() < 1e-6);
        assert!(report
            .energy
            .windows(2)
            .all(|w| w[0].timestamp <= w[1].timestamp));
    }

    #[test]
    fn test_empty_batch() {
        let report = detect_batch(&[], &DetectorConfig::default()).unwrap();
        assert!(report.is_degenerate());
        assert_eq!(report.duration_sec, 0.0);
    }
}
