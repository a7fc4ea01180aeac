//! Caption phrases and section markers for the trimmed timeline.

mod phrases;
mod sections;

pub use phrases::{group_phrases, PhraseBreak};
pub use sections::generate_section_markers;

use serde::Serialize;
use tracing::debug;
use vcut_models::{Phrase, TimedToken};

use crate::config::CaptionProfile;
use crate::error::TimelineResult;
use crate::metrics;

/// Phrase lists for both display layouts, built from one token stream.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CaptionTracks {
    /// 16:9 phrases.
    pub horizontal: Vec<Phrase>,
    /// 9:16 phrases.
    pub vertical: Vec<Phrase>,
}

impl CaptionTracks {
    /// Group `tokens` once per profile.
    pub fn build(
        tokens: &[TimedToken],
        horizontal: &CaptionProfile,
        vertical: &CaptionProfile,
    ) -> TimelineResult<Self> {
        horizontal.validate()?;
        vertical.validate()?;

        let tracks = Self {
            horizontal: group_phrases(tokens, horizontal),
            vertical: group_phrases(tokens, vertical),
        };

        metrics::record_phrases("horizontal", tracks.horizontal.len());
        metrics::record_phrases("vertical", tracks.vertical.len());
        debug!(
            tokens = tokens.len(),
            horizontal = tracks.horizontal.len(),
            vertical = tracks.vertical.len(),
            "Built caption tracks"
        );

        Ok(tracks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertical_track_is_finer() {
        let tokens: Vec<_> = (0..40)
            .map(|i| TimedToken::new("word", i as f64 * 0.3, i as f64 * 0.3 + 0.25))
            .collect();
        let tracks =
            CaptionTracks::build(&tokens, &CaptionProfile::horizontal(), &CaptionProfile::vertical())
                .unwrap();
        assert_eq!(tracks.horizontal.len(), 5);
        assert_eq!(tracks.vertical.len(), 8);
    }

    #[test]
    fn test_invalid_profile_rejected() {
        let broken = CaptionProfile {
            max_tokens: 0,
            ..CaptionProfile::vertical()
        };
        assert!(CaptionTracks::build(&[], &CaptionProfile::horizontal(), &broken).is_err());
    }
}
