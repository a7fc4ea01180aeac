//! Configuration for every timeline stage.
//!
//! Each stage has its own serde-deserialisable struct with defaults tuned
//! for talking-head content. [`TimelineConfig`] aggregates them and is
//! validated once, before any processing starts.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{TimelineError, TimelineResult};

/// Silence and energy analysis parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Noise floor in dBFS. Frames whose peak stays below it are silent.
    pub threshold_db: f64,

    /// Minimum silence length to report as a gap (seconds).
    pub min_gap_sec: f64,

    /// Analysis frame length for the silence pass (milliseconds).
    pub frame_ms: u32,

    /// Window length for the RMS energy sampler (seconds).
    pub energy_window_sec: f64,

    /// Minimum dynamic range for the energy track to be usable (dB).
    ///
    /// A flatter track carries no meaningful dips and is discarded.
    pub min_energy_range_db: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            threshold_db: -35.0,
            min_gap_sec: 0.3,
            frame_ms: 10,
            energy_window_sec: 0.3,
            min_energy_range_db: 3.0,
        }
    }
}

impl DetectorConfig {
    /// Builder-style setter for the noise floor.
    pub fn with_threshold_db(mut self, threshold_db: f64) -> Self {
        self.threshold_db = threshold_db;
        self
    }

    /// Builder-style setter for the minimum gap length.
    pub fn with_min_gap_sec(mut self, secs: f64) -> Self {
        self.min_gap_sec = secs;
        self
    }

    /// Builder-style setter for the energy window.
    pub fn with_energy_window_sec(mut self, secs: f64) -> Self {
        self.energy_window_sec = secs;
        self
    }

    /// Reject parameters no analysis pass can honour.
    pub fn validate(&self) -> TimelineResult<()> {
        if self.threshold_db.is_nan() || self.threshold_db > 0.0 {
            return Err(TimelineError::unsatisfiable(format!(
                "threshold_db must be <= 0 dBFS, got {}",
                self.threshold_db
            )));
        }
        if self.frame_ms == 0 {
            return Err(TimelineError::unsatisfiable("frame_ms must be positive"));
        }
        positive("min_gap_sec", self.min_gap_sec)?;
        positive("energy_window_sec", self.energy_window_sec)?;
        if self.min_energy_range_db.is_nan() || self.min_energy_range_db < 0.0 {
            return Err(TimelineError::unsatisfiable(
                "min_energy_range_db must not be negative",
            ));
        }
        Ok(())
    }
}

/// Duration bounds for coarse chunk splitting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    /// Ideal segment length (seconds).
    pub target_sec: f64,
    /// Shortest allowed segment, except the final tail (seconds).
    pub min_sec: f64,
    /// Longest allowed segment (seconds).
    pub max_sec: f64,
    /// Radius around the target searched for candidates (seconds).
    pub search_window_sec: f64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            target_sec: 180.0,
            min_sec: 150.0,
            max_sec: 210.0,
            search_window_sec: 30.0,
        }
    }
}

impl SplitConfig {
    /// Builder-style setter for all three duration bounds.
    pub fn with_bounds(mut self, min_sec: f64, target_sec: f64, max_sec: f64) -> Self {
        self.min_sec = min_sec;
        self.target_sec = target_sec;
        self.max_sec = max_sec;
        self
    }

    /// Builder-style setter for the search radius.
    pub fn with_search_window_sec(mut self, secs: f64) -> Self {
        self.search_window_sec = secs;
        self
    }

    /// Reject bounds that admit no partition.
    pub fn validate(&self) -> TimelineResult<()> {
        positive("target_sec", self.target_sec)?;
        positive("min_sec", self.min_sec)?;
        positive("max_sec", self.max_sec)?;
        positive("search_window_sec", self.search_window_sec)?;
        ordered_bounds(self.min_sec, self.target_sec, self.max_sec)
    }
}

/// Sentence boundary and clip grouping parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SentenceConfig {
    /// A pause at least this long always starts a new sentence (ms).
    pub min_pause_ms: u32,

    /// Shorter pause that still breaks after sentence-final punctuation (ms).
    pub punctuation_pause_ms: u32,

    /// Shortest intended clip (seconds).
    pub min_clip_sec: f64,

    /// Longest clip, unless a single token is longer (seconds).
    pub max_clip_sec: f64,

    /// Length at which a clip starts looking for a boundary (seconds).
    pub target_clip_sec: f64,

    /// How many tokens ahead a boundary may be taken once on target.
    pub lookahead_tokens: usize,
}

impl Default for SentenceConfig {
    fn default() -> Self {
        Self {
            min_pause_ms: 500,
            punctuation_pause_ms: 300,
            min_clip_sec: 3.0,
            max_clip_sec: 15.0,
            target_clip_sec: 10.0,
            lookahead_tokens: 5,
        }
    }
}

impl SentenceConfig {
    /// Builder-style setter for the pause thresholds.
    pub fn with_pauses_ms(mut self, min_pause_ms: u32, punctuation_pause_ms: u32) -> Self {
        self.min_pause_ms = min_pause_ms;
        self.punctuation_pause_ms = punctuation_pause_ms;
        self
    }

    /// Builder-style setter for the clip duration bounds.
    pub fn with_clip_bounds(mut self, min_sec: f64, target_sec: f64, max_sec: f64) -> Self {
        self.min_clip_sec = min_sec;
        self.target_clip_sec = target_sec;
        self.max_clip_sec = max_sec;
        self
    }

    /// Reject clip bounds that admit no grouping.
    pub fn validate(&self) -> TimelineResult<()> {
        positive("target_clip_sec", self.target_clip_sec)?;
        positive("max_clip_sec", self.max_clip_sec)?;
        if self.min_clip_sec.is_nan() || self.min_clip_sec < 0.0 {
            return Err(TimelineError::unsatisfiable("min_clip_sec must not be negative"));
        }
        ordered_bounds(self.min_clip_sec, self.target_clip_sec, self.max_clip_sec)
    }
}

/// Cut resolution parameters for precision trimming.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrimConfig {
    /// Keep intervals shorter than this are dropped to avoid flicker (seconds).
    pub min_keep_sec: f64,

    /// Cuts closer than this are merged into one (seconds).
    pub merge_tolerance_sec: f64,

    /// Gaps between cuts shorter than this never become keeps (seconds).
    pub min_gap_sec: f64,

    /// Maximum number of keep intervals before the filter graph should be
    /// passed to the media tool as a script file instead of inline.
    pub max_inline_segments: usize,
}

impl Default for TrimConfig {
    fn default() -> Self {
        Self {
            min_keep_sec: 1.0,
            merge_tolerance_sec: 0.1,
            min_gap_sec: 0.05,
            max_inline_segments: 100,
        }
    }
}

impl TrimConfig {
    /// Tighter edit: keeps short reaction beats.
    pub fn aggressive() -> Self {
        Self {
            min_keep_sec: 0.5,
            merge_tolerance_sec: 0.2,
            ..Self::default()
        }
    }

    /// Looser edit: only long keeps survive, nearly touching cuts stay separate.
    pub fn conservative() -> Self {
        Self {
            min_keep_sec: 2.0,
            merge_tolerance_sec: 0.05,
            ..Self::default()
        }
    }

    /// Builder-style setter for the jitter threshold.
    pub fn with_min_keep_sec(mut self, secs: f64) -> Self {
        self.min_keep_sec = secs.max(0.0);
        self
    }

    /// Builder-style setter for the merge tolerance.
    pub fn with_merge_tolerance_sec(mut self, secs: f64) -> Self {
        self.merge_tolerance_sec = secs.max(0.0);
        self
    }

    /// Reject malformed trim parameters.
    pub fn validate(&self) -> TimelineResult<()> {
        for (name, value) in [
            ("min_keep_sec", self.min_keep_sec),
            ("merge_tolerance_sec", self.merge_tolerance_sec),
            ("min_gap_sec", self.min_gap_sec),
        ] {
            if value.is_nan() || value < 0.0 {
                return Err(TimelineError::unsatisfiable(format!(
                    "{name} must not be negative, got {value}"
                )));
            }
        }
        if self.max_inline_segments == 0 {
            return Err(TimelineError::unsatisfiable(
                "max_inline_segments must be positive",
            ));
        }
        Ok(())
    }

    /// Reject a jitter threshold that no keep interval could ever meet.
    pub fn validate_for(&self, total_duration: f64) -> TimelineResult<()> {
        self.validate()?;
        if self.min_keep_sec > total_duration {
            return Err(TimelineError::unsatisfiable(format!(
                "min_keep_sec {} exceeds total duration {:.3}s",
                self.min_keep_sec, total_duration
            )));
        }
        Ok(())
    }
}

/// Break thresholds for one caption display format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionProfile {
    /// Most tokens in one phrase.
    pub max_tokens: usize,
    /// Most characters in one phrase, counting joining spaces.
    pub max_chars: usize,
    /// Longest phrase display time (ms).
    pub max_duration_ms: u64,
    /// A pause at least this long before a token starts a new phrase (ms).
    pub min_pause_ms: u32,
}

impl Default for CaptionProfile {
    fn default() -> Self {
        Self::horizontal()
    }
}

impl CaptionProfile {
    /// 16:9 layout with room for a full line of text.
    pub fn horizontal() -> Self {
        Self {
            max_tokens: 8,
            max_chars: 50,
            max_duration_ms: 3500,
            min_pause_ms: 200,
        }
    }

    /// 9:16 layout with short, punchy phrases.
    pub fn vertical() -> Self {
        Self {
            max_tokens: 5,
            max_chars: 30,
            max_duration_ms: 2500,
            min_pause_ms: 150,
        }
    }

    /// Reject limits that would make every phrase empty.
    pub fn validate(&self) -> TimelineResult<()> {
        if self.max_tokens == 0 || self.max_chars == 0 || self.max_duration_ms == 0 {
            return Err(TimelineError::unsatisfiable(format!(
                "caption limits must be positive: {} tokens, {} chars, {} ms",
                self.max_tokens, self.max_chars, self.max_duration_ms
            )));
        }
        Ok(())
    }
}

/// Section title pop-up parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionConfig {
    /// Original-timeline gap that starts a new section (seconds).
    pub section_gap_sec: f64,
    /// How long each title stays on screen (ms).
    pub display_ms: u64,
    /// Titles in display order; sections past the end get no title.
    pub titles: Vec<String>,
}

impl Default for SectionConfig {
    fn default() -> Self {
        Self {
            section_gap_sec: 2.0,
            display_ms: 2000,
            titles: ["The Hook", "Key Insight", "Real Talk", "The Truth", "Takeaway"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl SectionConfig {
    /// Builder-style setter for the title list.
    pub fn with_titles<I, S>(mut self, titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.titles = titles.into_iter().map(Into::into).collect();
        self
    }

    /// Reject non-positive gap or display lengths.
    pub fn validate(&self) -> TimelineResult<()> {
        positive("section_gap_sec", self.section_gap_sec)?;
        if self.display_ms == 0 {
            return Err(TimelineError::unsatisfiable("display_ms must be positive"));
        }
        Ok(())
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    pub detector: DetectorConfig,
    pub split: SplitConfig,
    pub sentence: SentenceConfig,
    pub trim: TrimConfig,
    pub horizontal_captions: CaptionProfile,
    pub vertical_captions: CaptionProfile,
    pub sections: SectionConfig,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            detector: DetectorConfig::default(),
            split: SplitConfig::default(),
            sentence: SentenceConfig::default(),
            trim: TrimConfig::default(),
            horizontal_captions: CaptionProfile::horizontal(),
            vertical_captions: CaptionProfile::vertical(),
            sections: SectionConfig::default(),
        }
    }
}

impl TimelineConfig {
    /// Create config from `VCUT_*` environment variables, falling back to
    /// defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            detector: DetectorConfig {
                threshold_db: env_or("VCUT_SILENCE_THRESHOLD_DB", defaults.detector.threshold_db),
                min_gap_sec: env_or("VCUT_SILENCE_MIN_GAP_SEC", defaults.detector.min_gap_sec),
                ..defaults.detector
            },
            split: SplitConfig {
                target_sec: env_or("VCUT_SPLIT_TARGET_SEC", defaults.split.target_sec),
                min_sec: env_or("VCUT_SPLIT_MIN_SEC", defaults.split.min_sec),
                max_sec: env_or("VCUT_SPLIT_MAX_SEC", defaults.split.max_sec),
                search_window_sec: env_or(
                    "VCUT_SPLIT_SEARCH_WINDOW_SEC",
                    defaults.split.search_window_sec,
                ),
            },
            sentence: SentenceConfig {
                min_pause_ms: env_or("VCUT_SENTENCE_MIN_PAUSE_MS", defaults.sentence.min_pause_ms),
                punctuation_pause_ms: env_or(
                    "VCUT_SENTENCE_PUNCTUATION_PAUSE_MS",
                    defaults.sentence.punctuation_pause_ms,
                ),
                min_clip_sec: env_or("VCUT_CLIP_MIN_SEC", defaults.sentence.min_clip_sec),
                max_clip_sec: env_or("VCUT_CLIP_MAX_SEC", defaults.sentence.max_clip_sec),
                target_clip_sec: env_or("VCUT_CLIP_TARGET_SEC", defaults.sentence.target_clip_sec),
                ..defaults.sentence
            },
            trim: TrimConfig {
                min_keep_sec: env_or("VCUT_TRIM_MIN_KEEP_SEC", defaults.trim.min_keep_sec),
                merge_tolerance_sec: env_or(
                    "VCUT_TRIM_MERGE_TOLERANCE_SEC",
                    defaults.trim.merge_tolerance_sec,
                ),
                ..defaults.trim
            },
            sections: SectionConfig {
                section_gap_sec: env_or("VCUT_SECTION_GAP_SEC", defaults.sections.section_gap_sec),
                ..defaults.sections
            },
            ..Self::default()
        }
    }

    /// Validate every stage's thresholds.
    pub fn validate(&self) -> TimelineResult<()> {
        self.detector.validate()?;
        self.split.validate()?;
        self.sentence.validate()?;
        self.trim.validate()?;
        self.horizontal_captions.validate()?;
        self.vertical_captions.validate()?;
        self.sections.validate()
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn positive(name: &str, value: f64) -> TimelineResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(TimelineError::unsatisfiable(format!(
            "{name} must be positive, got {value}"
        )))
    }
}

fn ordered_bounds(min: f64, target: f64, max: f64) -> TimelineResult<()> {
    if min > max {
        return Err(TimelineError::unsatisfiable(format!(
            "min {min} exceeds max {max}"
        )));
    }
    if target < min || target > max {
        return Err(TimelineError::unsatisfiable(format!(
            "target {target} outside [{min}, {max}]"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TimelineConfig::default();
        assert_eq!(config.split.target_sec, 180.0);
        assert_eq!(config.sentence.min_pause_ms, 500);
        assert_eq!(config.trim.min_keep_sec, 1.0);
        assert_eq!(config.vertical_captions.max_tokens, 5);
        assert_eq!(config.sections.titles.len(), 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_trim_presets() {
        assert!(TrimConfig::aggressive().min_keep_sec < TrimConfig::default().min_keep_sec);
        assert!(TrimConfig::conservative().min_keep_sec > TrimConfig::default().min_keep_sec);
    }

    #[test]
    fn test_builder_pattern() {
        let config = TrimConfig::default()
            .with_min_keep_sec(0.75)
            .with_merge_tolerance_sec(-1.0);
        assert_eq!(config.min_keep_sec, 0.75);
        assert_eq!(config.merge_tolerance_sec, 0.0);
    }

    #[test]
    fn test_min_greater_than_max_rejected() {
        let split = SplitConfig::default().with_bounds(220.0, 180.0, 210.0);
        assert!(matches!(
            split.validate(),
            Err(TimelineError::ThresholdUnsatisfiable(_))
        ));

        let sentence = SentenceConfig::default().with_clip_bounds(3.0, 20.0, 15.0);
        assert!(sentence.validate().is_err());
    }

    #[test]
    fn test_min_keep_longer_than_timeline_rejected() {
        let trim = TrimConfig::default().with_min_keep_sec(5.0);
        assert!(trim.validate_for(10.0).is_ok());
        assert!(matches!(
            trim.validate_for(4.0),
            Err(TimelineError::ThresholdUnsatisfiable(_))
        ));
    }

    #[test]
    fn test_empty_caption_profile_rejected() {
        let profile = CaptionProfile {
            max_tokens: 0,
            ..CaptionProfile::vertical()
        };
        assert!(profile.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: TimelineConfig =
            serde_json::from_str(r#"{"trim": {"min_keep_sec": 0.5}}"#).unwrap();
        assert_eq!(config.trim.min_keep_sec, 0.5);
        assert_eq!(config.trim.merge_tolerance_sec, 0.1);
        assert_eq!(config.split, SplitConfig::default());
    }

    #[test]
    fn test_from_env_override() {
        std::env::set_var("VCUT_SPLIT_TARGET_SEC", "200");
        std::env::set_var("VCUT_SPLIT_MAX_SEC", "not-a-number");
        let config = TimelineConfig::from_env();
        std::env::remove_var("VCUT_SPLIT_TARGET_SEC");
        std::env::remove_var("VCUT_SPLIT_MAX_SEC");

        assert_eq!(config.split.target_sec, 200.0);
        assert_eq!(config.split.max_sec, 210.0);
        assert!(config.validate().is_ok());
    }
}
