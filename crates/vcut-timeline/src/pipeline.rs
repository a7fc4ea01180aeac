//! End-to-end precision trim.
//!
//! Takes an aligned token stream plus the semantic service's cut
//! suggestions and produces everything the renderer needs: keep intervals,
//! the filter graph, re-timed captions for both layouts and section titles.
//! No I/O happens here.

use std::time::Instant;

use serde::Serialize;
use tracing::info;
use vcut_models::{CutSuggestion, CutSuggestionBatch, Phrase, SectionMarker, TimedToken};

use crate::captions::{generate_section_markers, CaptionTracks};
use crate::config::TimelineConfig;
use crate::cutlist::{resolve_suggestions, CutResolution};
use crate::error::TimelineResult;
use crate::interval::SpanStats;
use crate::metrics;
use crate::remap::{remap_tokens, RemapOutcome};
use crate::render::{build_concat_filter, ConcatFilter};
use crate::transcript::{validate_tokens, TokenFingerprint};

/// Input to one precision trim.
#[derive(Debug, Clone, Default)]
pub struct TrimRequest {
    /// Aligned tokens of the full recording.
    pub tokens: Vec<TimedToken>,
    /// Length of the recording in seconds.
    pub total_duration: f64,
    /// Word-indexed cuts from the semantic service.
    pub cuts: Vec<CutSuggestion>,
    /// Fingerprint of the token stream the service was shown, if known.
    pub fingerprint: Option<TokenFingerprint>,
}

impl TrimRequest {
    pub fn new(tokens: Vec<TimedToken>, total_duration: f64, cuts: Vec<CutSuggestion>) -> Self {
        Self {
            tokens,
            total_duration,
            cuts,
            fingerprint: None,
        }
    }

    /// Build a request from the semantic service's raw reply.
    ///
    /// The reply may be wrapped in a Markdown code fence; unparseable
    /// replies fail with `CutResponse`.
    pub fn from_model_response(
        tokens: Vec<TimedToken>,
        total_duration: f64,
        response: &str,
    ) -> TimelineResult<Self> {
        let batch = CutSuggestionBatch::from_model_response(response)?;
        Ok(Self::new(tokens, total_duration, batch.cuts))
    }

    /// Builder-style setter for the alignment fingerprint.
    pub fn with_fingerprint(mut self, fingerprint: TokenFingerprint) -> Self {
        self.fingerprint = Some(fingerprint);
        self
    }
}

/// Everything produced by one precision trim.
#[derive(Debug, Clone, Serialize)]
pub struct TrimOutcome {
    pub resolution: CutResolution,
    pub remapped: RemapOutcome,
    pub captions: CaptionTracks,
    pub sections: Vec<SectionMarker>,
    pub filter: ConcatFilter,
    pub stats: SpanStats,
}

impl TrimOutcome {
    /// Length of the trimmed timeline.
    pub fn trimmed_duration(&self) -> f64 {
        self.remapped.trimmed_duration
    }

    /// Phrases for the 16:9 layout.
    pub fn horizontal_phrases(&self) -> &[Phrase] {
        &self.captions.horizontal
    }

    /// Phrases for the 9:16 layout.
    pub fn vertical_phrases(&self) -> &[Phrase] {
        &self.captions.vertical
    }
}

/// Precision-trim pipeline with validated configuration.
#[derive(Debug, Clone)]
pub struct TrimPipeline {
    config: TimelineConfig,
}

impl TrimPipeline {
    /// Create a pipeline, rejecting unsatisfiable thresholds up front.
    pub fn new(config: TimelineConfig) -> TimelineResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    /// Run one trim.
    pub fn run(&self, request: TrimRequest) -> TimelineResult<TrimOutcome> {
        let started = Instant::now();

        validate_tokens(&request.tokens)?;
        if let Some(fingerprint) = &request.fingerprint {
            fingerprint.verify(&request.tokens)?;
        }

        let resolution = resolve_suggestions(
            &request.cuts,
            &request.tokens,
            request.total_duration,
            &self.config.trim,
        )?;

        let remapped = remap_tokens(&request.tokens, &resolution.keeps)?;
        let captions = CaptionTracks::build(
            &remapped.tokens,
            &self.config.horizontal_captions,
            &self.config.vertical_captions,
        )?;
        let sections = generate_section_markers(&resolution.keeps, &self.config.sections);
        let filter = build_concat_filter(
            &resolution.keeps,
            request.total_duration,
            self.config.trim.max_inline_segments,
        )?;
        let stats = resolution.stats();

        metrics::record_keep_ratio(stats.keep_ratio);
        info!(
            original_sec = request.total_duration,
            trimmed_sec = remapped.trimmed_duration,
            keep_ratio = format!("{:.1}%", stats.keep_ratio * 100.0),
            keeps = resolution.keeps.len(),
            skipped_cuts = resolution.skipped.len(),
            dropped_segments = resolution.dropped.count,
            dropped_tokens = remapped.dropped_tokens,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Precision trim complete"
        );

        Ok(TrimOutcome {
            resolution,
            remapped,
            captions,
            sections,
            filter,
            stats,
        })
    }
}
