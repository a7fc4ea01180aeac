//! Time segmentation and re-timing engine.
//!
//! This crate provides:
//! - Silence and energy boundary detection over raw PCM
//! - Constrained split-point selection for long recordings
//! - Pause-based sentence segmentation of aligned token streams
//! - Cut-list resolution into keep intervals with jitter filtering
//! - Token re-timing onto the trimmed timeline and caption phrase grouping
//! - Trim filter graph rendering and an end-to-end precision-trim pipeline
//!
//! Every stage is a pure function of its input and configuration; only
//! [`detector::detect_batch`] fans work out across threads.

pub mod captions;
pub mod config;
pub mod cutlist;
pub mod detector;
pub mod error;
pub mod interval;
pub mod metrics;
pub mod pipeline;
pub mod remap;
pub mod render;
pub mod sentence;
pub mod splitter;
pub mod transcript;

pub use captions::{generate_section_markers, group_phrases, CaptionTracks};
pub use config::{
    CaptionProfile, DetectorConfig, SectionConfig, SentenceConfig, SplitConfig, TimelineConfig,
    TrimConfig,
};
pub use cutlist::{
    enrich_cuts, format_cut_review, resolve_cuts, resolve_suggestions, CutResolution, DroppedReport,
    SkippedCut,
};
pub use detector::{detect, detect_batch, AudioBuffer, AudioChunk, DetectionReport};
pub use error::{TimelineError, TimelineResult};
pub use interval::{OffsetMap, SpanStats};
pub use pipeline::{TrimOutcome, TrimPipeline, TrimRequest};
pub use remap::{remap_tokens, RemapOutcome, TokenOrigin};
pub use render::{build_concat_filter, ConcatFilter};
pub use sentence::{segment_sentences, SentencePlan};
pub use splitter::{plan_splits, select_split_points, SplitPlan, SplitSource};
pub use transcript::{
    format_indexed_transcript, merge_chunk_transcripts, validate_tokens, with_computed_pauses,
    ChunkTranscript, TokenFingerprint,
};
