//! Shared data models for the VCut timeline engine.
//!
//! This crate provides Serde-serializable value types for:
//! - Word/character tokens from the speech-alignment service
//! - Boundary candidates from silence/energy analysis
//! - Timeline segments and sentence clips
//! - Cut suggestions, cut intervals and keep intervals
//! - Caption phrases and section markers
//!
//! All types are immutable values: every pipeline stage takes a slice of
//! them and returns a freshly built list.

pub mod candidate;
pub mod cut;
pub mod phrase;
pub mod segment;
pub mod span;
pub mod timestamp;
pub mod token;

// Re-export common types
pub use candidate::{BoundaryCandidate, CandidateSource, EnergySample, SilenceGap};
pub use cut::{CutInterval, CutSuggestion, CutSuggestionBatch, KeepInterval};
pub use phrase::{Phrase, SectionMarker};
pub use segment::{Clip, Segment};
pub use span::TimeSpan;
pub use timestamp::{format_millis, seconds_to_ms};
pub use token::{is_sentence_final, TimedToken, SENTENCE_ENDERS};
