//! Greedy phrase grouping under display limits.

use tracing::trace;
use vcut_models::{Phrase, TimedToken};

use crate::config::CaptionProfile;

/// Why a phrase was closed before the next token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhraseBreak {
    TokenLimit,
    CharLimit,
    DurationLimit,
    Pause,
    SentenceEnd,
}

/// Running phrase state.
struct OpenPhrase {
    tokens: Vec<TimedToken>,
    start_ms: u64,
    chars: usize,
}

impl OpenPhrase {
    fn new(token: &TimedToken) -> Self {
        Self {
            start_ms: token.start_ms(),
            chars: token.text.chars().count(),
            tokens: vec![token.clone()],
        }
    }

    fn push(&mut self, token: &TimedToken) {
        self.chars += 1 + token.text.chars().count();
        self.tokens.push(token.clone());
    }

    /// The break triggered by appending `next`, if any.
    ///
    /// Limits are checked in order and the first hit wins; a sentence end
    /// on the last token always breaks.
    fn break_before(&self, next: &TimedToken, profile: &CaptionProfile) -> Option<PhraseBreak> {
        let last = self.tokens.last()?;

        let limit = if self.tokens.len() >= profile.max_tokens {
            Some(PhraseBreak::TokenLimit)
        } else if self.chars + 1 + next.text.chars().count() > profile.max_chars {
            Some(PhraseBreak::CharLimit)
        } else if next.end_ms().saturating_sub(self.start_ms) > profile.max_duration_ms {
            Some(PhraseBreak::DurationLimit)
        } else if next.start_ms().saturating_sub(last.end_ms()) >= u64::from(profile.min_pause_ms) {
            Some(PhraseBreak::Pause)
        } else {
            None
        };

        if last.ends_sentence() {
            return Some(PhraseBreak::SentenceEnd);
        }
        limit
    }

    fn close(self) -> Option<Phrase> {
        Phrase::from_tokens(self.tokens)
    }
}

/// Group a token stream into caption phrases in one left-to-right pass.
///
/// Every token lands in exactly one phrase, in order. A phrase longer than
/// the limits only arises from a single token that is itself too long.
pub fn group_phrases(tokens: &[TimedToken], profile: &CaptionProfile) -> Vec<Phrase> {
    let mut phrases = Vec::new();
    let mut open: Option<OpenPhrase> = None;

    for token in tokens {
        let Some(phrase) = open.as_mut() else {
            open = Some(OpenPhrase::new(token));
            continue;
        };

        if let Some(reason) = phrase.break_before(token, profile) {
            trace!(?reason, at = token.start, "Phrase break");
            phrases.extend(open.take().and_then(OpenPhrase::close));
            open = Some(OpenPhrase::new(token));
        } else {
            phrase.push(token);
        }
    }

    if let Some(done) = open.and_then(OpenPhrase::close) {
        phrases.push(done);
    }

    phrases
}
