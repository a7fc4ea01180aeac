//! Segmentation Benchmarks
//!
//! Runs each core stage over synthetic hour-long inputs.
//!
//! # Running Benchmarks
//! ```bash
//! cargo bench --package vcut-timeline --bench segmentation
//! ```
//!
//! # Metrics Measured
//! - Split-point selection over an hour of candidates
//! - Sentence segmentation of ~9k tokens
//! - Cut resolution with hundreds of suggestions
//! - Phrase grouping for both caption profiles

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::time::Duration;

use vcut_models::{CutSuggestion, EnergySample, SilenceGap, TimedToken};
use vcut_timeline::{
    group_phrases, remap_tokens, resolve_suggestions, segment_sentences, select_split_points,
    with_computed_pauses, CaptionProfile, SentenceConfig, SplitConfig, TrimConfig,
};

const HOUR_SEC: f64 = 3600.0;

/// Speech at 2.5 words/s with a sentence break every 12 words.
fn hour_of_tokens() -> Vec<TimedToken> {
    let mut tokens = Vec::new();
    let mut t = 0.2;
    let mut i = 0usize;

    while t < HOUR_SEC - 1.0 {
        let text = if i % 12 == 11 { "end." } else { "word" };
        tokens.push(TimedToken::new(text, t, t + 0.3));
        t += if i % 12 == 11 { 0.9 } else { 0.4 };
        i += 1;
    }

    with_computed_pauses(&tokens)
}

/// A silence gap every 7s and an energy sample every 0.3s.
fn hour_of_candidates() -> (Vec<SilenceGap>, Vec<EnergySample>) {
    let gaps = (1..(HOUR_SEC / 7.0) as usize)
        .map(|i| {
            let start = i as f64 * 7.0;
            SilenceGap::from_bounds(start, start + 0.3 + (i % 5) as f64 * 0.1)
        })
        .collect();
    let energy = (0..(HOUR_SEC / 0.3) as usize)
        .map(|i| EnergySample {
            timestamp: i as f64 * 0.3,
            level_db: -20.0 - (i % 17) as f64,
        })
        .collect();
    (gaps, energy)
}

fn cut_every(tokens: &[TimedToken], stride: usize) -> Vec<CutSuggestion> {
    (0..tokens.len().saturating_sub(3))
        .step_by(stride)
        .map(|i| CutSuggestion {
            start_word_idx: i,
            end_word_idx: i + 2,
            reason: "filler".to_string(),
            words: None,
        })
        .collect()
}

fn bench_selector(c: &mut Criterion) {
    let mut group = c.benchmark_group("selector");
    group.warm_up_time(Duration::from_secs(2));
    group.measurement_time(Duration::from_secs(5));

    let (gaps, energy) = hour_of_candidates();
    let config = SplitConfig::default();

    group.bench_function("silence_and_energy", |b| {
        b.iter(|| select_split_points(HOUR_SEC, &config, black_box(&gaps), black_box(&energy)))
    });
    group.bench_function("energy_only", |b| {
        b.iter(|| select_split_points(HOUR_SEC, &config, &[], black_box(&energy)))
    });
    group.bench_function("degenerate", |b| {
        b.iter(|| select_split_points(black_box(HOUR_SEC), &config, &[], &[]))
    });

    group.finish();
}

fn bench_segmenter(c: &mut Criterion) {
    let mut group = c.benchmark_group("segmenter");
    group.warm_up_time(Duration::from_secs(2));
    group.measurement_time(Duration::from_secs(5));

    let tokens = hour_of_tokens();
    let config = SentenceConfig::default();

    group.throughput(Throughput::Elements(tokens.len() as u64));
    group.bench_function("hour", |b| {
        b.iter(|| segment_sentences(black_box(&tokens), HOUR_SEC, &config))
    });

    group.finish();
}

fn bench_resolver(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolver");
    group.warm_up_time(Duration::from_secs(2));
    group.measurement_time(Duration::from_secs(5));

    let tokens = hour_of_tokens();
    let config = TrimConfig::default();

    for stride in [200usize, 50, 10] {
        let cuts = cut_every(&tokens, stride);
        group.throughput(Throughput::Elements(cuts.len() as u64));
        group.bench_with_input(BenchmarkId::new("resolve", cuts.len()), &cuts, |b, cuts| {
            b.iter(|| resolve_suggestions(black_box(cuts), &tokens, HOUR_SEC, &config))
        });
    }

    group.finish();
}

fn bench_phrases(c: &mut Criterion) {
    let mut group = c.benchmark_group("phrases");
    group.warm_up_time(Duration::from_secs(2));
    group.measurement_time(Duration::from_secs(5));

    let tokens = hour_of_tokens();
    let cuts = cut_every(&tokens, 50);
    let remapped = match resolve_suggestions(&cuts, &tokens, HOUR_SEC, &TrimConfig::default())
        .and_then(|resolution| remap_tokens(&tokens, &resolution.keeps))
    {
        Ok(outcome) => outcome.tokens,
        Err(e) => panic!("synthetic cuts failed to resolve: {e}"),
    };

    group.throughput(Throughput::Elements(remapped.len() as u64));
    for (name, profile) in [
        ("horizontal", CaptionProfile::horizontal()),
        ("vertical", CaptionProfile::vertical()),
    ] {
        group.bench_with_input(BenchmarkId::new("group", name), &profile, |b, profile| {
            b.iter(|| group_phrases(black_box(&remapped), profile))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_selector,
    bench_segmenter,
    bench_resolver,
    bench_phrases,
);

criterion_main!(benches);
