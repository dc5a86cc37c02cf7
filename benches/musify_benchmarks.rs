//! # Musify Performance Benchmarks
//!
//! ```bash
//! cargo bench
//! cargo bench scoring
//! ```

use chrono::NaiveDate;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use musify::algorithm::{score_track, ScoringContext};
use musify::features::extract;
use musify::learning::{apply_event, PlayEvent};
use musify::model::PreferenceModel;
use musify::queue::{plan_with, RngSource};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::hint::black_box;

const ARTISTS: &[&str] = &["DJ Nova", "Lofi Girl", "Arijit Singh", "Metallica", "Miles Davis", "Bon Iver"];
const TITLES: &[&str] = &[
    "Night Drive (Remix)",
    "Study Beats Vol. 3",
    "Tum Hi Ho - Unplugged",
    "Master of Puppets [Live]",
    "So What",
    "Skinny Love, Acoustic",
];

fn track_names(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| format!("{} - {} {i}.mp3", ARTISTS[i % ARTISTS.len()], TITLES[(i / 3) % TITLES.len()]))
        .collect()
}

/// A model trained on a realistic mix of completed plays and skips.
fn trained_model(names: &[String]) -> PreferenceModel {
    let mut model = PreferenceModel::default();
    let mut now = NaiveDate::from_ymd_opt(2024, 6, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .expect("valid date");
    for (i, name) in names.iter().enumerate() {
        let event = if i % 4 == 0 {
            PlayEvent::skipped(name.as_str())
        } else {
            PlayEvent::completed(name.as_str(), 200.0)
        };
        apply_event(&mut model, &event, now);
        now += chrono::Duration::minutes(17);
    }
    model
}

fn bench_extraction(c: &mut Criterion) {
    let names = track_names(64);
    c.bench_function("extract_features", |b| {
        b.iter(|| {
            for name in &names {
                black_box(extract(black_box(name)));
            }
        });
    });
}

fn bench_scoring(c: &mut Criterion) {
    let names = track_names(1000);
    let model = trained_model(&names);
    let context = ScoringContext::default();

    c.bench_function("scoring_single_track", |b| {
        b.iter(|| score_track(black_box(&model), black_box(&names[42]), 21, &context));
    });
}

fn bench_planning(c: &mut Criterion) {
    let mut group = c.benchmark_group("planning");
    let context = ScoringContext::default();

    for size in [10, 100, 1000] {
        let names = track_names(size);
        let model = trained_model(&names);
        group.bench_with_input(BenchmarkId::new("plan", size), &names, |b, names| {
            let mut source = RngSource(StdRng::seed_from_u64(3));
            b.iter(|| plan_with(&model, black_box(names), 12, &context, &mut source));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_extraction, bench_scoring, bench_planning);
criterion_main!(benches);
