//! # Attune Performance Benchmarks
//!
//! Benchmarks for measuring the performance of critical Attune components.
//! These benchmarks help ensure that the system maintains high performance
//! as it evolves.
//!
//! ## Benchmark Categories
//!
//! - **Scoring Performance**: Signal lookup and correction application
//! - **Track Matching**: Nearest-track search over catalogs of various sizes
//! - **Synthesis**: Binaural tone sample generation throughput
//! - **Snapshots**: Session snapshot serialization
//!
//! ## Running Benchmarks
//!
//! ```bash
//! # Run all benchmarks
//! cargo bench
//!
//! # Run specific benchmark group
//! cargo bench scoring
//! cargo bench matching
//! ```

use attune::binaural::BinauralTones;
use attune::catalog::Track;
use attune::scoring::{self, Profile};
use attune::snapshot::SessionSnapshot;
use attune::tuning;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

fn bench_profile() -> Profile {
    Profile {
        gender: "F".to_string(),
        age_group: "31-40".to_string(),
        blood_type: "AB".to_string(),
        space: "Outdoor".to_string(),
        device: "Phone Speaker".to_string(),
    }
}

/// Helper to build a synthetic catalog of the given size
fn create_test_catalog(count: usize) -> Vec<Track> {
    (0..count)
        .map(|i| Track {
            bpm: 40.0 + (i % 60) as f64,
            hz: 120.0 + (i % 200) as f64,
            energy: (i % 100) as f64 / 100.0,
            asset_id: format!("track{i:04}"),
        })
        .collect()
}

/// Benchmark signal scoring performance
fn benchmark_scoring(c: &mut Criterion) {
    let mut group = c.benchmark_group("scoring");
    let profile = bench_profile();

    group.bench_function("single_score", |b| {
        b.iter(|| {
            scoring::score(
                black_box("mindfulness"),
                black_box("mindfulness_meditation"),
                black_box(&profile),
            )
        })
    });

    group.bench_function("normalize_subcategory", |b| {
        b.iter(|| tuning::normalize_subcategory(black_box("  Mindfulness   Meditation  ")))
    });

    group.bench_function("age_bucketing", |b| {
        b.iter(|| {
            for age in 10..90u32 {
                black_box(tuning::age_group_for(black_box(age)));
            }
        })
    });

    group.finish();
}

/// Benchmark nearest-track matching over growing catalogs
fn benchmark_matching(c: &mut Criterion) {
    let mut group = c.benchmark_group("matching");
    let profile = bench_profile();
    let target = scoring::score("sleep", "falling_asleep", &profile).unwrap();

    for size in [10, 100, 1000, 10000] {
        let catalog = create_test_catalog(size);
        group.bench_with_input(
            BenchmarkId::new("match_track", size),
            &catalog,
            |b, catalog| b.iter(|| scoring::match_track(black_box(&target), black_box(catalog))),
        );
    }

    group.finish();
}

/// Benchmark binaural tone sample generation
fn benchmark_synthesis(c: &mut Criterion) {
    let mut group = c.benchmark_group("synthesis");

    // One second of stereo samples at 44.1 kHz
    group.bench_function("one_second_of_tones", |b| {
        b.iter(|| {
            let tones = BinauralTones::new(black_box(200.5), black_box(0.4));
            let sum: f32 = tones.take(88_200).sum();
            black_box(sum)
        })
    });

    group.finish();
}

/// Benchmark snapshot serialization round trips
fn benchmark_snapshots(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshots");

    let catalog = create_test_catalog(50);
    let rec = scoring::recommend(
        "study",
        "reading",
        &bench_profile(),
        Ok(catalog),
    )
    .unwrap();
    let snapshot = SessionSnapshot::new(
        bench_profile(),
        "study",
        "reading",
        45,
        vec!["Page Turning".to_string()],
        rec,
        None,
    );

    group.bench_function("serialize", |b| {
        b.iter(|| serde_json::to_string(black_box(&snapshot)).unwrap())
    });

    let raw = serde_json::to_string(&snapshot).unwrap();
    group.bench_function("deserialize", |b| {
        b.iter(|| serde_json::from_str::<SessionSnapshot>(black_box(&raw)).unwrap())
    });

    group.finish();
}

// Group all benchmarks
criterion_group!(
    benches,
    benchmark_scoring,
    benchmark_matching,
    benchmark_synthesis,
    benchmark_snapshots
);

criterion_main!(benches);
