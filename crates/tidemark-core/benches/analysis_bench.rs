//! # Analysis Benchmarks
//!
//! Performance benchmarks for tidemark-core store and analysis operations.
//!
//! Run with: `cargo bench -p tidemark-core`

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use tidemark_core::{
    DailySnapshot, DayStamp, MemoryStore, Platform, StatStore, compute_growth, summarize,
};

/// Fill a store with one snapshot per day for each platform.
fn seeded_store(days: u32) -> MemoryStore {
    let mut store = MemoryStore::new();
    for platform in Platform::ALL {
        for day in 0..days {
            let snapshot = DailySnapshot {
                platform,
                day: DayStamp::new(day),
                followers: 1000 + u64::from(day) * 7,
                posts: u64::from(day),
                engagement: None,
                recorded_at: 0,
            };
            store.put(snapshot).expect("put");
        }
    }
    store
}

// =============================================================================
// BENCHMARKS
// =============================================================================

fn bench_range_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("range_since");

    for days in [365u32, 3650].iter() {
        let store = seeded_store(*days);
        group.bench_with_input(BenchmarkId::from_parameter(days), days, |b, &days| {
            b.iter(|| {
                let window = store
                    .range_since(Platform::Instagram, DayStamp::new(days - 30))
                    .expect("range");
                black_box(window)
            });
        });
    }

    group.finish();
}

fn bench_growth_computation(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_growth");

    for days in [30u32, 365].iter() {
        let store = seeded_store(*days);
        let window = store
            .range_since(Platform::Instagram, DayStamp::new(0))
            .expect("range");
        group.bench_with_input(BenchmarkId::from_parameter(days), days, |b, &days| {
            b.iter(|| {
                let report =
                    compute_growth(Platform::Instagram, days, window.clone()).expect("report");
                black_box(report)
            });
        });
    }

    group.finish();
}

fn bench_comparison(c: &mut Criterion) {
    let store = seeded_store(365);

    c.bench_function("summarize_all_platforms", |b| {
        b.iter(|| {
            let results = Platform::ALL
                .iter()
                .map(|&platform| {
                    let window = store
                        .range_since(platform, DayStamp::new(335))
                        .expect("range");
                    (platform, compute_growth(platform, 30, window))
                })
                .collect();
            black_box(summarize(30, results))
        });
    });
}

criterion_group!(
    benches,
    bench_range_query,
    bench_growth_computation,
    bench_comparison
);
criterion_main!(benches);
