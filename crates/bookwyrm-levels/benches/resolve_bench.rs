//! Benchmarks for level resolution.
//!
//! Resolution runs on every ranked participant for every applied snapshot,
//! so it should stay cheap even for oversized administrator tables.

use bookwyrm_levels::{progress_to_next, resolve_level, Level};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

fn table(tiers: u32) -> Vec<Level> {
    (0..tiers)
        .map(|i| Level::new(i + 1, format!("tier-{i}"), i * 10, i * 10 + 9))
        .collect()
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_level");
    for &tiers in &[5u32, 50, 500] {
        let levels = table(tiers);
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::from_parameter(tiers), &levels, |b, levels| {
            b.iter(|| resolve_level(black_box(tiers * 5), levels))
        });
    }
    group.finish();
}

fn bench_progress(c: &mut Criterion) {
    let mut group = c.benchmark_group("progress_to_next");
    for &tiers in &[5u32, 50, 500] {
        let levels = table(tiers);
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::from_parameter(tiers), &levels, |b, levels| {
            b.iter(|| progress_to_next(black_box(tiers * 5), levels))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_resolve, bench_progress);
criterion_main!(benches);
