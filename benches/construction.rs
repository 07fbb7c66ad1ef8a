//! Performance benchmarks for graph construction and comparison.
//!
//! Run with: `cargo bench --bench construction`
//!
//! | Group | Measures |
//! |-------|----------|
//! | `build` | one 3..5-gram graph per window policy |
//! | `similarity` | value/containment/size over growing texts |
//! | `canonical_code` | O(V²) encoding of one level |
//! | `projection` | sparse projection distance |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use ngram_graph::{
    canonical_code, merge, similarity, GraphConfig, NGramGraph, ProjectionConfig,
    SparseProjectionComparator, WindowPolicy,
};

/// Deterministic pseudo-random DNA text.
fn make_text(len: usize, seed: u64) -> String {
    let mut state = seed.wrapping_mul(0x9E37_79B9_7F4A_7C15) | 1;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            ['A', 'C', 'G', 'T'][(state % 4) as usize]
        })
        .collect()
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    let text = make_text(2_000, 1);
    let policies = [
        ("plain", WindowPolicy::Plain),
        ("symmetric", WindowPolicy::Symmetric),
        ("gaussian", WindowPolicy::gaussian_for(3)),
    ];

    for (name, policy) in policies {
        let config = GraphConfig::default().with_range(3, 5).with_policy(policy);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::new("policy", name), &config, |b, config| {
            b.iter(|| NGramGraph::new(black_box(&text), config.clone()).unwrap())
        });
    }

    group.finish();
}

fn bench_similarity(c: &mut Criterion) {
    let mut group = c.benchmark_group("similarity");

    for len in [100, 1_000, 5_000] {
        let a = NGramGraph::with_params(&make_text(len, 2), 3, 5, 3).unwrap();
        let b = NGramGraph::with_params(&make_text(len, 3), 3, 5, 3).unwrap();
        group.bench_with_input(BenchmarkId::new("chars", len), &(a, b), |bench, (a, b)| {
            bench.iter(|| similarity(black_box(a), black_box(b)))
        });
    }

    group.finish();
}

fn bench_merge(c: &mut Criterion) {
    let a = NGramGraph::with_params(&make_text(2_000, 4), 3, 5, 3).unwrap();
    let b = NGramGraph::with_params(&make_text(2_000, 5), 3, 5, 3).unwrap();

    c.bench_function("merge", |bench| {
        bench.iter(|| {
            let mut target = a.clone();
            merge(&mut target, black_box(&b), 0.5);
            target
        })
    });
}

fn bench_canonical_code(c: &mut Criterion) {
    let mut group = c.benchmark_group("canonical_code");

    for len in [50, 200, 1_000] {
        let g = NGramGraph::with_params(&make_text(len, 6), 3, 3, 3).unwrap();
        let level = g.level(3).unwrap().clone();
        group.bench_with_input(BenchmarkId::new("chars", len), &level, |b, level| {
            b.iter(|| canonical_code(black_box(level)))
        });
    }

    group.finish();
}

fn bench_projection(c: &mut Criterion) {
    let comparator = SparseProjectionComparator::new(ProjectionConfig::dna(3, 256)).unwrap();
    let a = NGramGraph::with_params(&make_text(2_000, 7), 3, 3, 3).unwrap();
    let b = NGramGraph::with_params(&make_text(2_000, 8), 3, 3, 3).unwrap();

    c.bench_function("projection_distance", |bench| {
        bench.iter(|| comparator.compare(black_box(&a), black_box(&b)))
    });
}

criterion_group!(
    benches,
    bench_build,
    bench_similarity,
    bench_merge,
    bench_canonical_code,
    bench_projection,
);
criterion_main!(benches);
