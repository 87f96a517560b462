//! Criterion micro-benchmarks for evaluator throughput.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use condif_bench::sample_points;
use condif_core::Evaluator;
use condif_eval::verify::finite_difference_source;
use condif_test_utils::fixtures::{reference_source, reference_velocity};

/// Benchmark: closed-form manufactured source at 10K points.
fn bench_manufactured_source_10k(c: &mut Criterion) {
    let src = reference_source(true);
    let points = sample_points(10_000);

    c.bench_function("manufactured_source_10k", |b| {
        b.iter(|| {
            let mut acc = 0.0;
            for x in &points {
                acc += src.contributions(0.0, x).total();
            }
            black_box(acc)
        });
    });
}

/// Benchmark: the same source through `dyn Evaluator`.
fn bench_manufactured_source_dyn_10k(c: &mut Criterion) {
    let src: Box<dyn Evaluator> = Box::new(reference_source(true));
    let points = sample_points(10_000);

    c.bench_function("manufactured_source_dyn_10k", |b| {
        b.iter(|| {
            for x in &points {
                black_box(src.evaluate(0.0, x));
            }
        });
    });
}

/// Benchmark: finite-difference recomputation at 1K points.
fn bench_finite_difference_1k(c: &mut Criterion) {
    let src = reference_source(true);
    let points = sample_points(1_000);

    c.bench_function("finite_difference_source_1k", |b| {
        b.iter(|| {
            for x in &points {
                black_box(finite_difference_source(&src, 0.0, x, 1e-3));
            }
        });
    });
}

/// Benchmark: analytic advection field at 10K points.
fn bench_velocity_10k(c: &mut Criterion) {
    let beta = reference_velocity();
    let points = sample_points(10_000);

    c.bench_function("velocity_10k", |b| {
        b.iter(|| {
            for x in &points {
                black_box(beta.evaluate(0.0, x));
            }
        });
    });
}

criterion_group!(
    benches,
    bench_manufactured_source_10k,
    bench_manufactured_source_dyn_10k,
    bench_finite_difference_1k,
    bench_velocity_10k
);
criterion_main!(benches);
