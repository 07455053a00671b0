//! MLS operator benchmarks using Criterion.
//!
//! Benchmarks cover:
//! - Construction scalability (1K to 100K sources)
//! - Application of a built operator to scalar and vector fields
//! - Polynomial degrees (constant to cubic)
//! - Kernels (Wendland 0/2/4/6)
//! - Dimensions (1D, 2D, 3D)
//! - Spatial indices (KD-tree, brute force)
//!
//! Run with: `cargo bench`

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use mls_rs::prelude::*;
use rand::prelude::*;
use std::hint::black_box;

// ============================================================================
// Data Generation with Reproducible RNG
// ============================================================================

/// Uniform random points in the unit cube.
fn random_cloud<const D: usize>(size: usize, seed: u64) -> Vec<[f64; D]> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..size)
        .map(|_| std::array::from_fn(|_| rng.random_range(0.0..1.0)))
        .collect()
}

/// A smooth field sampled at `points`.
fn smooth_field<const D: usize>(points: &[[f64; D]]) -> Vec<f64> {
    points
        .iter()
        .map(|p| {
            p.iter()
                .enumerate()
                .map(|(i, x)| ((i + 1) as f64 * x).sin())
                .sum::<f64>()
        })
        .collect()
}

// ============================================================================
// Benchmarks
// ============================================================================

fn bench_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("construction");
    group.sample_size(20);

    for size in [1_000, 10_000, 100_000] {
        group.throughput(Throughput::Elements(size as u64));

        let sources: Vec<[f64; 2]> = random_cloud(size, 42);
        let targets: Vec<[f64; 2]> = random_cloud(size, 43);

        group.bench_with_input(BenchmarkId::new("2d_quadratic", size), &size, |b, _| {
            b.iter(|| {
                MovingLeastSquares::<f64>::builder()
                    .neighbors(12)
                    .build(black_box(&sources), black_box(&targets))
                    .unwrap()
            })
        });
    }
    group.finish();
}

fn bench_apply(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply");
    group.sample_size(100);

    for size in [1_000, 10_000, 100_000] {
        group.throughput(Throughput::Elements(size as u64));

        let sources: Vec<[f64; 3]> = random_cloud(size, 42);
        let targets: Vec<[f64; 3]> = random_cloud(size, 43);
        let mls = MovingLeastSquares::<f64>::builder()
            .degree(Linear)
            .neighbors(10)
            .build(&sources, &targets)
            .unwrap();
        let scalar = smooth_field(&sources);
        let vector: Vec<[f64; 3]> = sources.clone();

        group.bench_with_input(BenchmarkId::new("scalar", size), &size, |b, _| {
            b.iter(|| mls.interpolate(black_box(&scalar)).unwrap())
        });

        let mut out = Vec::with_capacity(size);
        group.bench_with_input(BenchmarkId::new("scalar_into", size), &size, |b, _| {
            b.iter(|| mls.interpolate_into(black_box(&scalar), &mut out).unwrap())
        });

        group.bench_with_input(BenchmarkId::new("vector3", size), &size, |b, _| {
            b.iter(|| mls.interpolate(black_box(&vector)).unwrap())
        });
    }
    group.finish();
}

fn bench_degrees(c: &mut Criterion) {
    let mut group = c.benchmark_group("polynomial_degree");
    group.sample_size(20);

    let sources: Vec<[f64; 2]> = random_cloud(10_000, 42);
    let targets: Vec<[f64; 2]> = random_cloud(5_000, 43);

    for (name, degree) in [
        ("constant", Constant),
        ("linear", Linear),
        ("quadratic", Quadratic),
        ("cubic", Cubic),
    ] {
        let k = 2 * degree.num_coefficients_nd(2);
        group.bench_with_input(BenchmarkId::new("degree", name), &degree, |b, &degree| {
            b.iter(|| {
                MovingLeastSquares::<f64>::builder()
                    .degree(degree)
                    .neighbors(k)
                    .build(black_box(&sources), black_box(&targets))
                    .unwrap()
            })
        });
    }
    group.finish();
}

fn bench_kernels(c: &mut Criterion) {
    let mut group = c.benchmark_group("kernel");
    group.sample_size(20);

    let sources: Vec<[f64; 2]> = random_cloud(10_000, 42);
    let targets: Vec<[f64; 2]> = random_cloud(5_000, 43);

    for (name, wf) in [
        ("wendland0", Wendland0),
        ("wendland2", Wendland2),
        ("wendland4", Wendland4),
        ("wendland6", Wendland6),
    ] {
        group.bench_with_input(BenchmarkId::new("kernel", name), &wf, |b, &wf| {
            b.iter(|| {
                MovingLeastSquares::<f64>::builder()
                    .kernel(wf)
                    .neighbors(12)
                    .build(black_box(&sources), black_box(&targets))
                    .unwrap()
            })
        });
    }
    group.finish();
}

fn bench_dimensions(c: &mut Criterion) {
    let mut group = c.benchmark_group("dimensions");
    group.sample_size(20);

    let size = 10_000;
    group.throughput(Throughput::Elements(size as u64));

    let s1: Vec<[f64; 1]> = random_cloud(size, 42);
    let t1: Vec<[f64; 1]> = random_cloud(size, 43);
    group.bench_function("1d", |b| {
        b.iter(|| MovingLeastSquares::<f64>::new(black_box(&s1), black_box(&t1)).unwrap())
    });

    let s2: Vec<[f64; 2]> = random_cloud(size, 42);
    let t2: Vec<[f64; 2]> = random_cloud(size, 43);
    group.bench_function("2d", |b| {
        b.iter(|| {
            MovingLeastSquares::<f64>::builder()
                .neighbors(12)
                .build(black_box(&s2), black_box(&t2))
                .unwrap()
        })
    });

    let s3: Vec<[f64; 3]> = random_cloud(size, 42);
    let t3: Vec<[f64; 3]> = random_cloud(size, 43);
    group.bench_function("3d", |b| {
        b.iter(|| {
            MovingLeastSquares::<f64>::builder()
                .neighbors(20)
                .build(black_box(&s3), black_box(&t3))
                .unwrap()
        })
    });
    group.finish();
}

fn bench_indices(c: &mut Criterion) {
    let mut group = c.benchmark_group("spatial_index");
    group.sample_size(10);

    for size in [500, 2_000, 5_000] {
        let sources: Vec<[f64; 3]> = random_cloud(size, 42);
        let targets: Vec<[f64; 3]> = random_cloud(size, 43);

        group.bench_with_input(BenchmarkId::new("kdtree", size), &size, |b, _| {
            b.iter(|| {
                MovingLeastSquares::<f64>::builder()
                    .degree(Linear)
                    .neighbors(8)
                    .build(black_box(&sources), black_box(&targets))
                    .unwrap()
            })
        });

        group.bench_with_input(BenchmarkId::new("brute_force", size), &size, |b, _| {
            b.iter(|| {
                MovingLeastSquares::<f64>::builder()
                    .degree(Linear)
                    .neighbors(8)
                    .build_with_index::<BruteForce<f64>>(black_box(&sources), black_box(&targets))
                    .unwrap()
            })
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_construction,
    bench_apply,
    bench_degrees,
    bench_kernels,
    bench_dimensions,
    bench_indices,
);
criterion_main!(benches);
