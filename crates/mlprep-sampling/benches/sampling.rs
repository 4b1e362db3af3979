//! Benchmarks for neighbour-based resampling.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mlprep_core::types::Dataset;
use mlprep_sampling::{RebalancingRequest, ResamplingDispatcher, SamplingMethod};
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Generate `n` rows of 8 features with one row in ten labeled 1.
fn generate_dataset(n: usize) -> Dataset {
    let mut rng = StdRng::seed_from_u64(17);
    let features = Array2::from_shape_fn((n, 8), |(i, _)| {
        let shift = if i % 10 == 0 { 1.5 } else { 0.0 };
        shift + rng.gen::<f64>()
    });
    let labels = Array1::from_shape_fn(n, |i| if i % 10 == 0 { 1.0 } else { 0.0 });
    let names = (0..8).map(|j| format!("f{}", j)).collect();
    Dataset::new(features, names, labels).expect("valid shape")
}

fn benchmark_rebalance(c: &mut Criterion) {
    let mut group = c.benchmark_group("ResamplingDispatcher");
    let dispatcher = ResamplingDispatcher::new(42);

    for size in [200, 1000].iter() {
        let data = generate_dataset(*size);

        for method in [
            SamplingMethod::OverSmote,
            SamplingMethod::OverSmoteb,
            SamplingMethod::UnderTomek,
        ] {
            let request = RebalancingRequest::new(method, 0.0, 1.0);
            group.bench_with_input(
                BenchmarkId::new(method.as_str(), size),
                &data,
                |b, data| b.iter(|| dispatcher.rebalance(black_box(data), &request)),
            );
        }
    }

    group.finish();
}

criterion_group!(benches, benchmark_rebalance);
criterion_main!(benches);
