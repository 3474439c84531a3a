mod common;

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use cube_scatter::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

const COUNTS: [i64; 4] = [10, 100, 1_000, 10_000];

fn planner_generate_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("planner/generate");

    for (count, request, throughput) in common::count_requests(&COUNTS) {
        group.throughput(throughput);
        group.sample_size(common::sample_size_for(count));

        let mut planner = common::seeded_planner(0xC0FFEE, count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| {
                let result = planner.generate(&request).expect("valid request");
                black_box(result.len());
            });
        });
    }

    group.finish();
}

fn planner_caller_rng_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("planner/generate_with_rng");
    let config = PlannerConfig::default();

    for (count, request, throughput) in common::count_requests(&COUNTS) {
        group.throughput(throughput);
        group.sample_size(common::sample_size_for(count));

        let mut rng = StdRng::seed_from_u64(0xBEEF ^ count as u64);
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| {
                let result = generate_with_rng(&request, &config, &mut rng).expect("valid request");
                black_box(result.len());
            });
        });
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = common::scatter_criterion();
    targets = planner_generate_benches, planner_caller_rng_benches
}
criterion_main!(benches);
