use std::time::Duration;

use criterion::{Criterion, Throughput};
use cube_scatter::prelude::*;

/// Batches above this size get the shorter sample budget.
const LARGE_BATCH: i64 = 1_000;

pub fn scatter_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .sample_size(30)
        .warm_up_time(Duration::from_millis(500))
        .measurement_time(Duration::from_secs(3))
        .noise_threshold(0.03)
}

/// One explicit-count request per entry, with its throughput in placements.
pub fn count_requests(counts: &[i64]) -> Vec<(i64, ScatterRequest, Throughput)> {
    counts
        .iter()
        .map(|&count| {
            let request = ScatterRequest::new().with_count(count);
            (count, request, Throughput::Elements(count.max(1) as u64))
        })
        .collect()
}

/// Samples per benchmark for a batch of `count` instances.
pub fn sample_size_for(count: i64) -> usize {
    if count > LARGE_BATCH {
        10
    } else {
        30
    }
}

/// A planner whose seed differs per count so groups do not share streams.
pub fn seeded_planner(salt: u64, count: i64) -> ScatterPlanner {
    ScatterPlanner::seeded(salt ^ count as u64)
}
