use std::time::Duration;

use criterion::{Criterion, Throughput};

pub const SAMPLE_SIZE: usize = 30;
pub const WARM_UP: Duration = Duration::from_millis(500);
pub const MEASUREMENT_TIME: Duration = Duration::from_secs(3);

/// Short runs; a single scatter pass finishes in microseconds.
pub fn default_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .sample_size(SAMPLE_SIZE)
        .warm_up_time(WARM_UP)
        .measurement_time(MEASUREMENT_TIME)
}

/// Placements per iteration, never zero.
pub fn elements_throughput(placed: usize) -> Throughput {
    Throughput::Elements(placed.max(1) as u64)
}
