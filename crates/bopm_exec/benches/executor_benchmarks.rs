//! Criterion benchmarks for the batch backends.
//!
//! Characterises software-path scaling with the worker count and the
//! per-request overhead of the emulated accelerator round trip.

use bopm_core::types::OptionRequest;
use bopm_exec::accel::{emulated_pool, DeviceTopology};
use bopm_exec::executor::price_batch;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn strike_ladder(count: usize, tree_height: u32) -> Vec<OptionRequest> {
    (0..count)
        .map(|k| {
            OptionRequest::new(1, 100.0, 80.0, 0.05, 0.3, 0.01, tree_height)
                .with_strike(80.0 + 0.5 * k as f32)
        })
        .collect()
}

/// Benchmark the software executor across worker counts.
fn bench_software_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("software_batch");
    group.sample_size(20);

    let requests = strike_ladder(64, 512);

    for workers in [1, 2, 4, 8] {
        group.bench_with_input(
            BenchmarkId::new("workers", workers),
            &workers,
            |b, &workers| {
                b.iter(|| price_batch(black_box(&requests), workers).unwrap());
            },
        );
    }

    group.finish();
}

/// Benchmark the emulated accelerator harness.
fn bench_emulated_accelerator(c: &mut Criterion) {
    let mut group = c.benchmark_group("emulated_accelerator");
    group.sample_size(20);

    let requests = strike_ladder(64, 512);

    for kernels in [1, 4] {
        group.bench_with_input(
            BenchmarkId::new("kernels", kernels),
            &kernels,
            |b, &kernels| {
                let mut pool = emulated_pool(DeviceTopology::new(kernels, 1, 1)).unwrap();
                b.iter(|| pool.submit(black_box(&requests)).unwrap());
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_software_batch, bench_emulated_accelerator);
criterion_main!(benches);
